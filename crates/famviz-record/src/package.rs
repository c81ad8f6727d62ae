//! Repository descriptors from the stats service catalog.

use serde::{Deserialize, Serialize};

/// Prefix shared by every repository and topic name.
const PREFIX: &str = "apertium-";

/// Removes the `apertium-` prefix, if present.
#[must_use]
pub fn strip_prefix(name: &str) -> &str {
    name.strip_prefix(PREFIX).unwrap_or(name)
}

/// A repository as listed by the stats service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Repository name, e.g. `apertium-tat-kir`.
    pub name: String,

    /// Topics such as `apertium-incubator`.
    #[serde(default)]
    pub topics: Vec<String>,
}

impl PackageDescriptor {
    /// Creates a new descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, topics: Vec<String>) -> Self {
        Self {
            name: name.into(),
            topics,
        }
    }

    /// Returns the first topic (without prefix) that is one of `locations`.
    #[must_use]
    pub fn location<'a>(&self, locations: &[&'a str]) -> Option<&'a str> {
        self.topics.iter().find_map(|topic| {
            let bare = strip_prefix(topic);
            locations.iter().copied().find(|loc| *loc == bare)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("apertium-tat"), "tat");
        assert_eq!(strip_prefix("apertium-tat-kir"), "tat-kir");
        assert_eq!(strip_prefix("lttoolbox"), "lttoolbox");
    }

    #[test]
    fn test_location() {
        let package = PackageDescriptor::new(
            "apertium-tat-kir",
            vec!["apertium-pair".into(), "apertium-staging".into()],
        );
        assert_eq!(
            package.location(&["incubator", "nursery", "staging", "trunk"]),
            Some("staging")
        );
        assert_eq!(package.location(&["languages"]), None);
    }

    #[test]
    fn test_deserialize_without_topics() {
        let package: PackageDescriptor =
            serde_json::from_str(r#"{"name":"apertium-kir"}"#).unwrap();
        assert!(package.topics.is_empty());
    }
}
