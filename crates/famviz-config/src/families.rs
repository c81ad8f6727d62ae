//! Language families.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{ConfigError, ConfigResult};

/// Named groups of language codes, read from `families.json`.
///
/// ```json
/// { "turkic": ["tat", "kir", "kaz"], "celtic": ["cym", "bre"] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Families(BTreeMap<String, Vec<String>>);

impl Families {
    /// Returns the language codes of a family. The name is matched
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownFamily`] if the family is not listed.
    pub fn languages(&self, family: &str) -> ConfigResult<&[String]> {
        let key = family.to_lowercase();
        self.0
            .get(&key)
            .map(Vec::as_slice)
            .ok_or(ConfigError::UnknownFamily(key))
    }
}

/// Loads the families file.
///
/// # Errors
///
/// Returns an error if the file is missing or is not a JSON object of
/// string arrays.
pub fn load_families(path: impl AsRef<Path>) -> ConfigResult<Families> {
    let path = path.as_ref();
    debug!(?path, "loading families");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ConfigError::InvalidFamilies {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_families() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("families.json");
        fs::write(&path, r#"{"turkic": ["tat", "kir"], "celtic": ["cym"]}"#).unwrap();

        let families = load_families(&path).unwrap();
        assert_eq!(families.languages("turkic").unwrap(), ["tat", "kir"]);
        assert_eq!(families.languages("celtic").unwrap(), ["cym"]);
    }

    #[test]
    fn test_languages_case_insensitive() {
        let families = Families([("turkic".to_string(), vec!["tat".to_string()])].into());
        assert_eq!(families.languages("Turkic").unwrap(), ["tat"]);
        assert_eq!(families.languages("TURKIC").unwrap(), ["tat"]);
    }

    #[test]
    fn test_unknown_family() {
        let families = Families::default();
        match families.languages("Klingon") {
            Err(ConfigError::UnknownFamily(name)) => assert_eq!(name, "klingon"),
            other => panic!("expected UnknownFamily, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_families_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("families.json");
        fs::write(&path, r#"{"turkic": "tat"}"#).unwrap();

        assert!(matches!(
            load_families(&path),
            Err(ConfigError::InvalidFamilies { .. })
        ));
    }

    #[test]
    fn test_missing_families_file() {
        assert!(matches!(
            load_families("/nonexistent/families.json"),
            Err(ConfigError::NotFound(_))
        ));
    }
}
