//! The dictionary file tracked for an entity.

use std::path::Path;

use famviz_counter::FileFormat;
use tracing::debug;

use crate::exceptions;

/// A dictionary file whose history is aggregated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Repository name, e.g. `apertium-tat-kir`.
    pub repo: String,

    /// Language or pair code the history is stored under.
    pub entity: String,

    /// Path of the file in the repository's current tree.
    pub path: String,

    /// Format used to count the file.
    pub format: FileFormat,

    /// Whether the file is a bilingual dictionary.
    pub bilingual: bool,
}

impl TrackedFile {
    /// The monolingual dictionary `apertium-<lang>.<lang>.<ext>`.
    #[must_use]
    pub fn mono(language: &str, format: FileFormat) -> Self {
        Self {
            repo: format!("apertium-{language}"),
            entity: language.to_string(),
            path: format!("apertium-{language}.{language}.{}", format.extension()),
            format,
            bilingual: false,
        }
    }

    /// The bilingual dictionary of a pair, named after its dictionary alias.
    #[must_use]
    pub fn pair(pair: &str) -> Self {
        let dix = exceptions::dictionary_name(pair);
        Self {
            repo: format!("apertium-{pair}"),
            entity: pair.to_string(),
            path: format!("apertium-{dix}.{dix}.{}", FileFormat::Dix.extension()),
            format: FileFormat::Dix,
            bilingual: true,
        }
    }
}

/// Detects the format of a language's monolingual dictionary.
///
/// Looks at the files named `apertium-<lang>.<lang>.*` in name order and
/// returns the first recognised format.
#[must_use]
pub fn detect_dictionary(repo_dir: &Path, language: &str) -> Option<FileFormat> {
    let prefix = format!("apertium-{language}.{language}.");
    let Ok(entries) = std::fs::read_dir(repo_dir) else {
        debug!(dir = %repo_dir.display(), "unreadable repository directory");
        return None;
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix))
        .collect();
    names.sort();

    names.iter().find_map(FileFormat::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_mono_target() {
        let target = TrackedFile::mono("tat", FileFormat::Lexc);
        assert_eq!(target.repo, "apertium-tat");
        assert_eq!(target.path, "apertium-tat.tat.lexc");
        assert!(!target.bilingual);
    }

    #[test]
    fn test_pair_target_uses_alias() {
        let target = TrackedFile::pair("tat-kir");
        assert_eq!(target.repo, "apertium-tat-kir");
        assert_eq!(target.entity, "tat-kir");
        assert_eq!(target.path, "apertium-tt-ky.tt-ky.dix");
        assert!(target.bilingual);

        let target = TrackedFile::pair("kaz-tat");
        assert_eq!(target.path, "apertium-kaz-tat.kaz-tat.dix");
    }

    #[test]
    fn test_detect_dictionary() {
        let dir = TempDir::new().unwrap();
        for name in [
            "apertium-tat.tat.rlx",
            "apertium-tat.tat.lexc",
            "apertium-tat.tat.twol",
            "apertium-tat.post-tat.dix",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        assert_eq!(detect_dictionary(dir.path(), "tat"), Some(FileFormat::Lexc));
    }

    #[test]
    fn test_detect_dictionary_first_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("apertium-cat.cat.metadix"), "").unwrap();
        fs::write(dir.path().join("apertium-cat.cat.dix"), "").unwrap();
        assert_eq!(detect_dictionary(dir.path(), "cat"), Some(FileFormat::Dix));
    }

    #[test]
    fn test_detect_dictionary_unknown() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("apertium-tat.tat.rlx"), "").unwrap();
        assert_eq!(detect_dictionary(dir.path(), "tat"), None);
        assert_eq!(detect_dictionary(&dir.path().join("missing"), "tat"), None);
    }
}
