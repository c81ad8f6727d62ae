//! Dictionary file formats.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A recognised dictionary source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Lexicon compiler source (`.lexc`).
    Lexc,
    /// Dictionary XML (`.dix`).
    Dix,
    /// Dictionary XML with metaparadigms (`.metadix`).
    Metadix,
}

impl FileFormat {
    /// All formats, in detection order.
    pub const ALL: [Self; 3] = [Self::Lexc, Self::Dix, Self::Metadix];

    /// Returns the file extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Lexc => "lexc",
            Self::Dix => "dix",
            Self::Metadix => "metadix",
        }
    }

    /// Parses an extension (with or without the leading dot).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Detects the format of a path from its extension.
    #[must_use]
    pub fn detect(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the stats service file type of this format.
    #[must_use]
    pub const fn file_type(self, bilingual: bool) -> &'static str {
        match (self, bilingual) {
            (Self::Lexc, _) => "lexc",
            (Self::Dix | Self::Metadix, true) => "bidix",
            (Self::Dix, false) => "monodix",
            (Self::Metadix, false) => "metamonodix",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
