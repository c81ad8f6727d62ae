//! Repositories and pages that do not follow the usual conventions.
//!
//! Every special case of the scrape is listed here.

/// Pairs that are never scraped. `ita-srd` exists as `srd-ita`; the
/// `ita-srd` repository is empty.
pub const EXCLUDED_PAIRS: &[&str] = &["ita-srd"];

/// Pairs whose bilingual dictionary is named after other codes. The
/// `tat-kir` dictionary still uses ISO 639-1 codes.
pub const DICTIONARY_ALIASES: &[(&str, &str)] = &[("tat-kir", "tt-ky")];

/// Column of the state cell in a family's wiki table.
pub const DEFAULT_STATE_COLUMN: usize = 6;

/// Families whose wiki table has the state in another column.
pub const STATE_COLUMN_OVERRIDES: &[(&str, usize)] = &[("celtic", 7)];

/// Topics that locate a pair repository.
pub const PAIR_LOCATIONS: &[&str] = &["incubator", "nursery", "staging", "trunk"];

/// Topics that locate a monolingual repository.
pub const MONO_LOCATIONS: &[&str] = &["languages", "incubator"];

/// Returns true if the pair is never scraped.
#[must_use]
pub fn is_excluded_pair(pair: &str) -> bool {
    EXCLUDED_PAIRS.contains(&pair)
}

/// Returns the code under which a pair's dictionary file is named.
#[must_use]
pub fn dictionary_name(pair: &str) -> &str {
    DICTIONARY_ALIASES
        .iter()
        .find(|(name, _)| *name == pair)
        .map_or(pair, |(_, alias)| alias)
}

/// Returns the wiki table column holding a family's language states.
#[must_use]
pub fn state_column(family: &str) -> usize {
    STATE_COLUMN_OVERRIDES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(family))
        .map_or(DEFAULT_STATE_COLUMN, |(_, column)| *column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_pair() {
        assert!(is_excluded_pair("ita-srd"));
        assert!(!is_excluded_pair("srd-ita"));
        assert!(!is_excluded_pair("tat-kir"));
    }

    #[test]
    fn test_dictionary_alias() {
        assert_eq!(dictionary_name("tat-kir"), "tt-ky");
        assert_eq!(dictionary_name("kaz-tat"), "kaz-tat");
    }

    #[test]
    fn test_celtic_state_column() {
        assert_eq!(state_column("celtic"), 7);
        assert_eq!(state_column("Celtic"), 7);
        assert_eq!(state_column("turkic"), 6);
        assert_eq!(state_column("romance"), DEFAULT_STATE_COLUMN);
    }
}
