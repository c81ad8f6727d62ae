//! Selection of a family's repositories from the package catalog.

use std::sync::LazyLock;

use famviz_record::PackageDescriptor;
use regex::Regex;

use crate::exceptions;

static MONO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^apertium-(\w+)$").expect("invalid regex"));

static PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^apertium-(\w+)-(\w+)$").expect("invalid regex"));

/// Returns the monolingual packages of the family's languages, with their
/// language code.
#[must_use]
pub fn mono_packages<'a>(
    packages: &'a [PackageDescriptor],
    languages: &[String],
) -> Vec<(&'a PackageDescriptor, &'a str)> {
    packages
        .iter()
        .filter_map(|package| {
            let caps = MONO_RE.captures(&package.name)?;
            let code = caps.get(1)?.as_str();
            languages
                .iter()
                .any(|l| l == code)
                .then_some((package, code))
        })
        .collect()
}

/// Returns the pair packages whose two languages both belong to the family,
/// with their pair code. Excluded pairs are left out.
#[must_use]
pub fn pair_packages<'a>(
    packages: &'a [PackageDescriptor],
    languages: &[String],
) -> Vec<(&'a PackageDescriptor, PairCode<'a>)> {
    packages
        .iter()
        .filter_map(|package| {
            let caps = PAIR_RE.captures(&package.name)?;
            let pair = PairCode {
                first: caps.get(1)?.as_str(),
                second: caps.get(2)?.as_str(),
            };
            let in_family = |code: &str| languages.iter().any(|l| l == code);
            (in_family(pair.first)
                && in_family(pair.second)
                && !exceptions::is_excluded_pair(&pair.to_string()))
            .then_some((package, pair))
        })
        .collect()
}

/// Returns the family's pair packages that include `language`.
#[must_use]
pub fn pairs_of<'a>(
    language: &str,
    packages: &'a [PackageDescriptor],
    languages: &[String],
) -> Vec<(&'a PackageDescriptor, PairCode<'a>)> {
    pair_packages(packages, languages)
        .into_iter()
        .filter(|(_, pair)| pair.first == language || pair.second == language)
        .collect()
}

/// The two codes of a pair repository, e.g. `tat-kir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCode<'a> {
    pub first: &'a str,
    pub second: &'a str,
}

impl std::fmt::Display for PairCode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}
