// WHY: closed locale set keeps selection logic total; unknown locales fail at parse time

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// Language/region selecting active entity lists and locale-specific detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    EnUs,
    NlNl,
}

impl Locale {
    /// All supported locales, in default processing order
    pub fn all() -> &'static [Locale] {
        &[Locale::EnUs, Locale::NlNl]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::EnUs => "en_US",
            Locale::NlNl => "nl_NL",
        }
    }

    /// Function words that should never be treated as entities for this locale.
    ///
    /// Entity dictionaries collide with ordinary words ("een" is both a Dutch
    /// article and a village in Drenthe); all-lowercase occurrences of these
    /// are suppressed while capitalized occurrences are retained.
    pub fn stopwords(&self) -> &'static [&'static str] {
        match self {
            Locale::NlNl => &[
                "een", "het", "de", "die", "dat", "deze", "dit", "dan", "toen", "als", "maar",
                "want", "dus", "nog", "al", "naar", "door", "om", "bij", "aan", "van", "in", "op",
                "te", "ten", "ter", "met", "tot", "voor", "ben",
            ],
            Locale::EnUs => &[
                "a", "an", "the", "of", "in", "on", "at", "to", "for", "and", "or", "but", "as",
                "by", "with", "from",
            ],
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.stopwords().contains(&lower.as_str())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "en_us" | "en" => Ok(Locale::EnUs),
            "nl_nl" | "nl" => Ok(Locale::NlNl),
            other => Err(anyhow!("Unsupported locale: {other}")),
        }
    }
}
