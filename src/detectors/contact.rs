// WHY: phone matching cannot lean on \b because "+31" starts on a non-word
// character; neighbor digits are checked explicitly instead.

use anyhow::Result;
use regex::Regex;

use crate::entities::DedupCache;
use crate::filth::{Category, Filth};

use super::{Detector, DetectorContext};

const EMAIL_PATTERN: &str = r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b";

/// Dutch numbers: +31 with optional (0), or a domestic 0-prefix, followed by
/// nine digits with optional single separators
const PHONE_PATTERN: &str = r"(?:\+31(?:[\s-]?\(0\))?[\s-]?|0)[1-9](?:[\s-]?\d){8}";

struct EmailDetector {
    regex: Regex,
}

impl Detector for EmailDetector {
    fn name(&self) -> &str {
        "email"
    }

    fn scan(&self, text: &str) -> Vec<Filth> {
        self.regex
            .find_iter(text)
            .map(|m| Filth::new(m.start(), m.end(), m.as_str(), Category::Email, "email"))
            .collect()
    }
}

struct PhoneDetector {
    regex: Regex,
}

impl Detector for PhoneDetector {
    fn name(&self) -> &str {
        "phone"
    }

    fn scan(&self, text: &str) -> Vec<Filth> {
        let mut matches = Vec::new();
        for m in self.regex.find_iter(text) {
            let prev = text[..m.start()].chars().next_back();
            if prev.is_some_and(|c| c.is_ascii_digit() || c == '+') {
                continue;
            }
            let next = text[m.end()..].chars().next();
            if next.is_some_and(|c| c.is_ascii_digit()) {
                continue;
            }
            matches.push(Filth::new(
                m.start(),
                m.end(),
                m.as_str(),
                Category::Phone,
                "phone",
            ));
        }
        matches
    }
}

pub fn build_email(_ctx: &DetectorContext, _dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    Ok(Box::new(EmailDetector {
        regex: Regex::new(EMAIL_PATTERN)?,
    }))
}

pub fn build_phone(_ctx: &DetectorContext, _dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    Ok(Box::new(PhoneDetector {
        regex: Regex::new(PHONE_PATTERN)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn pair() -> (Box<dyn Detector>, Box<dyn Detector>) {
        let ctx = DetectorContext::new(Locale::NlNl);
        let mut dedup = DedupCache::new();
        (
            build_email(&ctx, &mut dedup).unwrap(),
            build_phone(&ctx, &mut dedup).unwrap(),
        )
    }

    #[test]
    fn test_email_addresses_found() {
        let (email, _) = pair();
        let filths = email.scan("mail jan.jansen+prive@voorbeeld.nl of info@firma.example.com");
        let found: Vec<String> = filths.into_iter().map(|f| f.text).collect();
        assert_eq!(
            found,
            vec!["jan.jansen+prive@voorbeeld.nl", "info@firma.example.com"]
        );
    }

    #[test]
    fn test_phone_formats() {
        let (_, phone) = pair();
        for text in [
            "bel 0612345678",
            "bel +31612345678",
            "bel +31 6 12345678",
            "bel +31 (0)6 12 34 56 78",
            "bel 010-1234567",
        ] {
            let filths = phone.scan(text);
            assert_eq!(filths.len(), 1, "no match in {text:?}");
            assert_eq!(filths[0].category, Category::Phone);
        }
    }

    #[test]
    fn test_phone_not_matched_inside_longer_digit_run() {
        let (_, phone) = pair();
        assert!(phone.scan("order 06123456789012").is_empty());
    }

    #[test]
    fn test_plain_words_untouched() {
        let (email, phone) = pair();
        let text = "gewone zin zonder contactgegevens";
        assert!(email.scan(text).is_empty());
        assert!(phone.scan(text).is_empty());
    }
}
