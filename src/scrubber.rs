// WHY: detector construction and cross-category dedup are scoped to one
// session per locale run. Nothing is shared between runs, so two documents
// scrubbed back to back can never influence each other's entity claims.

use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::detectors::{select_detectors, Detector, DetectorContext};
use crate::entities::DedupCache;
use crate::filth::{resolve_overlaps, Filth};
use crate::locale::Locale;
use crate::replacer::{HashAlgorithm, HashedPiiReplacer, DEFAULT_MODULUS};

/// Caller-facing knobs for one scrub invocation
#[derive(Debug, Clone)]
pub struct ScrubOptions {
    /// Single locale, or `None` to run every supported locale
    pub locale: Option<Locale>,
    /// Explicit detector names; `None` selects the default-enabled set
    pub detectors: Option<Vec<String>>,
    /// Literal that is always redacted when present
    pub custom_text: Option<String>,
    /// Entity-list root overriding the embedded defaults
    pub data_dir: Option<PathBuf>,
    pub hash_algorithm: HashAlgorithm,
    pub hash_modulus: u64,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            locale: None,
            detectors: None,
            custom_text: None,
            data_dir: None,
            hash_algorithm: HashAlgorithm::Md5,
            hash_modulus: DEFAULT_MODULUS,
        }
    }
}

/// Outcome of scrubbing one text under one locale
#[derive(Debug)]
pub struct LocaleScrub {
    pub locale: Locale,
    /// Accepted spans sorted by start offset, replacements filled in
    pub filths: Vec<Filth>,
    pub cleaned: String,
}

/// One scrub run: owns the dedup cache that arbitrates entity claims
/// between the location, organization, and name categories.
///
/// Claims persist for the lifetime of the session, so use one session per
/// document run: a second `scrub_locale` call on the same session finds the
/// dictionaries already claimed and builds empty entity detectors.
#[derive(Default)]
pub struct ScrubSession {
    dedup: DedupCache,
}

impl ScrubSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full pipeline for one locale: select detectors, scan, resolve
    /// overlaps, derive placeholders, substitute.
    pub fn scrub_locale(
        &mut self,
        text: &str,
        locale: Locale,
        opts: &ScrubOptions,
    ) -> Result<LocaleScrub> {
        self.scrub_locale_with(text, locale, opts, Vec::new())
    }

    /// Same pipeline with caller-supplied detectors appended after the
    /// built-in catalog (e.g. an external NER backend).
    pub fn scrub_locale_with(
        &mut self,
        text: &str,
        locale: Locale,
        opts: &ScrubOptions,
        extra: Vec<Box<dyn Detector>>,
    ) -> Result<LocaleScrub> {
        let mut ctx = DetectorContext::new(locale);
        ctx.data_dir = opts.data_dir.clone();
        ctx.custom_text = opts.custom_text.clone();

        let mut detectors = select_detectors(&ctx, opts.detectors.as_deref(), &mut self.dedup);
        detectors.extend(extra);
        if detectors.is_empty() {
            bail!("No detectors available for locale {locale}");
        }

        let mut candidates = Vec::new();
        for detector in &detectors {
            let found = detector.scan(text);
            debug!(
                "Detector {} produced {} candidate(s)",
                detector.name(),
                found.len()
            );
            candidates.extend(found);
        }
        let mut filths = resolve_overlaps(candidates);

        let mut replacer = HashedPiiReplacer::new(opts.hash_algorithm, opts.hash_modulus);
        for filth in &mut filths {
            replacer.process(filth);
        }

        let cleaned = substitute(text, &filths);
        info!("Locale {locale}: {} span(s) redacted", filths.len());
        Ok(LocaleScrub {
            locale,
            filths,
            cleaned,
        })
    }
}

/// Left-to-right substitution of accepted spans; spans never overlap after
/// resolution, so each replacement splices cleanly
fn substitute(text: &str, filths: &[Filth]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for filth in filths {
        if filth.beg < cursor {
            continue;
        }
        out.push_str(&text[cursor..filth.beg]);
        match &filth.replacement_string {
            Some(replacement) => out.push_str(replacement),
            None => out.push_str(&text[filth.beg..filth.end]),
        }
        cursor = filth.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Scrub `text` under the requested locale, or under every supported locale.
///
/// Each locale gets a fresh session. A failing locale is logged and skipped;
/// the call errors only when no locale produced a result.
pub fn scrub_text(text: &str, opts: &ScrubOptions) -> Result<Vec<LocaleScrub>> {
    let locales: Vec<Locale> = match opts.locale {
        Some(locale) => vec![locale],
        None => Locale::all().to_vec(),
    };

    let mut results = Vec::new();
    let mut failed: Vec<String> = Vec::new();
    for locale in locales {
        let mut session = ScrubSession::new();
        match session.scrub_locale(text, locale, opts) {
            Ok(scrub) => results.push(scrub),
            Err(e) => {
                warn!("Scrubbing failed for locale {locale}: {e:#}");
                failed.push(format!("{locale}: {e:#}"));
            }
        }
    }

    if results.is_empty() {
        bail!("Scrubbing failed for every locale: {}", failed.join("; "));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filth::Category;
    use crate::filth::Filth;

    fn dutch_options() -> ScrubOptions {
        ScrubOptions {
            locale: Some(Locale::NlNl),
            ..ScrubOptions::default()
        }
    }

    #[test]
    fn test_entities_replaced_with_placeholders() {
        let results = scrub_text("Jan woont in Leiden", &dutch_options()).unwrap();
        assert_eq!(results.len(), 1);
        let scrub = &results[0];
        assert!(!scrub.cleaned.contains("Jan"));
        assert!(!scrub.cleaned.contains("Leiden"));
        assert!(scrub.cleaned.contains("NAME-"));
        assert!(scrub.cleaned.contains("LOCATION-"));
        assert!(scrub.cleaned.contains("woont in"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let opts = dutch_options();
        let text = "Jan mailt jan@voorbeeld.nl vanuit Leiden";
        let first = scrub_text(text, &opts).unwrap();
        let second = scrub_text(text, &opts).unwrap();
        assert_eq!(first[0].cleaned, second[0].cleaned);
    }

    #[test]
    fn test_english_locale_leaves_dutch_entities_alone() {
        let opts = ScrubOptions {
            locale: Some(Locale::EnUs),
            ..ScrubOptions::default()
        };
        let results = scrub_text("Jan woont in Leiden", &opts).unwrap();
        assert_eq!(results[0].cleaned, "Jan woont in Leiden");
    }

    #[test]
    fn test_all_locales_run_when_unspecified() {
        let results = scrub_text("plain text", &ScrubOptions::default()).unwrap();
        assert_eq!(results.len(), Locale::all().len());
    }

    #[test]
    fn test_locale_without_usable_detectors_fails() {
        let opts = ScrubOptions {
            locale: Some(Locale::EnUs),
            detectors: Some(vec!["location".to_string()]),
            ..ScrubOptions::default()
        };
        assert!(scrub_text("whatever", &opts).is_err());
    }

    #[test]
    fn test_custom_literal_redacted() {
        let opts = ScrubOptions {
            locale: Some(Locale::EnUs),
            custom_text: Some("Project Zwaluw".to_string()),
            ..ScrubOptions::default()
        };
        let results = scrub_text("status van Project Zwaluw is groen", &opts).unwrap();
        assert!(!results[0].cleaned.contains("Project Zwaluw"));
        assert!(results[0].cleaned.contains("CUSTOM-"));
    }

    #[test]
    fn test_markdown_link_round_trip() {
        let opts = ScrubOptions {
            locale: Some(Locale::EnUs),
            ..ScrubOptions::default()
        };
        let results = scrub_text("see [Example](http://example.com) here", &opts).unwrap();
        let cleaned = &results[0].cleaned;
        assert!(cleaned.starts_with("see [Example](URL-"));
        assert!(cleaned.ends_with(") here"));
        assert!(!cleaned.contains("example.com"));
    }

    #[test]
    fn test_session_reuse_exhausts_entity_claims() {
        let mut session = ScrubSession::new();
        let opts = dutch_options();

        let first = session
            .scrub_locale("Jan in Leiden", Locale::NlNl, &opts)
            .unwrap();
        assert!(first.cleaned.contains("LOCATION-"));

        // Entity claims persist on the session, so a second run over the
        // same session sees empty dictionaries
        let second = session
            .scrub_locale("Jan in Leiden", Locale::NlNl, &opts)
            .unwrap();
        assert_eq!(second.cleaned, "Jan in Leiden");
    }

    struct StubNerDetector;

    impl crate::detectors::Detector for StubNerDetector {
        fn name(&self) -> &str {
            "ner"
        }

        fn scan(&self, text: &str) -> Vec<Filth> {
            text.match_indices("Zwolle")
                .map(|(beg, found)| {
                    Filth::new(beg, beg + found.len(), found, Category::Location, "ner")
                })
                .collect()
        }
    }

    #[test]
    fn test_extra_detector_appended_to_catalog() {
        let mut session = ScrubSession::new();
        let opts = ScrubOptions {
            locale: Some(Locale::EnUs),
            ..ScrubOptions::default()
        };
        let scrub = session
            .scrub_locale_with(
                "kantoor in Zwolle",
                Locale::EnUs,
                &opts,
                vec![Box::new(StubNerDetector)],
            )
            .unwrap();
        assert!(scrub.cleaned.contains("LOCATION-"), "{}", scrub.cleaned);
        assert_eq!(scrub.filths[0].detector_name, "ner");
    }

    #[test]
    fn test_filths_carry_audit_fields() {
        let results = scrub_text("mail info@voorbeeld.nl", &dutch_options()).unwrap();
        let filths = &results[0].filths;
        assert_eq!(filths.len(), 1);
        assert_eq!(filths[0].category, Category::Email);
        assert_eq!(filths[0].detector_name, "email");
        assert!(filths[0]
            .replacement_string
            .as_deref()
            .unwrap()
            .starts_with("EMAIL-"));
    }
}
