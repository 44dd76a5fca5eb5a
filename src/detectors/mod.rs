// WHY: statically-declared detector catalog instead of runtime registration.
// Declaration order is load-bearing twice over: sharepoint/markdown must
// precede the generic URL detector, and the locale entity order is the
// cross-category dedup priority.

use anyhow::Result;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::entities::DedupCache;
use crate::filth::Filth;
use crate::locale::Locale;
use std::path::PathBuf;

pub mod contact;
pub mod custom;
pub mod entity;
pub mod ip;
pub mod markdown;
pub mod sharepoint;
pub mod url;

/// Capability interface every detector family implements: one pass over the
/// text, candidates out. Callers may supply extra implementations (for
/// example an external NER backend) alongside the built-in catalog.
pub trait Detector {
    fn name(&self) -> &str;
    fn scan(&self, text: &str) -> Vec<Filth>;
}

/// Parameters for detector construction, fixed for one run
#[derive(Debug, Clone)]
pub struct DetectorContext {
    pub locale: Locale,
    /// Entity-list root; `None` uses the embedded defaults
    pub data_dir: Option<PathBuf>,
    /// Caller-supplied literal that is always redacted when present
    pub custom_text: Option<String>,
}

impl DetectorContext {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            data_dir: None,
            custom_text: None,
        }
    }
}

/// Whether a detector is locale-independent or tied to per-locale resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorScope {
    Generic,
    Locale,
}

type BuildFn = fn(&DetectorContext, &mut DedupCache) -> Result<Box<dyn Detector>>;

/// Declarative description of one detector in the catalog
pub struct DetectorSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub scope: DetectorScope,
    pub enabled_by_default: bool,
    enabled: fn(&DetectorContext) -> bool,
    build: BuildFn,
}

fn always(_ctx: &DetectorContext) -> bool {
    true
}

fn dutch_only(ctx: &DetectorContext) -> bool {
    ctx.locale == Locale::NlNl
}

fn custom_text_present(ctx: &DetectorContext) -> bool {
    ctx.custom_text.as_deref().is_some_and(|t| !t.trim().is_empty())
}

static REGISTRY: [DetectorSpec; 11] = [
    DetectorSpec {
        name: "email",
        description: "Detect email addresses (e.g., user@example.com)",
        scope: DetectorScope::Generic,
        enabled_by_default: true,
        enabled: always,
        build: contact::build_email,
    },
    DetectorSpec {
        name: "phone",
        description: "Detect phone numbers",
        scope: DetectorScope::Generic,
        enabled_by_default: true,
        enabled: always,
        build: contact::build_phone,
    },
    // sharepoint_url and markdown_url must come before url: their longer
    // spans win overlap resolution only when emitted first on ties
    DetectorSpec {
        name: "sharepoint_url",
        description: "Detect SharePoint URLs, including soft-wrapped exports",
        scope: DetectorScope::Generic,
        enabled_by_default: true,
        enabled: always,
        build: sharepoint::build,
    },
    DetectorSpec {
        name: "markdown_url",
        description: "Detect URLs within Markdown links [text](url)",
        scope: DetectorScope::Generic,
        enabled_by_default: true,
        enabled: always,
        build: markdown::build,
    },
    DetectorSpec {
        name: "url",
        description:
            "Detect URLs (bare domains, www prefixes, http(s), complex paths, query parameters)",
        scope: DetectorScope::Generic,
        enabled_by_default: true,
        enabled: always,
        build: url::build,
    },
    DetectorSpec {
        name: "private_ip",
        description: "Detect private IP addresses (192.168.x.x, 10.0.x.x, 172.16-31.x.x)",
        scope: DetectorScope::Generic,
        enabled_by_default: true,
        enabled: always,
        build: ip::build_private,
    },
    DetectorSpec {
        name: "public_ip",
        description: "Detect public IP addresses (any non-private IP)",
        scope: DetectorScope::Generic,
        enabled_by_default: true,
        enabled: always,
        build: ip::build_public,
    },
    DetectorSpec {
        name: "custom",
        description: "Detect a caller-supplied literal that is always redacted",
        scope: DetectorScope::Generic,
        enabled_by_default: true,
        enabled: custom_text_present,
        build: custom::build,
    },
    // Locale entity detectors; declaration order is the dedup priority
    DetectorSpec {
        name: "location",
        description: "Detect Dutch locations (cities)",
        scope: DetectorScope::Locale,
        enabled_by_default: true,
        enabled: dutch_only,
        build: entity::build_location,
    },
    DetectorSpec {
        name: "organization",
        description: "Detect Dutch organization names",
        scope: DetectorScope::Locale,
        enabled_by_default: true,
        enabled: dutch_only,
        build: entity::build_organization,
    },
    DetectorSpec {
        name: "name",
        description: "Detect Dutch person names",
        scope: DetectorScope::Locale,
        enabled_by_default: true,
        enabled: dutch_only,
        build: entity::build_name,
    },
];

/// The full detector catalog in declaration order
pub fn registry() -> &'static [DetectorSpec] {
    &REGISTRY
}

/// Name and description of every detector available for a locale
pub fn detector_catalog(locale: Locale) -> Vec<(&'static str, &'static str)> {
    let ctx = DetectorContext::new(locale);
    registry()
        .iter()
        .filter(|spec| (spec.enabled)(&ctx))
        .map(|spec| (spec.name, spec.description))
        .collect()
}

/// Construct fresh detector instances for one run.
///
/// Explicit `requested` names are lowercased and intersected with the enabled
/// set; unknown names are warned about and skipped. Without a request the
/// default-enabled subset is used. Build failures are downgraded to warnings
/// so one broken detector never aborts the run.
pub fn select_detectors(
    ctx: &DetectorContext,
    requested: Option<&[String]>,
    dedup: &mut DedupCache,
) -> Vec<Box<dyn Detector>> {
    let enabled: Vec<&DetectorSpec> = registry()
        .iter()
        .filter(|spec| (spec.enabled)(ctx))
        .collect();

    let chosen: Vec<&DetectorSpec> = match requested {
        Some(names) => {
            let wanted: BTreeSet<String> = names.iter().map(|n| n.to_lowercase()).collect();
            let known: BTreeSet<&str> = enabled.iter().map(|s| s.name).collect();
            let unknown: Vec<&str> = wanted
                .iter()
                .map(String::as_str)
                .filter(|n| !known.contains(n))
                .collect();
            if !unknown.is_empty() {
                warn!(
                    "Invalid detector(s) for locale {}: {}",
                    ctx.locale,
                    unknown.join(", ")
                );
            }
            enabled
                .into_iter()
                .filter(|spec| wanted.contains(spec.name))
                .collect()
        }
        None => enabled
            .into_iter()
            .filter(|spec| spec.enabled_by_default)
            .collect(),
    };

    let mut detectors: Vec<Box<dyn Detector>> = Vec::with_capacity(chosen.len());
    for spec in chosen {
        match (spec.build)(ctx, dedup) {
            Ok(detector) => {
                debug!("Built detector {}", spec.name);
                detectors.push(detector);
            }
            Err(e) => warn!("Could not add detector {}: {e:#}", spec.name),
        }
    }
    detectors
}
