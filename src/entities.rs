// WHY: entity lists are consumed, not produced; a bad or missing list must
// degrade that one category to empty instead of failing the run

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use crate::filth::Category;
use crate::locale::Locale;

/// One row of an entity list resource: `[{"match": "..."}, ...]`
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    #[serde(rename = "match")]
    pub text: String,
}

/// Default Dutch entity lists shipped with the crate; a caller-supplied data
/// directory overrides them.
const DEFAULT_NL_CITIES: &str = include_str!("../data/nl_entities/cities.json");
const DEFAULT_NL_ORGANIZATIONS: &str = include_str!("../data/nl_entities/organizations.json");
const DEFAULT_NL_NAMES: &str = include_str!("../data/nl_entities/names.json");

/// Resource file name for an entity category
pub fn entity_file_name(category: Category) -> Option<&'static str> {
    match category {
        Category::Location => Some("cities.json"),
        Category::Organization => Some("organizations.json"),
        Category::Name => Some("names.json"),
        _ => None,
    }
}

fn embedded_list(locale: Locale, category: Category) -> Option<&'static str> {
    match (locale, category) {
        (Locale::NlNl, Category::Location) => Some(DEFAULT_NL_CITIES),
        (Locale::NlNl, Category::Organization) => Some(DEFAULT_NL_ORGANIZATIONS),
        (Locale::NlNl, Category::Name) => Some(DEFAULT_NL_NAMES),
        _ => None,
    }
}

fn entity_subdir(locale: Locale) -> &'static str {
    match locale {
        Locale::NlNl => "nl_entities",
        Locale::EnUs => "en_entities",
    }
}

fn parse_entity_list(raw: &str, source: &str, locale: Locale) -> Result<Vec<String>> {
    let records: Vec<EntityRecord> =
        serde_json::from_str(raw).with_context(|| format!("Malformed entity list {source}"))?;

    let mut entities = Vec::with_capacity(records.len());
    for record in records {
        let entity = record.text.trim();
        // Skip empty strings, single characters, stopwords, and entries
        // without a single letter; these only produce false positives
        if entity.chars().count() <= 1
            || locale.is_stopword(entity)
            || !entity.chars().any(|c| c.is_alphabetic())
        {
            continue;
        }
        entities.push(entity.to_string());
    }
    debug!("Loaded {} entities from {}", entities.len(), source);
    Ok(entities)
}

/// Load the entity list for one category, preferring `data_dir` over the
/// embedded defaults. Per-file errors are downgraded to warnings and yield an
/// empty list so other categories stay unaffected.
pub fn load_entities(data_dir: Option<&Path>, locale: Locale, category: Category) -> Vec<String> {
    let Some(file_name) = entity_file_name(category) else {
        return Vec::new();
    };

    if let Some(dir) = data_dir {
        let path = dir.join(entity_subdir(locale)).join(file_name);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not read entity list {}: {}", path.display(), e);
                return Vec::new();
            }
        };
        return match parse_entity_list(&raw, &path.display().to_string(), locale) {
            Ok(entities) => entities,
            Err(e) => {
                warn!("{e:#}");
                Vec::new()
            }
        };
    }

    match embedded_list(locale, category) {
        Some(raw) => parse_entity_list(raw, file_name, locale).unwrap_or_else(|e| {
            warn!("{e:#}");
            Vec::new()
        }),
        None => Vec::new(),
    }
}

/// Run-scoped record of entity literals already claimed by a
/// higher-priority category.
///
/// Categories build in fixed priority (location, organization, name); each
/// later category drops entities an earlier one claimed, so one literal is
/// never double-classified. The cache lives inside a scrub session and is
/// discarded with it, which keeps concurrent documents isolated.
#[derive(Debug, Default)]
pub struct DedupCache {
    claimed: HashSet<String>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entities already claimed by an earlier category, then claim the
    /// survivors for this one. Returns the surviving entities.
    pub fn filter_and_claim(&mut self, entities: Vec<String>) -> Vec<String> {
        let before = entities.len();
        let survivors: Vec<String> = entities
            .into_iter()
            .filter(|e| !self.claimed.contains(&e.to_lowercase()))
            .collect();
        let filtered = before - survivors.len();
        if filtered > 0 {
            debug!("Filtered {filtered} duplicate entities claimed by a higher-priority category");
        }
        for entity in &survivors {
            self.claimed.insert(entity.to_lowercase());
        }
        survivors
    }

    pub fn is_claimed(&self, entity: &str) -> bool {
        self.claimed.contains(&entity.to_lowercase())
    }
}
