// WHY: dictionary scanning must be O(text + patterns), not O(text * patterns);
// a single Aho-Corasick pass over a case-folded copy replaces per-entity regex
// loops. Precision comes from the filter cascade, not from the automaton.

use aho_corasick::AhoCorasick;
use anyhow::Result;
use std::collections::HashSet;
use tracing::debug;

use crate::entities::{load_entities, DedupCache};
use crate::filth::{resolve_overlaps, Category, Filth};
use crate::locale::Locale;
use crate::normalize::{fold_case, normalize, normalize_entity};

use super::{Detector, DetectorContext};

struct Entity {
    original: String,
    /// Normalized form used by the fallback matcher
    norm: String,
    norm_chars: usize,
    multi_word: bool,
}

/// Entity-list detector for one category (location, organization, name).
///
/// Builds its automaton once at construction; scanning is a single pass plus
/// an optional normalized fallback pass for multi-word entities obscured by
/// extraction artifacts.
pub struct EntityDetector {
    name: &'static str,
    category: Category,
    locale: Locale,
    entities: Vec<Entity>,
    automaton: AhoCorasick,
}

impl EntityDetector {
    pub fn new(
        name: &'static str,
        category: Category,
        ctx: &DetectorContext,
        dedup: &mut DedupCache,
    ) -> Result<Self> {
        let loaded = load_entities(ctx.data_dir.as_deref(), ctx.locale, category);
        // Cross-category dedup: entities claimed by a higher-priority
        // category (earlier in the registry) are dropped here
        let survivors = dedup.filter_and_claim(loaded);

        let patterns: Vec<String> = survivors.iter().map(|e| e.to_lowercase()).collect();
        let automaton = AhoCorasick::new(&patterns)?;

        let entities = survivors
            .into_iter()
            .map(|original| {
                let norm = normalize_entity(&original);
                let norm_chars = norm.chars().count();
                let multi_word = original.split_whitespace().count() > 1;
                Entity {
                    original,
                    norm,
                    norm_chars,
                    multi_word,
                }
            })
            .collect::<Vec<_>>();

        debug!("Detector {} holds {} entities", name, entities.len());
        Ok(Self {
            name,
            category,
            locale: ctx.locale,
            entities,
            automaton,
        })
    }

    fn candidate(&self, text: &str, beg: usize, end: usize) -> Option<Filth> {
        let matched = &text[beg..end];
        if !passes_filters(text, beg, end, self.category, self.locale) {
            return None;
        }
        Some(Filth::new(beg, end, matched, self.category, self.name))
    }
}

impl Detector for EntityDetector {
    fn name(&self) -> &str {
        self.name
    }

    fn scan(&self, text: &str) -> Vec<Filth> {
        if self.entities.is_empty() || text.is_empty() {
            return Vec::new();
        }

        let folded = fold_case(text);
        let mut matched: HashSet<usize> = HashSet::new();
        let mut candidates = Vec::new();

        // Overlapping iteration so the resolver can pick longest-match-wins
        for mat in self.automaton.find_overlapping_iter(&folded.text) {
            let Some((beg, end)) = folded.original_span(mat.start(), mat.end()) else {
                continue;
            };
            if let Some(filth) = self.candidate(text, beg, end) {
                matched.insert(mat.pattern().as_usize());
                candidates.push(filth);
            }
        }

        // Normalized fallback for multi-word entities the exact pass missed:
        // zero-width characters, soft wraps, and "&"/"&amp;" vs "en" variants
        let pending: Vec<&Entity> = self
            .entities
            .iter()
            .enumerate()
            .filter(|(i, e)| e.multi_word && e.norm_chars >= 5 && !matched.contains(i))
            .map(|(_, e)| e)
            .collect();

        if !pending.is_empty() {
            let norm = normalize(text);
            for entity in pending {
                let mut from = 0;
                while let Some(rel) = norm.text[from..].find(&entity.norm) {
                    let at = from + rel;
                    let until = at + entity.norm.len();
                    if let Some((beg, end)) = norm.original_span(at, until) {
                        if let Some(filth) = self.candidate(text, beg, end) {
                            debug!(
                                "Normalized fallback matched entity {:?} at {}..{}",
                                entity.original, beg, end
                            );
                            candidates.push(filth);
                        }
                    }
                    from = until;
                }
            }
        }

        resolve_overlaps(candidates)
    }
}

/// Precision filter cascade, short-circuiting on first failure.
///
/// The entity dictionaries collide with ordinary words; these checks trade
/// recall for precision because a false positive corrupts legitimate content.
fn passes_filters(text: &str, beg: usize, end: usize, category: Category, locale: Locale) -> bool {
    let matched = &text[beg..end];

    // 1. Word boundary: neighbors must not be letters or digits
    if text[..beg]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric())
    {
        return false;
    }
    if text[end..].chars().next().is_some_and(|c| c.is_alphanumeric()) {
        return false;
    }

    // 2. Inside a URL-shaped token ("amsterdam" in www.amsterdam.nl/contact)
    if in_url_context(text, beg, end) {
        return false;
    }

    // 3. Short entities only count when capitalized in the source
    let starts_upper = matched.chars().next().is_some_and(|c| c.is_uppercase());
    if matched.chars().count() <= 3 && !starts_upper {
        return false;
    }

    // 4. All-lowercase stopword occurrences are suppressed, capitalized kept
    let has_upper = matched.chars().any(|c| c.is_uppercase());
    if !has_upper && locale.is_stopword(matched) {
        return false;
    }

    // 5. Organizations and locations are proper nouns in running text
    if matches!(category, Category::Organization | Category::Location) && !has_upper {
        return false;
    }

    // 6. A match without a single letter is never an entity
    matched.chars().any(|c| c.is_alphabetic())
}

/// Expand the span to its enclosing non-whitespace token and test whether the
/// token looks like a URL or domain+path.
fn in_url_context(text: &str, beg: usize, end: usize) -> bool {
    let token_start = text[..beg]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let token_end = text[end..]
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    let token = text[token_start..token_end].to_lowercase();
    if token.contains("://") || token.starts_with("www.") {
        return true;
    }

    // Domain+path shape: an interior dot in the part before the first slash
    if let Some(slash) = token.find('/') {
        let host = token[..slash].as_bytes();
        for i in 1..host.len().saturating_sub(1) {
            if host[i] == b'.'
                && host[i - 1].is_ascii_alphanumeric()
                && host[i + 1].is_ascii_alphanumeric()
            {
                return true;
            }
        }
    }
    false
}

pub fn build_location(ctx: &DetectorContext, dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    Ok(Box::new(EntityDetector::new(
        "location",
        Category::Location,
        ctx,
        dedup,
    )?))
}

pub fn build_organization(
    ctx: &DetectorContext,
    dedup: &mut DedupCache,
) -> Result<Box<dyn Detector>> {
    Ok(Box::new(EntityDetector::new(
        "organization",
        Category::Organization,
        ctx,
        dedup,
    )?))
}

pub fn build_name(ctx: &DetectorContext, dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    Ok(Box::new(EntityDetector::new(
        "name",
        Category::Name,
        ctx,
        dedup,
    )?))
}
