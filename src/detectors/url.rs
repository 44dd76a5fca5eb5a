// WHY: bare-domain matching is the loosest pattern in the catalog, so it
// carries the most post-match heuristics: proper-noun rejection for
// mixed-case bare domains, and suppression of "sharepoint.com" fragments
// that PDF extraction splits across line breaks.

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::entities::DedupCache;
use crate::filth::{Category, Filth};

use super::{Detector, DetectorContext};

/// Curated TLD alternation shared by the URL-family detectors
pub const COMMON_TLDS: &str = "com|net|org|edu|gov|mil|biz|info|name|museum|coop|aero|\
[a-z][a-z]|nl|uk|us|eu|de|fr|es|it|ru|cn|jp|br|pl|in|au|\
dev|app|io|ai|cloud|digital|tech|online|site|web|blog|shop|store|\
academy|agency|business|center|company|consulting|foundation|institute|\
international|management|marketing|solutions|technology|university|\
systems|services|support|science|software|studio|training|ventures|\
sharepoint|microsoft";

/// Protocol, www-prefixed, and bare domain forms; `terminator` is the
/// character class that ends the path portion.
pub fn url_pattern(terminator: &str) -> String {
    format!(
        r"(?:(?:https?://(?:www\.)?|ftp://)(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)*[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.(?:{tlds})(?:/[^{term}]*)?|(?:www\.)?(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)*[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.(?:{tlds})(?:/[^{term}]*)?)",
        tlds = COMMON_TLDS,
        term = terminator,
    )
}

pub struct BareDomainDetector {
    regex: Regex,
}

impl BareDomainDetector {
    pub fn new() -> Result<Self> {
        let pattern = format!(r"(?i)\b{}\b", url_pattern(r"\s<>"));
        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }
}

impl Detector for BareDomainDetector {
    fn name(&self) -> &str {
        "url"
    }

    fn scan(&self, text: &str) -> Vec<Filth> {
        let mut matches = Vec::new();
        for m in self.regex.find_iter(text) {
            let start = m.start();
            let prev = text[..start].chars().next_back();
            // No lookbehind in the regex crate: reject email local parts and
            // markdown/parenthesized contexts by inspecting the neighbor
            if matches!(prev, Some('@') | Some('(') | Some('[')) {
                continue;
            }

            let raw = m.as_str();
            let lower = raw.to_lowercase();
            let has_protocol = lower.starts_with("http://")
                || lower.starts_with("https://")
                || lower.starts_with("ftp://")
                || lower.starts_with("www.");
            if !has_protocol && prev == Some('.') {
                continue;
            }

            // Trim punctuation that clings to URLs in exported text
            let trimmed = raw.trim_end_matches([']', ')', '.', ',', ';', ':', '>']);
            if trimmed.is_empty() {
                continue;
            }
            let end = start + trimmed.len();

            // Mixed-case bare domains are usually proper nouns ("Firma.Workshop")
            if !has_protocol && trimmed.chars().any(|c| c.is_uppercase()) {
                continue;
            }

            let host = trimmed
                .split('/')
                .next()
                .unwrap_or(trimmed)
                .to_lowercase();
            if host.ends_with("point.com") && is_sharepoint_fragment(text, start, end, &host) {
                debug!("Suppressed sharepoint fragment {host:?} at {start}");
                continue;
            }

            matches.push(Filth::new(start, end, trimmed, Category::Url, "url"));
        }
        matches
    }
}

/// Lowercased text reduced to ASCII letters and digits, used to compare
/// domain fragments across whitespace and punctuation.
fn squeeze(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn snap_back(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn snap_forward(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i.min(text.len())
}

/// Layered check for "sharepoint.com" split across a line or word break.
///
/// PDF extraction produces look-alike hosts ("epoint.com", "harepoint.com");
/// a local window, recomposed prefixes, a wide window, the whole document,
/// and the current line are each consulted. The cascade is deliberately kept
/// as-is for output compatibility with earlier revisions.
fn is_sharepoint_fragment(text: &str, start: usize, end: usize, host: &str) -> bool {
    const WINDOW: usize = 20;
    let prev = squeeze(&text[snap_back(text, start.saturating_sub(WINDOW))..start]);
    let next = squeeze(&text[end..snap_forward(text, end + WINDOW)]);

    if prev.ends_with("share") || next.starts_with("share") {
        return true;
    }

    // Recompose candidate full domains to catch wider splits
    let target = "sharepoint.com";
    let prev_tail = &prev[prev.len().saturating_sub(6)..];
    if format!("{prev_tail}{host}").starts_with(target) {
        return true;
    }
    let next_head = &next[..next.len().min(6)];
    if format!("{host}{next_head}").starts_with(target) {
        return true;
    }
    if format!("{}{}{}", prev, squeeze(host), next).contains("sharepointcom") {
        return true;
    }

    // Known fragment hosts get progressively wider context checks
    if matches!(host, "epoint.com" | "harepoint.com" | "point.com") {
        let wide_beg = snap_back(text, start.saturating_sub(1500));
        let wide_end = snap_forward(text, end.saturating_add(1500));
        if squeeze(&text[wide_beg..wide_end]).contains("sharepoint") {
            return true;
        }
        if squeeze(text).contains("sharepoint") {
            return true;
        }
        let line_beg = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = text[end..].find('\n').map(|i| end + i).unwrap_or(text.len());
        if squeeze(&text[line_beg..line_end]).contains("sharepoint") {
            return true;
        }
    }
    false
}

pub fn build(_ctx: &DetectorContext, _dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    Ok(Box::new(BareDomainDetector::new()?))
}
