// WHY: single exchange type between detectors and the placeholder post-processor
// Tagged payload replaces per-detector subtypes so downstream code pattern-matches

use serde::Serialize;

/// PII classification of a detected span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Location,
    Organization,
    Name,
    Email,
    Phone,
    PrivateIp,
    PublicIp,
    Url,
    MarkdownUrl,
    Custom,
}

impl Category {
    /// Lowercase label used in audit output and placeholder derivation
    pub fn label(&self) -> &'static str {
        match self {
            Category::Location => "location",
            Category::Organization => "organization",
            Category::Name => "name",
            Category::Email => "email",
            Category::Phone => "phone",
            Category::PrivateIp => "private_ip",
            Category::PublicIp => "public_ip",
            Category::Url => "url",
            Category::MarkdownUrl => "markdown_url",
            Category::Custom => "custom",
        }
    }
}

/// Detector-specific payload carried by a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FilthKind {
    /// Plain span; substitution replaces the span with the placeholder verbatim
    Plain,
    /// Markdown link; substitution reconstructs `[text](PLACEHOLDER)` keeping
    /// the original bracket nesting
    MarkdownLink {
        link_text: String,
        bracket_pairs: usize,
    },
}

/// A detected PII span with category, source detector, and (after
/// post-processing) its replacement string.
///
/// Offsets are half-open byte positions into the scanned text with
/// `beg < end`. For plain matches `text` equals the source slice; URL-family
/// detectors may store a cleaned form (soft-wrap whitespace removed) used for
/// placeholder hashing.
#[derive(Debug, Clone, Serialize)]
pub struct Filth {
    pub beg: usize,
    pub end: usize,
    pub text: String,
    pub category: Category,
    pub detector_name: String,
    pub replacement_string: Option<String>,
    pub kind: FilthKind,
}

impl Filth {
    pub fn new(
        beg: usize,
        end: usize,
        text: impl Into<String>,
        category: Category,
        detector_name: impl Into<String>,
    ) -> Self {
        Self {
            beg,
            end,
            text: text.into(),
            category,
            detector_name: detector_name.into(),
            replacement_string: None,
            kind: FilthKind::Plain,
        }
    }

    /// Byte length of the matched span
    pub fn len(&self) -> usize {
        self.end - self.beg
    }

    pub fn is_empty(&self) -> bool {
        self.beg == self.end
    }

    /// True when the two spans intersect
    pub fn overlaps(&self, other: &Filth) -> bool {
        self.beg < other.end && other.beg < self.end
    }
}

/// Select a maximal non-overlapping subset of candidate spans.
///
/// Candidates are ranked longest-first, then leftmost; ties keep insertion
/// order, so earlier detectors win over later ones for identical spans.
/// Accepted spans come back sorted by start offset.
pub fn resolve_overlaps(mut candidates: Vec<Filth>) -> Vec<Filth> {
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.beg.cmp(&b.beg)));

    let mut accepted: Vec<Filth> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if accepted.iter().all(|kept| !kept.overlaps(&candidate)) {
            accepted.push(candidate);
        }
    }

    accepted.sort_by_key(|f| f.beg);
    accepted
}
