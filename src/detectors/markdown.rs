// WHY: a markdown link must be consumed as one construct so the replacement
// can rebuild `[text](PLACEHOLDER)` with the link text preserved. Matching
// only the URL would leave the brackets orphaned in the cleaned output.

use anyhow::Result;
use regex::Regex;

use crate::entities::DedupCache;
use crate::filth::{Category, Filth, FilthKind};

use super::{url::url_pattern, Detector, DetectorContext};

pub struct MarkdownUrlDetector {
    regex: Regex,
    url_check: Regex,
}

impl MarkdownUrlDetector {
    pub fn new() -> Result<Self> {
        // Bracket runs are captured so [[wiki-style]] doubles survive the
        // round trip; the parenthesized part is validated separately
        let regex = Regex::new(r"(\[{1,2})([^\[\]]*)(\]{1,2})\(\s*([^()]+?)\s*\)")?;
        let url_check = Regex::new(&format!(r"(?i)^{}$", url_pattern(r"\s<>")))?;
        Ok(Self { regex, url_check })
    }
}

impl Detector for MarkdownUrlDetector {
    fn name(&self) -> &str {
        "markdown_url"
    }

    fn scan(&self, text: &str) -> Vec<Filth> {
        let mut matches = Vec::new();
        for caps in self.regex.captures_iter(text) {
            let open = &caps[1];
            let close = &caps[3];
            if open.len() != close.len() {
                continue;
            }

            let raw_url = &caps[4];
            // One soft line break inside the parens is tolerated (PDF
            // exports wrap long links); more means this is not a link
            if raw_url.matches('\n').count() > 1 {
                continue;
            }
            let cleaned: String = raw_url.chars().filter(|c| !c.is_whitespace()).collect();
            let cleaned = cleaned
                .trim_end_matches(['.', ',', ';', ':'])
                .to_string();
            if !self.url_check.is_match(&cleaned) {
                continue;
            }

            let whole = caps.get(0).map(|m| (m.start(), m.end()));
            if let Some((beg, end)) = whole {
                let mut filth = Filth::new(beg, end, &cleaned, Category::MarkdownUrl, "markdown_url");
                filth.kind = FilthKind::MarkdownLink {
                    link_text: caps[2].to_string(),
                    bracket_pairs: open.len(),
                };
                matches.push(filth);
            }
        }
        matches
    }
}

pub fn build(_ctx: &DetectorContext, _dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    Ok(Box::new(MarkdownUrlDetector::new()?))
}
