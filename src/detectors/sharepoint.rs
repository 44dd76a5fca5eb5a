// WHY: SharePoint links in exported documents soft-wrap mid-path. The
// generic URL detector stops at whitespace, so a dedicated pattern lets the
// path continue across a single line break and stitches it back together.

use anyhow::Result;
use regex::Regex;

use crate::entities::DedupCache;
use crate::filth::{Category, Filth};

use super::{Detector, DetectorContext};

pub struct SharepointUrlDetector {
    regex: Regex,
}

impl SharepointUrlDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            regex: Regex::new(r"(?i)\bhttps?://[a-z0-9.-]*sharepoint\.com/(?:[^\s<>)\]]|\n)+")?,
        })
    }
}

impl Detector for SharepointUrlDetector {
    fn name(&self) -> &str {
        "sharepoint_url"
    }

    fn scan(&self, text: &str) -> Vec<Filth> {
        let mut matches = Vec::new();
        for m in self.regex.find_iter(text) {
            let raw = m.as_str();
            // One wrap is a soft line break; two or more means the pattern
            // ran into unrelated following lines
            if raw.matches('\n').count() > 1 {
                continue;
            }

            // Shrink the span first, then strip the inner line break
            let trimmed = raw
                .trim_end_matches(|c: char| {
                    c.is_whitespace() || matches!(c, ']' | ')' | '.' | ',' | ';' | ':' | '>' | '\'' | '"')
                });
            if trimmed.is_empty() {
                continue;
            }
            let end = m.start() + trimmed.len();
            let stitched: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

            matches.push(Filth::new(
                m.start(),
                end,
                &stitched,
                Category::Url,
                "sharepoint_url",
            ));
        }
        matches
    }
}

pub fn build(_ctx: &DetectorContext, _dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    Ok(Box::new(SharepointUrlDetector::new()?))
}
