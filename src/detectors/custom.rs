use anyhow::{bail, Result};

use crate::entities::DedupCache;
use crate::filth::{Category, Filth};

use super::{Detector, DetectorContext};

/// Redacts every literal occurrence of one caller-supplied string. No
/// boundary heuristics apply: the caller asked for exactly this text.
pub struct CustomWordDetector {
    needle: String,
}

impl Detector for CustomWordDetector {
    fn name(&self) -> &str {
        "custom"
    }

    fn scan(&self, text: &str) -> Vec<Filth> {
        text.match_indices(self.needle.as_str())
            .map(|(beg, found)| {
                Filth::new(beg, beg + found.len(), found, Category::Custom, "custom")
            })
            .collect()
    }
}

pub fn build(ctx: &DetectorContext, _dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    let needle = match ctx.custom_text.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => bail!("custom detector requires a non-empty literal"),
    };
    Ok(Box::new(CustomWordDetector { needle }))
}
