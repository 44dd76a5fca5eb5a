// WHY: placeholders are derived from a hash of the matched text, not a
// counter, so the same entity gets the same placeholder across documents
// and across runs. Collisions under the modulus are accepted.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use md5::compute as md5_digest;
use sha2::{Digest, Sha256};

use crate::filth::{Category, Filth, FilthKind};

pub const DEFAULT_MODULUS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha256,
}

impl FromStr for HashAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" => Ok(Self::Sha256),
            other => bail!("unknown hash algorithm: {other}"),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Assigns each piece of filth a `CATEGORY-digits` placeholder, where the
/// digits are a stable hash of the category and matched text.
pub struct HashedPiiReplacer {
    algorithm: HashAlgorithm,
    modulus: u64,
    width: usize,
    cache: HashMap<(String, String), String>,
}

impl HashedPiiReplacer {
    pub fn new(algorithm: HashAlgorithm, modulus: u64) -> Self {
        let width = (modulus.saturating_sub(1).max(1)).to_string().len().max(3);
        Self {
            algorithm,
            modulus: modulus.max(1),
            width,
            cache: HashMap::new(),
        }
    }

    fn digest_prefix(&self, input: &str) -> u64 {
        let bytes: [u8; 8] = match self.algorithm {
            HashAlgorithm::Md5 => {
                let digest = md5_digest(input.as_bytes());
                digest.0[..8].try_into().unwrap_or([0; 8])
            }
            HashAlgorithm::Sha256 => {
                let digest = Sha256::digest(input.as_bytes());
                digest[..8].try_into().unwrap_or([0; 8])
            }
        };
        u64::from_be_bytes(bytes)
    }

    /// Placeholder for one category/text pair, cached per replacer
    pub fn placeholder(&mut self, category: &str, text: &str) -> String {
        let key = (category.to_string(), text.to_string());
        if let Some(existing) = self.cache.get(&key) {
            return existing.clone();
        }
        let value = self.digest_prefix(&format!("{category}:{text}")) % self.modulus;
        let placeholder = format!("{category}-{value:0width$}", width = self.width);
        self.cache.insert(key, placeholder.clone());
        placeholder
    }

    /// Fill in `replacement_string` for one piece of filth
    pub fn process(&mut self, filth: &mut Filth) {
        let category = placeholder_category(filth);
        let placeholder = self.placeholder(&category, &filth.text);
        let replacement = match &filth.kind {
            FilthKind::MarkdownLink {
                link_text,
                bracket_pairs,
            } => format!(
                "{open}{link_text}{close}({placeholder})",
                open = "[".repeat(*bracket_pairs),
                close = "]".repeat(*bracket_pairs),
            ),
            FilthKind::Plain => placeholder,
        };
        filth.replacement_string = Some(replacement);
    }
}

/// URL-shaped text gets the URL placeholder even when another detector
/// claimed it, so an organization name inside a link stays a URL
fn placeholder_category(filth: &Filth) -> String {
    let url_shaped = filth.text.starts_with("http://")
        || filth.text.starts_with("https://")
        || filth.text.starts_with("ftp://")
        || filth.text.starts_with("www.")
        || filth.text.contains("sharepoint.com/");
    if url_shaped
        || matches!(filth.kind, FilthKind::MarkdownLink { .. })
        || matches!(filth.category, Category::Url | Category::MarkdownUrl)
    {
        "URL".to_string()
    } else {
        filth.category.label().to_uppercase()
    }
}
