// WHY: one IPv4 literal must be claimed by exactly one of the two IP
// detectors. The regex crate has no lookaround, so the original negative
// lookahead becomes an explicit octet range check with the same outcome.

use anyhow::Result;
use regex::Regex;

use crate::entities::DedupCache;
use crate::filth::{Category, Filth};

use super::{Detector, DetectorContext};

const IPV4_PATTERN: &str = r"\b(?:\d{1,3}\.){3}\d{1,3}\b";

fn parse_octets(literal: &str) -> Option<[u8; 4]> {
    let mut octets = [0u8; 4];
    let mut parts = literal.split('.');
    for octet in &mut octets {
        *octet = parts.next()?.parse().ok()?;
    }
    Some(octets)
}

/// Private ranges: 192.168.0.0/16, 10.0.0.0/16, 172.16.0.0/12
fn is_private(octets: [u8; 4]) -> bool {
    matches!(
        octets,
        [192, 168, _, _] | [10, 0, _, _] | [172, 16..=31, _, _]
    )
}

struct IpDetector {
    name: &'static str,
    category: Category,
    regex: Regex,
    want_private: bool,
}

impl Detector for IpDetector {
    fn name(&self) -> &str {
        self.name
    }

    fn scan(&self, text: &str) -> Vec<Filth> {
        self.regex
            .find_iter(text)
            .filter_map(|m| {
                let octets = parse_octets(m.as_str())?;
                if is_private(octets) == self.want_private {
                    Some(Filth::new(
                        m.start(),
                        m.end(),
                        m.as_str(),
                        self.category,
                        self.name,
                    ))
                } else {
                    None
                }
            })
            .collect()
    }
}

pub fn build_private(_ctx: &DetectorContext, _dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    Ok(Box::new(IpDetector {
        name: "private_ip",
        category: Category::PrivateIp,
        regex: Regex::new(IPV4_PATTERN)?,
        want_private: true,
    }))
}

pub fn build_public(_ctx: &DetectorContext, _dedup: &mut DedupCache) -> Result<Box<dyn Detector>> {
    Ok(Box::new(IpDetector {
        name: "public_ip",
        category: Category::PublicIp,
        regex: Regex::new(IPV4_PATTERN)?,
        want_private: false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn detectors() -> (Box<dyn Detector>, Box<dyn Detector>) {
        let ctx = DetectorContext::new(Locale::EnUs);
        let mut dedup = DedupCache::new();
        (
            build_private(&ctx, &mut dedup).unwrap(),
            build_public(&ctx, &mut dedup).unwrap(),
        )
    }

    #[test]
    fn test_each_literal_claimed_by_one_detector() {
        let (private, public) = detectors();
        let text = "hosts: 10.0.0.5 and 8.8.8.8";

        let private_hits = private.scan(text);
        assert_eq!(private_hits.len(), 1);
        assert_eq!(private_hits[0].text, "10.0.0.5");
        assert_eq!(private_hits[0].category, Category::PrivateIp);

        let public_hits = public.scan(text);
        assert_eq!(public_hits.len(), 1);
        assert_eq!(public_hits[0].text, "8.8.8.8");
        assert_eq!(public_hits[0].category, Category::PublicIp);
    }

    #[test]
    fn test_172_range_boundaries() {
        let (private, public) = detectors();
        let text = "172.15.1.1 172.16.0.1 172.31.255.254 172.32.0.1";

        let private_texts: Vec<String> =
            private.scan(text).into_iter().map(|f| f.text).collect();
        assert_eq!(private_texts, vec!["172.16.0.1", "172.31.255.254"]);

        let public_texts: Vec<String> =
            public.scan(text).into_iter().map(|f| f.text).collect();
        assert_eq!(public_texts, vec!["172.15.1.1", "172.32.0.1"]);
    }

    #[test]
    fn test_invalid_octets_skipped() {
        let (private, public) = detectors();
        let text = "999.999.999.999 is not an address";
        assert!(private.scan(text).is_empty());
        assert!(public.scan(text).is_empty());
    }

    #[test]
    fn test_version_strings_not_matched() {
        let (_, public) = detectors();
        assert!(public.scan("upgrade to v2.3.4 today").is_empty());
    }
}
