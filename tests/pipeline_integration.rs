// End-to-end pipeline tests: detector selection through placeholder substitution

use textscrub::{scrub_text, Category, Locale, ScrubOptions};

fn dutch_options() -> ScrubOptions {
    ScrubOptions {
        locale: Some(Locale::NlNl),
        ..ScrubOptions::default()
    }
}

fn scrub_one(text: &str, opts: &ScrubOptions) -> String {
    let results = scrub_text(text, opts).expect("Scrubbing should succeed");
    assert_eq!(results.len(), 1, "Exactly one locale expected");
    results.into_iter().next().unwrap().cleaned
}

#[test]
fn test_full_document_scrub() {
    let text = "Jan Jansen van Albert Heijn in Leiden is bereikbaar via \
jan.jansen@ah.nl of 0612345678. Interne host: 192.168.1.10. \
Zie ook www.voorbeeld.nl en [Handboek](https://intra.voorbeeld.nl/handboek).";

    let cleaned = scrub_one(text, &dutch_options());

    for pii in [
        "Jan",
        "Jansen",
        "Albert Heijn",
        "Leiden",
        "jan.jansen@ah.nl",
        "0612345678",
        "192.168.1.10",
        "www.voorbeeld.nl",
        "intra.voorbeeld.nl",
    ] {
        assert!(!cleaned.contains(pii), "{pii:?} should be redacted: {cleaned}");
    }
    for placeholder in [
        "NAME-",
        "ORGANIZATION-",
        "LOCATION-",
        "EMAIL-",
        "PHONE-",
        "PRIVATE_IP-",
        "URL-",
    ] {
        assert!(
            cleaned.contains(placeholder),
            "{placeholder:?} missing from: {cleaned}"
        );
    }
    // Markdown link text survives with the URL replaced
    assert!(cleaned.contains("[Handboek](URL-"));
}

#[test]
fn test_placeholders_stable_across_documents() {
    let opts = dutch_options();
    let first = scrub_one("Vergadering in Leiden", &opts);
    let second = scrub_one("De trein naar Leiden vertrekt", &opts);

    let extract = |s: &str| {
        let beg = s.find("LOCATION-").expect("placeholder present");
        s[beg..beg + "LOCATION-".len() + 4].to_string()
    };
    assert_eq!(extract(&first), extract(&second));
}

#[test]
fn test_category_priority_on_shared_entity() {
    // "Bergen" appears in the city list; even if an organization list also
    // carried it, the location claim wins via the session dedup cache
    let cleaned = scrub_one("kantoor in Bergen geopend", &dutch_options());
    assert!(cleaned.contains("LOCATION-"), "{cleaned}");
    assert!(!cleaned.contains("ORGANIZATION-"), "{cleaned}");
}

#[test]
fn test_lowercase_location_word_not_redacted() {
    let cleaned = scrub_one("we leiden het project in Leiden", &dutch_options());
    assert!(
        cleaned.starts_with("we leiden het project in LOCATION-"),
        "{cleaned}"
    );
}

#[test]
fn test_zero_width_obfuscated_entity_caught_by_fallback() {
    let text = "rapport van Al\u{200B}bert Heijn ontvangen";
    let cleaned = scrub_one(text, &dutch_options());
    assert!(cleaned.contains("ORGANIZATION-"), "{cleaned}");
    assert!(!cleaned.contains("Heijn"), "{cleaned}");
}

#[test]
fn test_soft_wrapped_sharepoint_url_single_placeholder() {
    let wrapped = "zie https://firma.sharepoint.com/sites/project/Docu\nmenten/plan.docx hier";
    let flat = "zie https://firma.sharepoint.com/sites/project/Documenten/plan.docx hier";
    let opts = dutch_options();

    let cleaned_wrapped = scrub_one(wrapped, &opts);
    let cleaned_flat = scrub_one(flat, &opts);

    // Stitched text hashes identically, so both forms yield the same output
    assert_eq!(cleaned_wrapped, cleaned_flat);
    assert!(cleaned_wrapped.contains("URL-"), "{cleaned_wrapped}");
    assert!(!cleaned_wrapped.contains("sharepoint"), "{cleaned_wrapped}");
}

#[test]
fn test_protocol_sharepoint_url_yields_single_placeholder() {
    // Both URL detectors match the identical span; the tie resolves to the
    // dedicated detector and exactly one placeholder is substituted
    let text = "open https://firm.sharepoint.com/sites/hr nu";
    let results = scrub_text(text, &dutch_options()).expect("Scrubbing should succeed");
    let filths = &results[0].filths;
    assert_eq!(filths.len(), 1, "{filths:?}");
    assert_eq!(filths[0].detector_name, "sharepoint_url");
    assert_eq!(results[0].cleaned.matches("URL-").count(), 1);
}

#[test]
fn test_split_sharepoint_fragment_not_redacted() {
    let text = "deel via share\nepoint.com/sites/x en zie sharepoint voor meer";
    let results = scrub_text(text, &dutch_options()).expect("Scrubbing should succeed");
    assert!(
        results[0].filths.iter().all(|f| f.category != Category::Url),
        "fragment should be suppressed: {:?}",
        results[0].filths
    );
}

#[test]
fn test_double_bracket_markdown_link_preserved() {
    let cleaned = scrub_one(
        "zie [[Wiki]](https://wiki.voorbeeld.nl/start) voor context",
        &dutch_options(),
    );
    assert!(cleaned.contains("[[Wiki]](URL-"), "{cleaned}");
}

#[test]
fn test_run_fails_when_no_locale_has_detectors() {
    let opts = ScrubOptions {
        locale: Some(Locale::EnUs),
        detectors: Some(vec!["location".to_string()]),
        ..ScrubOptions::default()
    };
    assert!(scrub_text("any text", &opts).is_err());
}
