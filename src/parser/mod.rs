pub mod blocks;
pub mod extract;
pub mod normalize;
pub mod region;
pub mod sections;
pub mod strategy;

use extract::ExtractedArticle;
use tracing::debug;

/// markup → region → {title, sections, paragraphs, links} → entities.
///
/// Never fails: every stage has a fallback. Sections may come back empty.
pub fn extract_article(html: &str, url: &str) -> ExtractedArticle {
    let title = region::extract_title(html);
    let content = region::content_region(html);

    let sections = sections::extract_sections(&content);
    let paragraphs = blocks::extract_paragraphs(&content);
    let summary = blocks::build_summary(&paragraphs);
    let plain_text = blocks::plain_text(&paragraphs, &title);

    let candidates = extract::links::extract(&content);
    let key_entities = extract::entities::classify(&candidates);

    debug!(
        url,
        sections = sections.len(),
        paragraphs = paragraphs.len(),
        links = candidates.len(),
        "article extracted"
    );

    ExtractedArticle {
        url: url.to_string(),
        title,
        summary,
        sections,
        paragraphs,
        key_entities,
        plain_text,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const TURING_URL: &str = "https://en.wikipedia.org/wiki/Alan_Turing";

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn alan_turing_scenario() {
        let a = extract_article(&fixture("alan_turing"), TURING_URL);
        assert_eq!(a.title, "Alan Turing");
        assert_eq!(a.sections, vec!["Early life"]);
        assert_eq!(a.paragraphs.len(), 3);
        assert!(a.summary.starts_with("Alan Mathison Turing"));
        assert!(!a.summary.contains("[1]"));
        assert_eq!(a.plain_text, a.paragraphs.join("\n\n"));

        // The lexical rules put "Bletchley Park" in two buckets: two capitalized
        // tokens read as a name, and "Park" is organization vocabulary.
        let e = &a.key_entities;
        assert!(e.people.contains(&"Bletchley Park".to_string()));
        assert!(e.organizations.contains(&"Bletchley Park".to_string()));
        assert!(!e.locations.contains(&"Bletchley Park".to_string()));
    }

    #[test]
    fn navigation_links_excluded() {
        let a = extract_article(&fixture("alan_turing"), TURING_URL);
        let all: Vec<&String> = a
            .key_entities
            .people
            .iter()
            .chain(&a.key_entities.organizations)
            .chain(&a.key_entities.locations)
            .collect();
        assert!(all.iter().all(|t| !t.contains("Main Page")));
    }

    #[test]
    fn extraction_is_idempotent() {
        let html = fixture("alan_turing");
        let first = extract_article(&html, TURING_URL);
        let second = extract_article(&html, TURING_URL);
        assert_eq!(first, second);
    }

    #[test]
    fn main_region_fallback() {
        let a = extract_article(&fixture("main_fallback"), "https://en.wikipedia.org/wiki/Ada_Lovelace");
        assert_eq!(a.title, "Ada Lovelace");
        assert!(!a.paragraphs.is_empty());
        assert!(a.paragraphs[0].starts_with("Augusta Ada King"));
        assert!(a.paragraphs.iter().all(|p| !p.contains("outside the main region")));
    }

    #[test]
    fn no_sections_left_empty_by_extractor() {
        let a = extract_article(&fixture("no_sections"), "https://en.wikipedia.org/wiki/Stub");
        assert!(a.sections.is_empty());
        assert_eq!(a.with_default_sections().sections, vec!["Overview", "History", "References"]);
    }

    #[test]
    fn malformed_markup_degrades() {
        let a = extract_article("<div><p>unclosed <b>markup", "https://en.wikipedia.org/wiki/Broken");
        assert_eq!(a.title, region::PLACEHOLDER_TITLE);
        assert!(a.sections.is_empty());
        assert!(a.paragraphs.is_empty());
        assert_eq!(a.summary, blocks::PLACEHOLDER_SUMMARY);
        assert_eq!(a.plain_text, region::PLACEHOLDER_TITLE);
        assert_eq!(a.key_entities, extract::KeyEntities::default());
    }
}
