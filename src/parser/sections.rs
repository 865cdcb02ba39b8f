use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::normalize::clean_fragment;
use super::strategy::{first_success, Strategy};

static HEADLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<h2[^>]*>\s*(?:<span[^>]*>\s*)?<span[^>]*class="mw-headline"[^>]*id="[^"]*"[^>]*>(.*?)</span>"#,
    )
    .unwrap()
});
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h(?:2|3)[^>]*>(.*?)</h(?:2|3)>").unwrap());

pub const MAX_SECTIONS: usize = 20;

const SECTION_STRATEGIES: &[Strategy<Vec<String>>] = &[
    Strategy {
        name: "mw-headline",
        run: headline_spans,
    },
    Strategy {
        name: "h2-h3",
        run: plain_headings,
    },
];

/// Section titles in document order, at most [`MAX_SECTIONS`]. Empty when no
/// heading shape matches; callers decide on a default.
pub fn extract_sections(region: &str) -> Vec<String> {
    match first_success(SECTION_STRATEGIES, region) {
        Some((name, sections)) => {
            debug!(strategy = name, count = sections.len(), "sections extracted");
            sections
        }
        None => {
            debug!("no section headings found");
            Vec::new()
        }
    }
}

fn headline_spans(region: &str) -> Option<Vec<String>> {
    collect_headings(&HEADLINE_RE, region)
}

fn plain_headings(region: &str) -> Option<Vec<String>> {
    collect_headings(&HEADING_RE, region)
}

fn collect_headings(re: &Regex, region: &str) -> Option<Vec<String>> {
    let sections: Vec<String> = re
        .captures_iter(region)
        .map(|c| clean_fragment(&c[1]))
        .filter(|s| !s.is_empty())
        .take(MAX_SECTIONS)
        .collect();
    if sections.is_empty() {
        None
    } else {
        Some(sections)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headline_spans_preferred() {
        let region = r#"
            <h2><span class="mw-headline" id="Early_life">Early life</span><span class="mw-editsection">[edit]</span></h2>
            <h3>Not a headline</h3>
            <h2><span class="mw-h2section"><span class="mw-headline" id="Career">Career[4]</span></span></h2>
        "#;
        assert_eq!(extract_sections(region), vec!["Early life", "Career"]);
    }

    #[test]
    fn falls_back_to_h2_h3() {
        let region = r#"
            <h2 id="Legacy">Legacy</h2>
            <div class="mw-heading3"><h3 id="Awards"><i>Awards</i> and honours</h3></div>
        "#;
        assert_eq!(extract_sections(region), vec!["Legacy", "Awards and honours"]);
    }

    #[test]
    fn drops_empty_headings() {
        let region = "<h2> </h2><h2><span></span></h2><h3>Kept</h3>";
        assert_eq!(extract_sections(region), vec!["Kept"]);
    }

    #[test]
    fn capped_at_twenty() {
        let region: String = (0..30).map(|i| format!("<h2>Section {}</h2>", i)).collect();
        let sections = extract_sections(&region);
        assert_eq!(sections.len(), MAX_SECTIONS);
        assert_eq!(sections[0], "Section 0");
        assert_eq!(sections[19], "Section 19");
    }

    #[test]
    fn no_headings_is_empty() {
        assert!(extract_sections("<p>just prose</p>").is_empty());
    }
}
