use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::normalize::clean_fragment;
use super::strategy::{first_success, Strategy};

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<h1[^>]*id="firstHeading"[^>]*>(.*?)</h1>"#).unwrap());
static CONTENT_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<div[^>]*id="mw-content-text"[^>]*>(.*?)(?:<div[^>]*id="mw-navigation"|</div>\s*</div>)"#,
    )
    .unwrap()
});
static MAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<main[^>]*>(.*?)</main>").unwrap());

pub const PLACEHOLDER_TITLE: &str = "Wikipedia Article";

const TITLE_STRATEGIES: &[Strategy<String>] = &[Strategy {
    name: "first-heading",
    run: first_heading,
}];

const REGION_STRATEGIES: &[Strategy<String>] = &[
    Strategy {
        name: "mw-content-text",
        run: content_text_div,
    },
    Strategy {
        name: "main",
        run: main_element,
    },
    Strategy {
        name: "document",
        run: whole_document,
    },
];

pub fn extract_title(html: &str) -> String {
    match first_success(TITLE_STRATEGIES, html) {
        Some((name, title)) => {
            debug!(strategy = name, "title located");
            title
        }
        None => {
            debug!("no title heading, using placeholder");
            PLACEHOLDER_TITLE.to_string()
        }
    }
}

/// The slice of markup holding article prose. Degrades to the whole document.
pub fn content_region(html: &str) -> String {
    match first_success(REGION_STRATEGIES, html) {
        Some((name, region)) => {
            debug!(strategy = name, chars = region.len(), "content region located");
            region
        }
        None => html.to_string(),
    }
}

fn first_heading(html: &str) -> Option<String> {
    TITLE_RE.captures(html).map(|c| clean_fragment(&c[1]))
}

fn content_text_div(html: &str) -> Option<String> {
    CONTENT_TEXT_RE.captures(html).map(|c| c[1].to_string())
}

fn main_element(html: &str) -> Option<String> {
    MAIN_RE.captures(html).map(|c| c[1].to_string())
}

fn whole_document(html: &str) -> Option<String> {
    Some(html.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_first_heading() {
        let html = r#"<h1 id="firstHeading" class="firstHeading"><span class="mw-page-title-main">Alan Turing</span></h1>"#;
        assert_eq!(extract_title(html), "Alan Turing");
    }

    #[test]
    fn title_strips_citations() {
        let html = r#"<h1 class="x" id="firstHeading">Ada  Lovelace[1]</h1>"#;
        assert_eq!(extract_title(html), "Ada Lovelace");
    }

    #[test]
    fn title_placeholder() {
        assert_eq!(extract_title("<h1>No id here</h1>"), PLACEHOLDER_TITLE);
    }

    #[test]
    fn region_from_content_text_stops_at_navigation() {
        let html = r#"<div id="mw-content-text" class="mw-body-content"><p>inside</p><div id="mw-navigation"><p>nav</p></div>"#;
        let region = content_region(html);
        assert!(region.contains("inside"));
        assert!(!region.contains("nav"));
    }

    #[test]
    fn region_from_content_text_stops_at_double_close() {
        let html = r#"<div id="mw-content-text"><p>one</p></div>
            </div><p>footer</p>"#;
        let region = content_region(html);
        assert_eq!(region, "<p>one</p>");
    }

    #[test]
    fn region_falls_back_to_main() {
        let html = "<header>chrome</header><MAIN class=\"x\"><p>body</p></MAIN><footer>f</footer>";
        assert_eq!(content_region(html), "<p>body</p>");
    }

    #[test]
    fn region_falls_back_to_document() {
        let html = "<body><p>loose</p></body>";
        assert_eq!(content_region(html), html);
    }
}
