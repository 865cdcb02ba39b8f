use std::sync::LazyLock;

use regex::Regex;

use super::normalize::{clean_fragment, strip_and_collapse, truncate_with_ellipsis};

static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap());

/// Paragraphs at or below this many chars are captions, stubs, coordinates.
const MIN_PARAGRAPH_CHARS: usize = 50;
const SUMMARY_PARAGRAPHS: usize = 3;
const SUMMARY_MAX_CHARS: usize = 500;

pub const PLACEHOLDER_SUMMARY: &str = "A Wikipedia article";

/// Normalized prose paragraphs of the region, in document order.
pub fn extract_paragraphs(region: &str) -> Vec<String> {
    PARAGRAPH_RE
        .captures_iter(region)
        .map(|c| clean_fragment(&c[1]))
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect()
}

pub fn build_summary(paragraphs: &[String]) -> String {
    let lead = paragraphs
        .iter()
        .take(SUMMARY_PARAGRAPHS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let summary = truncate_with_ellipsis(&strip_and_collapse(&lead), SUMMARY_MAX_CHARS);
    if summary.is_empty() {
        PLACEHOLDER_SUMMARY.to_string()
    } else {
        summary
    }
}

/// Paragraphs joined by blank lines; the title stands in when nothing qualified.
pub fn plain_text(paragraphs: &[String], title: &str) -> String {
    if paragraphs.is_empty() {
        title.to_string()
    } else {
        paragraphs.join("\n\n")
    }
}
