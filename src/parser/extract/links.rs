use std::collections::HashSet;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::parser::normalize::{clean_fragment, strip_and_collapse};

static WIKI_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a[^>]*href="/wiki/([^"]+)"[^>]*title="[^"]*"[^>]*>(.*?)</a>"#).unwrap()
});

pub const MAX_CANDIDATES: usize = 80;

/// Internal article link texts, in document order, capped then deduplicated.
pub fn extract(region: &str) -> Vec<String> {
    let candidates: Vec<String> = WIKI_LINK_RE
        .captures_iter(region)
        .map(|c| {
            let text = clean_fragment(&c[2]);
            if text.is_empty() {
                slug_to_text(&c[1])
            } else {
                text
            }
        })
        .filter(|t| is_article_candidate(t))
        .take(MAX_CANDIDATES)
        .collect();

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Namespace pages (`File:`, `Help:`) carry a colon; one-char and very long texts are noise.
fn is_article_candidate(text: &str) -> bool {
    let len = text.chars().count();
    !text.contains(':') && len > 1 && len < 100
}

/// `Bletchley_Park` → `Bletchley Park`; `%C3%89cole` → `École`. Undecodable slugs stay raw.
fn slug_to_text(slug: &str) -> String {
    let decoded = percent_decode_str(slug)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| slug.to_string());
    strip_and_collapse(&decoded.replace('_', " "))
}
