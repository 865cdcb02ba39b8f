use std::sync::LazyLock;

use regex::Regex;

static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

const ELLIPSIS: char = '…';

/// Drop `[12]`-style citation markers, collapse whitespace runs, trim.
pub fn strip_and_collapse(raw: &str) -> String {
    let without_citations = CITATION_RE.replace_all(raw, "");
    WHITESPACE_RE
        .replace_all(&without_citations, " ")
        .trim()
        .to_string()
}

/// Replace every markup tag with a space so adjacent words stay apart.
pub fn strip_tags(fragment: &str) -> String {
    TAG_RE.replace_all(fragment, " ").into_owned()
}

/// Tag-strip then normalize; the treatment every extracted fragment gets.
pub fn clean_fragment(fragment: &str) -> String {
    strip_and_collapse(&strip_tags(fragment))
}

/// Normalize, then cut to at most `max_chars` characters, ending in `…` when cut.
///
/// Lengths are counted in chars. A zero budget yields an empty string.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let normalized = strip_and_collapse(text);
    if normalized.chars().count() <= max_chars {
        return normalized;
    }
    if max_chars == 0 {
        return String::new();
    }

    let head: String = normalized.chars().take(max_chars - 1).collect();
    let mut out = head.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}
