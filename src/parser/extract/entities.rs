use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static CAPITALIZED_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\b").unwrap());
static ORGANIZATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:University|Institute|Company|Corporation|Agency|Committee|Organization|Park|Laboratory|Museum|Library|Foundation|Trust|School|College)\b",
    )
    .unwrap()
});
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:Kingdom|United States|England|London|France|Germany|Italy|India|China|Japan|City|County|Province|State|Region|District|Borough)\b",
    )
    .unwrap()
});

pub const MAX_PER_CATEGORY: usize = 10;

/// Lexically guessed entities. Categories overlap; each keeps first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntities {
    pub people: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
}

/// Bucket deduplicated link candidates. These are crude word rules, not NER.
pub fn classify(candidates: &[String]) -> KeyEntities {
    KeyEntities {
        people: pick(candidates, looks_like_person),
        organizations: pick(candidates, |t| ORGANIZATION_RE.is_match(t)),
        locations: pick(candidates, |t| LOCATION_RE.is_match(t)),
    }
}

fn looks_like_person(text: &str) -> bool {
    CAPITALIZED_WORD_RE.is_match(text) && text.split(' ').count() >= 2
}

fn pick(candidates: &[String], rule: impl Fn(&str) -> bool) -> Vec<String> {
    candidates
        .iter()
        .filter(|c| rule(c))
        .take(MAX_PER_CATEGORY)
        .cloned()
        .collect()
}
