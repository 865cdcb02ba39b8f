pub mod entities;
pub mod links;

use serde::{Deserialize, Serialize};

pub use entities::KeyEntities;

/// Applied by the orchestrator when the markup yields no headings at all.
pub const DEFAULT_SECTIONS: [&str; 3] = ["Overview", "History", "References"];

/// Everything pulled out of one article's markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedArticle {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub sections: Vec<String>,
    pub paragraphs: Vec<String>,
    pub key_entities: KeyEntities,
    pub plain_text: String,
}

/// The extraction-only response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePreview {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub sections: Vec<String>,
    pub key_entities: KeyEntities,
}

impl ExtractedArticle {
    /// Same article, with [`DEFAULT_SECTIONS`] when nothing was extracted.
    pub fn with_default_sections(self) -> Self {
        if !self.sections.is_empty() {
            return self;
        }
        Self {
            sections: DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect(),
            ..self
        }
    }

    pub fn preview(&self) -> ArticlePreview {
        ArticlePreview {
            url: self.url.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            sections: self.sections.clone(),
            key_entities: self.key_entities.clone(),
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn article(sections: Vec<String>) -> ExtractedArticle {
        ExtractedArticle {
            url: "https://en.wikipedia.org/wiki/X".into(),
            title: "X".into(),
            summary: "A Wikipedia article".into(),
            sections,
            paragraphs: vec![],
            key_entities: KeyEntities::default(),
            plain_text: "X".into(),
        }
    }

    #[test]
    fn default_sections_only_when_empty() {
        let a = article(vec![]).with_default_sections();
        assert_eq!(a.sections, vec!["Overview", "History", "References"]);

        let b = article(vec!["Early life".into()]).with_default_sections();
        assert_eq!(b.sections, vec!["Early life"]);
    }

    #[test]
    fn preview_serializes_camel_case() {
        let json = serde_json::to_value(article(vec!["A".into()]).preview()).unwrap();
        assert!(json.get("keyEntities").is_some());
        assert!(json.get("plainText").is_none());
        assert_eq!(json["keyEntities"]["people"], serde_json::json!([]));
    }
}
