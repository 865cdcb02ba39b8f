use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{QuizError, Result, StoreError};
use crate::fetch::Fetcher;
use crate::fingerprint::fingerprint;
use crate::parser::extract::{ArticlePreview, ExtractedArticle};
use crate::parser::extract_article;
use crate::quiz::generate_quiz;
use crate::store::{HistoryEntry, NewQuizRecord, QuizStore, StoredQuizRecord};
use crate::validate::validate_article_url;

#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub url: String,
    pub force_regenerate: bool,
    pub store_raw_html: bool,
}

/// Fetched markup turned into a storable record. Pure apart from the option shuffle.
pub fn build_record(html: &str, url: &str, keep_raw_html: bool) -> NewQuizRecord {
    let article = extract_article(html, url).with_default_sections();
    let content_hash = fingerprint(&article.plain_text);
    let generated = generate_quiz(&article);
    let ExtractedArticle {
        url,
        title,
        summary,
        sections,
        key_entities,
        ..
    } = article;

    NewQuizRecord {
        url,
        title,
        summary,
        sections,
        key_entities,
        quiz: generated.quiz,
        related_topics: generated.related_topics,
        content_hash,
        raw_html: keep_raw_html.then(|| html.to_string()),
    }
}

/// Validation → cache lookup → fetch → extract → synthesize → store.
pub struct QuizService {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn QuizStore>,
}

impl QuizService {
    pub fn new(fetcher: Arc<dyn Fetcher>, store: Arc<dyn QuizStore>) -> Self {
        Self { fetcher, store }
    }

    pub fn store(&self) -> &Arc<dyn QuizStore> {
        &self.store
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetcher> {
        &self.fetcher
    }

    /// Extraction only; nothing is stored.
    pub async fn preview(&self, url: &str) -> Result<ArticlePreview> {
        let url = url.trim();
        validate_article_url(url)?;
        let html = self.fetcher.fetch(url).await?;
        Ok(extract_article(&html, url).with_default_sections().preview())
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<StoredQuizRecord> {
        let url = request.url.trim();
        validate_article_url(url)?;

        if !request.force_regenerate {
            if let Some(existing) = self.store.find_by_url(url)? {
                info!("Cache hit for {} (quiz {})", url, existing.id);
                return Ok(existing);
            }
        }

        let html = self.fetcher.fetch(url).await?;
        let record = build_record(&html, url, request.store_raw_html);
        self.save(record)
    }

    /// Insert, resolving an identical-content conflict to the record already stored.
    pub fn save(&self, record: NewQuizRecord) -> Result<StoredQuizRecord> {
        let url = record.url.clone();
        let content_hash = record.content_hash.clone();
        match self.store.insert(record) {
            Ok(created) => {
                info!(
                    "Stored quiz {} for {} ({} questions, hash {})",
                    created.id,
                    created.url,
                    created.quiz.len(),
                    &created.content_hash[..12.min(created.content_hash.len())]
                );
                Ok(created)
            }
            Err(StoreError::Conflict { url: conflict_url }) => {
                debug!("Identical content already stored for {}", conflict_url);
                match self.store.find_by_content(&url, &content_hash)? {
                    Some(existing) => Ok(existing),
                    None => Err(StoreError::Conflict { url: conflict_url }.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn history(&self, filter: Option<&str>) -> Result<Vec<HistoryEntry>> {
        Ok(self.store.list(filter)?)
    }

    pub fn get(&self, id: &str) -> Result<StoredQuizRecord> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| QuizError::NotFound { id: id.to_string() })
    }
}

// ── Tests ──
