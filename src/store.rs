use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::parser::extract::KeyEntities;
use crate::quiz::QuizQuestion;

/// What the orchestrator hands to storage; id and timestamp are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuizRecord {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub sections: Vec<String>,
    pub key_entities: KeyEntities,
    pub quiz: Vec<QuizQuestion>,
    pub related_topics: Vec<String>,
    pub content_hash: String,
    pub raw_html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuizRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub sections: Vec<String>,
    pub key_entities: KeyEntities,
    pub quiz: Vec<QuizQuestion>,
    pub related_topics: Vec<String>,
    pub content_hash: String,
    pub raw_html: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub url: String,
    pub title: String,
    pub created_at: i64,
}

impl StoredQuizRecord {
    pub fn from_new(record: NewQuizRecord, id: String, created_at: i64) -> Self {
        Self {
            id,
            url: record.url,
            title: record.title,
            summary: record.summary,
            sections: record.sections,
            key_entities: record.key_entities,
            quiz: record.quiz,
            related_topics: record.related_topics,
            content_hash: record.content_hash,
            raw_html: record.raw_html,
            created_at,
        }
    }

    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            id: self.id.clone(),
            url: self.url.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
        }
    }
}

/// Quiz persistence. Records are immutable once inserted.
///
/// At most one record exists per `(url, content_hash)`; a second insert of the
/// same pair fails with [`StoreError::Conflict`].
pub trait QuizStore: Send + Sync {
    /// Newest record for `url`.
    fn find_by_url(&self, url: &str) -> Result<Option<StoredQuizRecord>, StoreError>;

    fn find_by_id(&self, id: &str) -> Result<Option<StoredQuizRecord>, StoreError>;

    /// The record a [`StoreError::Conflict`] collided with.
    fn find_by_content(
        &self,
        url: &str,
        content_hash: &str,
    ) -> Result<Option<StoredQuizRecord>, StoreError>;

    fn insert(&self, record: NewQuizRecord) -> Result<StoredQuizRecord, StoreError>;

    /// Newest first. `filter` matches title or url, case-insensitively.
    fn list(&self, filter: Option<&str>) -> Result<Vec<HistoryEntry>, StoreError>;
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn now_epoch_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Trimmed, lowercased filter; blank means "no filter".
pub fn normalize_filter(filter: Option<&str>) -> Option<String> {
    filter
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty())
}

/// Process-local store, used with `--memory` and in tests.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredQuizRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, Vec<StoredQuizRecord>> {
        // Records are only ever pushed, so a poisoned lock still holds valid data.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl QuizStore for MemoryStore {
    fn find_by_url(&self, url: &str) -> Result<Option<StoredQuizRecord>, StoreError> {
        Ok(self.records().iter().rev().find(|r| r.url == url).cloned())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<StoredQuizRecord>, StoreError> {
        Ok(self.records().iter().find(|r| r.id == id).cloned())
    }

    fn find_by_content(
        &self,
        url: &str,
        content_hash: &str,
    ) -> Result<Option<StoredQuizRecord>, StoreError> {
        Ok(self
            .records()
            .iter()
            .find(|r| r.url == url && r.content_hash == content_hash)
            .cloned())
    }

    fn insert(&self, record: NewQuizRecord) -> Result<StoredQuizRecord, StoreError> {
        let mut records = self.records();
        if records
            .iter()
            .any(|r| r.url == record.url && r.content_hash == record.content_hash)
        {
            return Err(StoreError::Conflict { url: record.url });
        }
        let stored = StoredQuizRecord::from_new(record, new_id(), now_epoch_secs());
        records.push(stored.clone());
        Ok(stored)
    }

    fn list(&self, filter: Option<&str>) -> Result<Vec<HistoryEntry>, StoreError> {
        let needle = normalize_filter(filter);
        let mut entries: Vec<HistoryEntry> = self
            .records()
            .iter()
            .rev()
            .filter(|r| match &needle {
                Some(n) => r.title.to_lowercase().contains(n) || r.url.to_lowercase().contains(n),
                None => true,
            })
            .map(StoredQuizRecord::history_entry)
            .collect();
        // Stable sort keeps newest-inserted first within the same second.
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}

// ── Tests ──

/// Shared behavioural checks, run against every backend.
#[cfg(test)]
pub(crate) mod contract {
    use super::*;

    pub fn record(url: &str, title: &str, hash: &str) -> NewQuizRecord {
        NewQuizRecord {
            url: url.to_string(),
            title: title.to_string(),
            summary: "A Wikipedia article".to_string(),
            sections: vec!["Early life".to_string()],
            key_entities: KeyEntities {
                people: vec!["Alonzo Church".to_string()],
                organizations: vec![],
                locations: vec!["London".to_string()],
            },
            quiz: vec![],
            related_topics: vec!["Alonzo Church".to_string()],
            content_hash: hash.to_string(),
            raw_html: None,
        }
    }

    pub fn insert_assigns_id_and_round_trips(store: &dyn QuizStore) {
        let stored = store
            .insert(record("https://en.wikipedia.org/wiki/Alan_Turing", "Alan Turing", "h1"))
            .unwrap();
        assert!(!stored.id.is_empty());
        assert!(stored.created_at > 0);

        let by_id = store.find_by_id(&stored.id).unwrap().unwrap();
        assert_eq!(by_id, stored);
        let by_url = store.find_by_url(&stored.url).unwrap().unwrap();
        assert_eq!(by_url.id, stored.id);
        assert!(store.find_by_id("missing").unwrap().is_none());
        assert!(store.find_by_url("https://en.wikipedia.org/wiki/Other").unwrap().is_none());
    }

    pub fn duplicate_content_conflicts(store: &dyn QuizStore) {
        let url = "https://en.wikipedia.org/wiki/Enigma_machine";
        store.insert(record(url, "Enigma machine", "same")).unwrap();
        let err = store.insert(record(url, "Enigma machine", "same")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }), "{:?}", err);

        let newer = store.insert(record(url, "Enigma machine", "changed")).unwrap();
        assert_eq!(store.find_by_url(url).unwrap().unwrap().id, newer.id);
    }

    pub fn content_lookup_ignores_newer_records(store: &dyn QuizStore) {
        let url = "https://en.wikipedia.org/wiki/Colossus_computer";
        let a = store.insert(record(url, "Colossus computer", "A")).unwrap();
        let b = store.insert(record(url, "Colossus computer", "B")).unwrap();

        assert_eq!(store.find_by_url(url).unwrap().unwrap().id, b.id);
        assert_eq!(store.find_by_content(url, "A").unwrap().unwrap().id, a.id);
        assert_eq!(store.find_by_content(url, "B").unwrap().unwrap().id, b.id);
        assert!(store.find_by_content(url, "C").unwrap().is_none());
        assert!(store
            .find_by_content("https://en.wikipedia.org/wiki/Other", "A")
            .unwrap()
            .is_none());
    }

    pub fn list_filters_and_orders(store: &dyn QuizStore) {
        let a = store.insert(record("https://en.wikipedia.org/wiki/Alan_Turing", "Alan Turing", "a")).unwrap();
        let b = store.insert(record("https://en.wikipedia.org/wiki/Ada_Lovelace", "Ada Lovelace", "b")).unwrap();
        let c = store.insert(record("https://de.wikipedia.org/wiki/Enigma", "Enigma (Maschine)", "c")).unwrap();

        let all = store.list(None).unwrap();
        let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec![c.id.as_str(), b.id.as_str(), a.id.as_str()]);

        let by_title = store.list(Some("  LOVELACE ")).unwrap();
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, b.id);

        let by_url = store.list(Some("de.wikipedia")).unwrap();
        assert_eq!(by_url.len(), 1);
        assert_eq!(by_url[0].title, "Enigma (Maschine)");

        assert_eq!(store.list(Some("   ")).unwrap().len(), 3);
        assert!(store.list(Some("nothing matches")).unwrap().is_empty());

        let d = store
            .insert(record("https://fr.wikipedia.org/wiki/%C3%89cole_normale", "École normale supérieure", "d"))
            .unwrap();
        for needle in ["école", "ÉCOLE", "SUPÉRIEURE"] {
            let hits = store.list(Some(needle)).unwrap();
            assert_eq!(hits.len(), 1, "{}", needle);
            assert_eq!(hits[0].id, d.id);
        }
    }
}
