use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::info;

use crate::error::StoreError;
use crate::store::{
    new_id, normalize_filter, now_epoch_secs, HistoryEntry, NewQuizRecord, QuizStore,
    StoredQuizRecord,
};

pub const DEFAULT_DB_PATH: &str = "data/wiki_quiz.sqlite";

const RECORD_COLUMNS: &str = "id, url, title, summary, sections, key_entities, quiz,
     related_topics, content_hash, raw_html, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!("Opened quiz database at {}", path.display());
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        register_unicode_lower(&conn)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn query_one<P: rusqlite::Params>(
        &self,
        where_clause: &str,
        params: P,
    ) -> Result<Option<StoredQuizRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM wiki_quizzes WHERE {} ORDER BY created_at DESC, rowid DESC LIMIT 1",
            RECORD_COLUMNS, where_clause
        );
        let conn = self.conn();
        let raw = conn
            .query_row(&sql, params, RawRecord::from_row)
            .optional()?;
        raw.map(RawRecord::decode).transpose()
    }
}

pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS wiki_quizzes (
            id             TEXT PRIMARY KEY,
            url            TEXT NOT NULL,
            title          TEXT NOT NULL,
            summary        TEXT NOT NULL,
            sections       TEXT NOT NULL DEFAULT '[]',
            key_entities   TEXT NOT NULL,
            quiz           TEXT NOT NULL,
            related_topics TEXT NOT NULL DEFAULT '[]',
            content_hash   TEXT NOT NULL,
            raw_html       TEXT,
            created_at     INTEGER NOT NULL,
            UNIQUE(url, content_hash)
        );
        CREATE INDEX IF NOT EXISTS idx_quizzes_url ON wiki_quizzes(url);
        CREATE INDEX IF NOT EXISTS idx_quizzes_created ON wiki_quizzes(created_at);
        ",
    )?;
    Ok(())
}

/// SQLite's built-in `lower()` folds ASCII only; filters are lowercased in Rust.
fn register_unicode_lower(conn: &Connection) -> Result<(), StoreError> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
    )?;
    Ok(())
}

/// Row as stored: list-valued columns are JSON text.
struct RawRecord {
    id: String,
    url: String,
    title: String,
    summary: String,
    sections: String,
    key_entities: String,
    quiz: String,
    related_topics: String,
    content_hash: String,
    raw_html: Option<String>,
    created_at: i64,
}

impl RawRecord {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawRecord {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            summary: row.get(3)?,
            sections: row.get(4)?,
            key_entities: row.get(5)?,
            quiz: row.get(6)?,
            related_topics: row.get(7)?,
            content_hash: row.get(8)?,
            raw_html: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn decode(self) -> Result<StoredQuizRecord, StoreError> {
        Ok(StoredQuizRecord {
            id: self.id,
            url: self.url,
            title: self.title,
            summary: self.summary,
            sections: serde_json::from_str(&self.sections)?,
            key_entities: serde_json::from_str(&self.key_entities)?,
            quiz: serde_json::from_str(&self.quiz)?,
            related_topics: serde_json::from_str(&self.related_topics)?,
            content_hash: self.content_hash,
            raw_html: self.raw_html,
            created_at: self.created_at,
        })
    }
}

/// `%`, `_` and `\` in user filters are literal.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation)
}

impl QuizStore for SqliteStore {
    fn find_by_url(&self, url: &str) -> Result<Option<StoredQuizRecord>, StoreError> {
        self.query_one("url = ?1", params![url])
    }

    fn find_by_id(&self, id: &str) -> Result<Option<StoredQuizRecord>, StoreError> {
        self.query_one("id = ?1", params![id])
    }

    fn find_by_content(
        &self,
        url: &str,
        content_hash: &str,
    ) -> Result<Option<StoredQuizRecord>, StoreError> {
        self.query_one("url = ?1 AND content_hash = ?2", params![url, content_hash])
    }

    fn insert(&self, record: NewQuizRecord) -> Result<StoredQuizRecord, StoreError> {
        let stored = StoredQuizRecord::from_new(record, new_id(), now_epoch_secs());
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO wiki_quizzes
             (id, url, title, summary, sections, key_entities, quiz, related_topics,
              content_hash, raw_html, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                stored.id,
                stored.url,
                stored.title,
                stored.summary,
                serde_json::to_string(&stored.sections)?,
                serde_json::to_string(&stored.key_entities)?,
                serde_json::to_string(&stored.quiz)?,
                serde_json::to_string(&stored.related_topics)?,
                stored.content_hash,
                stored.raw_html,
                stored.created_at,
            ],
        );
        match result {
            Ok(_) => Ok(stored),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict { url: stored.url }),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, filter: Option<&str>) -> Result<Vec<HistoryEntry>, StoreError> {
        let (sql, pattern) = match normalize_filter(filter) {
            Some(needle) => (
                "SELECT id, url, title, created_at FROM wiki_quizzes
                 WHERE unicode_lower(title) LIKE ?1 ESCAPE '\\' OR unicode_lower(url) LIKE ?1 ESCAPE '\\'
                 ORDER BY created_at DESC, rowid DESC",
                Some(like_pattern(&needle)),
            ),
            None => (
                "SELECT id, url, title, created_at FROM wiki_quizzes
                 ORDER BY created_at DESC, rowid DESC",
                None,
            ),
        };

        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;
        let map_row = |row: &rusqlite::Row<'_>| {
            Ok(HistoryEntry {
                id: row.get(0)?,
                url: row.get(1)?,
                title: row.get(2)?,
                created_at: row.get(3)?,
            })
        };
        let rows = match pattern {
            Some(p) => stmt.query_map(params![p], map_row)?.collect::<Result<Vec<_>, _>>()?,
            None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
        };
        Ok(rows)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn sqlite_insert_round_trip() {
        contract::insert_assigns_id_and_round_trips(&store());
    }

    #[test]
    fn sqlite_duplicate_conflict() {
        contract::duplicate_content_conflicts(&store());
    }

    #[test]
    fn sqlite_content_lookup() {
        contract::content_lookup_ignores_newer_records(&store());
    }

    #[test]
    fn sqlite_list() {
        contract::list_filters_and_orders(&store());
    }

    #[test]
    fn like_wildcards_are_literal() {
        let s = store();
        s.insert(contract::record("https://en.wikipedia.org/wiki/A_B", "A_B", "1")).unwrap();
        s.insert(contract::record("https://en.wikipedia.org/wiki/AxB", "AxB", "2")).unwrap();
        assert_eq!(s.list(Some("a_b")).unwrap().len(), 1);
        assert_eq!(s.list(Some("%")).unwrap().len(), 0);
    }

    #[test]
    fn schema_init_is_idempotent() {
        let s = store();
        init_schema(&s.conn()).unwrap();
    }
}
