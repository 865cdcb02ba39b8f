use thiserror::Error;

/// Rejected input at the request boundary. `field` names the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to fetch page ({status})")]
    Status { status: u16 },

    #[error("Failed to fetch page: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// Upstream HTTP status, when the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("A quiz with identical content already exists for {url}")]
    Conflict { url: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures surfaced by the orchestrator. Kinds are never converted into one another.
#[derive(Error, Debug)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Quiz not found: {id}")]
    NotFound { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, QuizError>;
