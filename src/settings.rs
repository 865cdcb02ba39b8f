use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::db::DEFAULT_DB_PATH;
use crate::fetch::DEFAULT_USER_AGENT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Memory,
}

/// Runtime settings: built-in defaults, then `WIKIQUIZ_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub store: StoreKind,
    pub db_path: PathBuf,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub concurrency: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_config(
            Config::builder().add_source(Environment::with_prefix("WIKIQUIZ").try_parsing(true)),
        )
    }

    fn from_config(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .set_default("store", "sqlite")?
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("timeout_secs", 30)?
            .set_default("concurrency", 4)?
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid WIKIQUIZ_* settings")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
