mod batch;
mod db;
mod error;
mod fetch;
mod fingerprint;
mod parser;
mod pipeline;
mod quiz;
mod settings;
mod store;
mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::fetch::{Fetcher, HttpFetcher};
use crate::pipeline::{GenerateRequest, QuizService};
use crate::settings::{Settings, StoreKind};
use crate::store::{MemoryStore, QuizStore};

#[derive(Parser)]
#[command(name = "wiki_quiz", about = "Turn Wikipedia articles into multiple-choice quizzes")]
struct Cli {
    /// SQLite database path (overrides WIKIQUIZ_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Keep quizzes in memory for this run only
    #[arg(long, global = true, conflicts_with = "db")]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract title, summary, sections and entities without storing anything
    Preview { url: String },
    /// Generate (or reuse) a quiz for an article
    Generate {
        url: String,
        /// Ignore any stored quiz for this URL and fetch again
        #[arg(long)]
        force: bool,
        /// Keep the fetched HTML alongside the quiz
        #[arg(long)]
        store_raw_html: bool,
    },
    /// List stored quizzes, newest first
    History {
        /// Case-insensitive match on title or URL
        #[arg(short, long)]
        query: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Print a stored quiz by id
    Show { id: String },
    /// Generate quizzes for every URL in a file (one per line)
    Batch {
        file: PathBuf,
        /// Regenerate even when a quiz is already stored
        #[arg(long)]
        force: bool,
        /// Concurrent fetches (overrides WIKIQUIZ_CONCURRENCY)
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let store = open_store(&cli, &settings)?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(
        HttpFetcher::new(&settings.user_agent, settings.timeout())
            .context("Failed to build HTTP client")?,
    );
    let service = QuizService::new(fetcher, store);

    let result = match cli.command {
        Commands::Preview { url } => {
            let preview = service.preview(&url).await?;
            print_json(&preview)
        }
        Commands::Generate {
            url,
            force,
            store_raw_html,
        } => {
            let record = service
                .generate(&GenerateRequest {
                    url,
                    force_regenerate: force,
                    store_raw_html,
                })
                .await?;
            print_json(&record)
        }
        Commands::History { query, limit } => {
            let rows = service.history(query.as_deref())?;
            if rows.is_empty() {
                println!("No quizzes found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<36} | {:<32} | {:<19} | {:<40}",
                "#", "Id", "Title", "Created", "URL"
            );
            println!("{}", "-".repeat(142));

            for (i, r) in rows.iter().take(limit).enumerate() {
                let created = chrono::DateTime::from_timestamp(r.created_at, 0)
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:>3} | {:<36} | {:<32} | {:<19} | {:<40}",
                    i + 1,
                    r.id,
                    truncate(&r.title, 32),
                    created,
                    truncate(&r.url, 40)
                );
            }

            println!("\n{} of {} quizzes", rows.len().min(limit), rows.len());
            Ok(())
        }
        Commands::Show { id } => {
            let record = service.get(&id)?;
            print_json(&record)
        }
        Commands::Batch {
            file,
            force,
            concurrency,
        } => {
            let urls = batch::read_url_file(&file)?;
            if urls.is_empty() {
                println!("No URLs in {}.", file.display());
                return Ok(());
            }
            println!("Generating quizzes for {} URLs...", urls.len());
            let concurrency = concurrency.unwrap_or(settings.concurrency);
            let stats = batch::run_batch(&service, urls, force, concurrency).await?;
            println!(
                "Done: {} URLs ({} stored, {} cached, {} errors).",
                stats.total, stats.stored, stats.cached, stats.errors
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

#[derive(Debug, PartialEq, Eq)]
enum StoreChoice {
    Memory,
    Sqlite(PathBuf),
}

/// CLI flags win over `WIKIQUIZ_STORE` / `WIKIQUIZ_DB_PATH`.
fn choose_store(memory: bool, db: Option<&Path>, settings: &Settings) -> StoreChoice {
    match (memory, db) {
        (true, _) => StoreChoice::Memory,
        (false, Some(path)) => StoreChoice::Sqlite(path.to_path_buf()),
        (false, None) if settings.store == StoreKind::Memory => StoreChoice::Memory,
        (false, None) => StoreChoice::Sqlite(settings.db_path.clone()),
    }
}

fn open_store(cli: &Cli, settings: &Settings) -> anyhow::Result<Arc<dyn QuizStore>> {
    match choose_store(cli.memory, cli.db.as_deref(), settings) {
        StoreChoice::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreChoice::Sqlite(path) => {
            let store = db::SqliteStore::open(&path)
                .with_context(|| format!("Failed to open database {}", path.display()))?;
            Ok(Arc::new(store))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

// ── Tests ──
