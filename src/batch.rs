use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::error::FetchError;
use crate::pipeline::{build_record, QuizService};
use crate::validate::validate_article_url;

/// Batch stats returned after completion.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub stored: usize,
    pub cached: usize,
    pub errors: usize,
}

/// One URL per line; blank lines and `#` comments are skipped, repeats dropped.
pub fn parse_url_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter(|l| seen.insert(*l))
        .map(str::to_string)
        .collect()
}

pub fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list {}", path.display()))?;
    Ok(parse_url_list(&text))
}

/// Generate quizzes for many URLs: fetches run concurrently (bounded by
/// `concurrency`), extraction and synthesis run on the rayon pool, inserts
/// happen on the caller's task.
pub async fn run_batch(
    service: &QuizService,
    urls: Vec<String>,
    force: bool,
    concurrency: usize,
) -> Result<BatchStats> {
    let mut stats = BatchStats {
        total: urls.len(),
        ..Default::default()
    };

    let mut pending = Vec::new();
    for url in urls {
        if let Err(e) = validate_article_url(&url) {
            warn!("Skipping {}: {}", url, e);
            stats.errors += 1;
            continue;
        }
        if !force && service.store().find_by_url(&url)?.is_some() {
            stats.cached += 1;
            continue;
        }
        pending.push(url);
    }

    if pending.is_empty() {
        return Ok(stats);
    }

    let concurrency = concurrency.max(1);
    let spawned = pending.len();
    let pb = ProgressBar::new(spawned as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let (tx, mut rx) =
        tokio::sync::mpsc::channel::<(String, Result<String, FetchError>)>(concurrency * 2);

    for url in pending {
        let fetcher = Arc::clone(service.fetcher());
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            // Closed only if the receiver is gone, in which case nobody wants the result.
            let Ok(_permit) = sem.acquire_owned().await else {
                return;
            };
            let result = fetcher.fetch(&url).await;
            let _ = tx.send((url, result)).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut pages = Vec::new();
    let mut received = 0usize;
    while let Some((url, result)) = rx.recv().await {
        received += 1;
        match result {
            Ok(html) => pages.push((url, html)),
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                stats.errors += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    // A task that panicked dropped its sender without reporting.
    let lost = spawned - received;
    if lost > 0 {
        warn!("{} fetch tasks ended without a result", lost);
        stats.errors += lost;
    }

    let records: Vec<_> = pages
        .par_iter()
        .map(|(url, html)| build_record(html, url, false))
        .collect();

    for record in records {
        let url = record.url.clone();
        match service.save(record) {
            Ok(_) => stats.stored += 1,
            Err(e) => {
                warn!("Failed to store quiz for {}: {}", url, e);
                stats.errors += 1;
            }
        }
    }

    info!(
        "Batch done: {} urls ({} stored, {} cached, {} errors)",
        stats.total, stats.stored, stats.cached, stats.errors
    );
    Ok(stats)
}

// ── Tests ──
