//! Partial batch persistence and corpus merging.
//!
//! Each scraped page is written straight to its own uniquely named batch
//! file, so a crash mid-crawl loses at most the in-flight page. A later
//! merge pass folds every batch into one deduplicated corpus keyed by the
//! full identifier, first occurrence winning. Batches are enumerated in
//! lexicographic filename order, which makes merges reproducible.

use crate::models::{RawRecord, full_id_of_line};
use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{info, warn};

/// Filename prefix shared by all partial batch files.
pub const BATCH_PREFIX: &str = "raw";

// Tie-breaker for batches written within the same microsecond.
static BATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Persist one page's records as a new partial batch file.
///
/// The filename embeds the UTC timestamp in microseconds plus a sequence
/// number, so batch order on disk follows scrape order.
pub async fn write_batch(raw_dir: &Path, records: &[RawRecord]) -> Result<PathBuf, Box<dyn Error>> {
    let stamp = chrono::Utc::now().timestamp_micros();
    let seq = BATCH_SEQ.fetch_add(1, Ordering::Relaxed);
    let path = raw_dir.join(format!("{BATCH_PREFIX}_{stamp}_{seq:06}.csv"));
    let lines: Vec<String> = records.iter().map(RawRecord::to_line).collect();
    fs::write(&path, lines.join("\n")).await?;
    info!(path = %path.display(), records = records.len(), "Wrote partial batch");
    Ok(path)
}

/// Batch filenames under `raw_dir`, sorted lexicographically.
pub async fn batch_files(raw_dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(raw_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(BATCH_PREFIX) && name.ends_with(".csv") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names.into_iter().map(|n| raw_dir.join(n)).collect())
}

/// Merge every partial batch into one deduplicated corpus file.
///
/// Records are deduplicated on the full identifier with insert-if-absent
/// semantics: the first occurrence in enumeration order is kept, later
/// duplicates are dropped. The corpus file is overwritten, so merging the
/// same batches twice yields the same corpus.
pub async fn merge(raw_dir: &Path, corpus_path: &Path) -> Result<usize, Box<dyn Error>> {
    let files = batch_files(raw_dir).await?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<String> = Vec::new();
    for file in &files {
        let content = fs::read_to_string(file).await?;
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let Some(full_id) = full_id_of_line(line) else {
                warn!(file = %file.display(), line, "Batch line without a full id; dropping");
                continue;
            };
            if seen.insert(full_id.to_string()) {
                kept.push(line.to_string());
            }
        }
    }

    fs::write(corpus_path, kept.join("\n")).await?;
    info!(
        batches = files.len(),
        records = kept.len(),
        corpus = %corpus_path.display(),
        "Merged corpus written"
    );
    Ok(kept.len())
}
