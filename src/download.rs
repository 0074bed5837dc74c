//! Verdict text download.
//!
//! Walks the deduplicated corpus in order and fetches each record's full
//! text with a single GET — no retry budget here. A record whose text file
//! already exists is skipped silently, without touching the network.
//! Non-success responses, empty bodies, and PDF byte streams are permanent
//! skip conditions: they are logged durably and re-attempted only on the
//! next run. Everything else is persisted verbatim as `{full_id}.txt`.

use crate::errlog::ErrorSink;
use crate::fetch::HttpGet;
use crate::models::{full_id_of_line, url_of_line};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

/// Leading bytes of a PDF stream; such bodies are never stored.
const PDF_MAGIC: &str = "%PDF";

/// Per-record tallies of one download pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStats {
    /// Verdicts fetched and written this pass.
    pub downloaded: usize,
    /// Records whose text file already existed.
    pub skipped: usize,
    /// Records with an unusable source (bad status, empty, PDF).
    pub failed: usize,
}

/// Download the verdict text for every record in the corpus.
pub async fn download_all<H: HttpGet>(
    http: &H,
    corpus_path: &Path,
    txt_dir: &Path,
    errors: &dyn ErrorSink,
) -> Result<DownloadStats, Box<dyn Error>> {
    let corpus = fs::read_to_string(corpus_path).await?;
    let mut stats = DownloadStats::default();

    for line in corpus.lines().filter(|l| !l.trim().is_empty()) {
        let (Some(full_id), Some(url)) = (full_id_of_line(line), url_of_line(line)) else {
            warn!(line, "Corpus line without full id and url; skipping");
            stats.failed += 1;
            continue;
        };
        match download_one(http, full_id, url, txt_dir, errors).await? {
            Outcome::Downloaded => stats.downloaded += 1,
            Outcome::AlreadyPresent => stats.skipped += 1,
            Outcome::Unusable => stats.failed += 1,
        }
    }

    info!(
        downloaded = stats.downloaded,
        skipped = stats.skipped,
        failed = stats.failed,
        "Download pass complete"
    );
    Ok(stats)
}

enum Outcome {
    Downloaded,
    AlreadyPresent,
    Unusable,
}

async fn download_one<H: HttpGet>(
    http: &H,
    full_id: &str,
    url: &str,
    txt_dir: &Path,
    errors: &dyn ErrorSink,
) -> Result<Outcome, Box<dyn Error>> {
    let path = txt_dir.join(format!("{full_id}.txt"));
    if fs::try_exists(&path).await? {
        debug!(full_id, "Verdict text already present; skipping");
        return Ok(Outcome::AlreadyPresent);
    }

    info!(full_id, url, "Downloading verdict");
    let res = match http.get(url).await {
        Ok(res) => res,
        Err(e) => {
            errors.append(&format!(
                "ERR: {full_id}. Could not get {url}: {e}. Skipping for now."
            ));
            return Ok(Outcome::Unusable);
        }
    };

    if !res.ok() {
        errors.append(&format!(
            "ERR: {full_id}. Could not get {url}. Got status {}. Skipping for now.",
            res.status
        ));
        return Ok(Outcome::Unusable);
    }
    if res.body.is_empty() {
        errors.append(&format!(
            "ERR: {full_id}. {url} appears to be empty. Skipping for now."
        ));
        return Ok(Outcome::Unusable);
    }
    if res.body.starts_with(PDF_MAGIC) {
        errors.append(&format!(
            "ERR: {full_id}. {url} appears to be of a PDF file. Skipping for now."
        ));
        return Ok(Outcome::Unusable);
    }

    fs::write(&path, &res.body).await?;
    Ok(Outcome::Downloaded)
}
