//! # TJMG Verdicts
//!
//! A scraping pipeline for the Tribunal de Justiça de Minas Gerais (TJMG)
//! jurisprudence search. It harvests verdict metadata from the paginated
//! search pages, deduplicates records across runs, and downloads each
//! unique verdict's full text.
//!
//! ## Usage
//!
//! ```sh
//! tjmg_verdicts scrape                   # all courts, from page 0
//! tjmg_verdicts scrape --court 3 --page 117   # resume one court
//! tjmg_verdicts merge                    # batches -> deduplicated corpus
//! tjmg_verdicts download                 # corpus -> verdict text files
//! ```
//!
//! ## Architecture
//!
//! The pipeline runs as three sequential stages:
//! 1. **Scrape**: walk each court's result pages, persisting every page's
//!    records immediately as a partial batch (crash loses at most one page)
//! 2. **Merge**: fold all batches into one corpus, first seen record wins
//!    per full identifier
//! 3. **Download**: fetch each corpus record's text once, skipping records
//!    already on disk and permanently unusable sources (empty or PDF)
//!
//! Fetching is single-stream and sequential; the remote source is
//! rate-sensitive, so correctness and resumability win over throughput.

use clap::Parser;
use std::error::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod corpus;
mod download;
mod errlog;
mod extract;
mod fetch;
mod models;
mod walker;

use cli::{Cli, Command};
use config::{Config, court_code, court_labels};
use errlog::FileErrorLog;
use fetch::{BoundedFetcher, ReqwestClient, TokioSleep};
use walker::Walker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();

    let config = Config::new(&args.data_dir)?;
    config.dirs.ensure().await?;
    let errors = FileErrorLog::new(config.dirs.scrap_log());

    match args.command {
        Command::Scrape { court, page } => {
            let fetcher = BoundedFetcher::new(ReqwestClient::new(), TokioSleep, config.retry);
            let walker = Walker::new(&config, fetcher, &errors);
            match court {
                Some(label) => {
                    let Some(code) = court_code(&label) else {
                        error!(court = %label, available = ?court_labels(), "Court not available");
                        return Err(format!("unknown court label: {label}").into());
                    };
                    walker.search(&label, code, page).await?;
                }
                None => walker.search_all_courts().await?,
            }
        }
        Command::Merge => {
            let count = corpus::merge(&config.dirs.raw(), &config.dirs.corpus_file()).await?;
            info!(records = count, "Corpus ready");
        }
        Command::Download => {
            let http = ReqwestClient::new();
            let stats = download::download_all(
                &http,
                &config.dirs.corpus_file(),
                &config.dirs.txt(),
                &errors,
            )
            .await?;
            info!(
                downloaded = stats.downloaded,
                skipped = stats.skipped,
                failed = stats.failed,
                "Download finished"
            );
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}
