//! Command-line interface definitions.
//!
//! The CLI only parses arguments and dispatches to the pipeline stages;
//! it imposes nothing on the core components.

use clap::{Parser, Subcommand};

/// Command-line arguments for the TJMG verdict scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape every court from page 0
/// tjmg_verdicts scrape
///
/// # Resume one court at a specific page
/// tjmg_verdicts scrape --court 3 --page 117
///
/// # Consolidate batches, then download the verdict texts
/// tjmg_verdicts merge
/// tjmg_verdicts download
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory for batches, corpus, verdict text, and logs
    #[arg(short, long, default_value = "./data")]
    pub data_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape verdict metadata from the search pages
    Scrape {
        /// Court label to scrape; every court when omitted
        #[arg(long)]
        court: Option<String>,

        /// Page to start (or resume) the search from
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Merge the partial batches into the deduplicated corpus
    Merge,
    /// Download the verdict text for every corpus record
    Download,
}
