//! Pagination walker for the verdict search.
//!
//! One walk covers one court: fetch a page, extract its records, persist
//! them as a partial batch, advance to the next page. The walk ends when a
//! page carries the "no results" marker. A fetch that exhausts its retry
//! budget interrupts the walk and reports the failed page number, so a
//! later run can resume at that exact page without replaying the batches
//! already on disk. The outer driver restarts interrupted walks until the
//! court completes; only the page number is replayed, never the data.

use crate::config::{COURTS, Config};
use crate::corpus::write_batch;
use crate::errlog::ErrorSink;
use crate::extract::{extract, is_empty_result};
use crate::fetch::{BoundedFetcher, HttpGet, Sleep};
use std::error::Error;
use tracing::{info, warn};

/// How one walk over a court's result pages ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The "no results" page was reached; the court is fully scraped.
    Complete,
    /// Fetching `page` exhausted its retry budget; resume from that page.
    Interrupted { page: u32 },
}

/// Drives the fetch-extract-persist loop across a court's result pages.
pub struct Walker<'a, H, S> {
    config: &'a Config,
    fetcher: BoundedFetcher<H, S>,
    errors: &'a dyn ErrorSink,
}

impl<'a, H: HttpGet, S: Sleep> Walker<'a, H, S> {
    pub fn new(config: &'a Config, fetcher: BoundedFetcher<H, S>, errors: &'a dyn ErrorSink) -> Self {
        Self {
            config,
            fetcher,
            errors,
        }
    }

    /// Scrape every known court in order, each from page 0.
    pub async fn search_all_courts(&self) -> Result<(), Box<dyn Error>> {
        for (label, code) in COURTS {
            self.search(label, code, 0).await?;
        }
        Ok(())
    }

    /// Scrape one court to completion, restarting interrupted walks from
    /// the page they failed on until the search is over.
    pub async fn search(
        &self,
        court_label: &str,
        court_code: &str,
        start_page: u32,
    ) -> Result<(), Box<dyn Error>> {
        info!(court = court_label, start_page, "Now scraping court");
        let mut page = start_page;
        loop {
            match self.walk(court_label, court_code, page).await? {
                WalkOutcome::Complete => return Ok(()),
                WalkOutcome::Interrupted { page: failed } => {
                    warn!(court = court_label, page = failed, "Walk interrupted; restarting from failed page");
                    page = failed;
                }
            }
        }
    }

    /// Walk result pages starting at `page` until the search is over or a
    /// fetch exhausts its budget.
    pub async fn walk(
        &self,
        court_label: &str,
        court_code: &str,
        mut page: u32,
    ) -> Result<WalkOutcome, Box<dyn Error>> {
        loop {
            info!(court = court_label, page, "Getting search page");
            let url = self.config.search_url(court_code, page);
            let Some(res) = self.fetcher.fetch(url.as_str(), self.errors).await else {
                return Ok(WalkOutcome::Interrupted { page });
            };

            if is_empty_result(&res.body) {
                info!(court = court_label, page, "Got no result; search is over");
                return Ok(WalkOutcome::Complete);
            }

            let records = extract(&res.body, court_label, self.config);
            if records.is_empty() {
                warn!(court = court_label, page, "Result page yielded no records");
            }
            write_batch(&self.config.dirs.raw(), &records).await?;
            page += 1;
        }
    }
}
