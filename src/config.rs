//! Runtime configuration for the scraping pipeline.
//!
//! Everything the components need — search endpoint, query parameters,
//! retry policy, and the on-disk layout — is carried by an explicitly
//! constructed [`Config`] value instead of process-wide globals, so tests
//! can build throwaway configurations against temporary directories.

use crate::fetch::RetryPolicy;
use std::error::Error;
use std::fs as stdfs;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use url::Url;

/// Default base URL of the TJMG jurisprudence site.
pub const DEFAULT_BASE_URL: &str = "https://www5.tjmg.jus.br/jurisprudencia/";
/// Default free-text search query.
pub const DEFAULT_QUERY: &str = "crime";
/// Default county code (24 is Belo Horizonte).
pub const DEFAULT_COUNTY: u32 = 24;
/// Results per search page, fixed by the remote interface.
pub const PAGE_SIZE: u32 = 50;

/// Court label → court code, in the order the courts are walked.
pub const COURTS: &[(&str, &str)] = &[
    ("1", "24-58-2"),
    ("3", "24-5-3"),
    ("4", "24-5-4"),
    ("6", "24-5-6"),
    ("7", "24-5-7"),
    ("8", "24-5-8"),
    ("9", "24-5-9"),
    ("10", "24-5-10"),
    ("11", "24-5-11"),
];

/// Look up the court code for a court label.
pub fn court_code(label: &str) -> Option<&'static str> {
    COURTS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, code)| *code)
}

/// The labels of all known courts.
pub fn court_labels() -> Vec<&'static str> {
    COURTS.iter().map(|(name, _)| *name).collect()
}

/// Configuration shared by the scrape, merge, and download stages.
#[derive(Debug, Clone)]
pub struct Config {
    search_endpoint: Url,
    download_endpoint: Url,
    /// Free-text query sent to the search form.
    pub query: String,
    /// County code restricting the search.
    pub county: u32,
    /// Results per page.
    pub page_size: u32,
    /// Retry policy for search-page fetches.
    pub retry: RetryPolicy,
    /// On-disk layout for batches, corpus, verdict text, and logs.
    pub dirs: DataDirs,
}

impl Config {
    /// Build a configuration with the stock TJMG endpoints rooted at
    /// `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, Box<dyn Error>> {
        Self::with_base_url(DEFAULT_BASE_URL, data_dir)
    }

    /// Build a configuration against an alternate base URL.
    pub fn with_base_url(
        base_url: &str,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self, Box<dyn Error>> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            search_endpoint: base.join("sentenca.do")?,
            download_endpoint: base.join("downloadArquivo.do")?,
            query: DEFAULT_QUERY.to_string(),
            county: DEFAULT_COUNTY,
            page_size: PAGE_SIZE,
            retry: RetryPolicy::default(),
            dirs: DataDirs::new(data_dir),
        })
    }

    /// URL of one search-result page for a court.
    pub fn search_url(&self, court_code: &str, page: u32) -> Url {
        let mut url = self.search_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("palavrasConsulta", &self.query)
            .append_pair("codigoComarca", &self.county.to_string())
            .append_pair("codigoOrgaoJulgador", court_code)
            .append_pair("resultPagina", &self.page_size.to_string())
            .append_pair("pg", &page.to_string())
            .append_pair("pesquisar", "Pesquisar");
        url
    }

    /// URL of one verdict's text download, synthesized from the file
    /// identifier and hash scraped off the result page.
    pub fn download_url(&self, file_id: &str, file_hash: &str) -> Url {
        let mut url = self.download_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("sistemaOrigem", "1")
            .append_pair("codigoArquivo", file_id)
            .append_pair("hashArquivo", file_hash);
        url
    }
}

/// On-disk layout rooted at a single data directory.
///
/// ```text
/// data/
/// ├── raw/        one csv per scraped page (partial batches)
/// ├── txt/        one txt per downloaded verdict
/// ├── logs/       append-only error log
/// └── data.csv    the deduplicated corpus
/// ```
#[derive(Debug, Clone)]
pub struct DataDirs {
    root: PathBuf,
}

impl DataDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the partial batch files.
    pub fn raw(&self) -> PathBuf {
        self.root.join("raw")
    }

    /// Directory holding the downloaded verdict text files.
    pub fn txt(&self) -> PathBuf {
        self.root.join("txt")
    }

    /// Directory holding the error log.
    pub fn logs(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Path of the deduplicated corpus file.
    pub fn corpus_file(&self) -> PathBuf {
        self.root.join("data.csv")
    }

    /// Path of the scrape error log.
    pub fn scrap_log(&self) -> PathBuf {
        self.logs().join("scrap.log")
    }

    /// Create every directory and verify the root is writable by probing
    /// with a throwaway file.
    pub async fn ensure(&self) -> Result<(), Box<dyn Error>> {
        for dir in [self.raw(), self.txt(), self.logs()] {
            fs::create_dir_all(&dir).await?;
        }
        let probe = self.root.join(".__probe_write__");
        ensure_writable(&probe)?;
        info!(root = %self.root.display(), "Data directories ready");
        Ok(())
    }
}

fn ensure_writable(probe: &Path) -> Result<(), Box<dyn Error>> {
    stdfs::File::create(probe)?;
    let _ = stdfs::remove_file(probe);
    Ok(())
}
