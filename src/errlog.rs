//! Append-only error log.
//!
//! Failures that must survive the process (exhausted fetches, unusable
//! downloads) are recorded through the [`ErrorSink`] capability. The sink is
//! injected into each component rather than reached through a global handle,
//! so tests can capture messages in memory.

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, warn};

/// A sink for durable error messages.
pub trait ErrorSink {
    /// Record one error message.
    fn append(&self, message: &str);
}

/// [`ErrorSink`] backed by an append-only text file.
///
/// Each message becomes one line of the form `<timestamp> - <message>`.
/// The file is opened in append mode per write, so a crash between writes
/// never leaves a torn line behind.
#[derive(Debug)]
pub struct FileErrorLog {
    path: PathBuf,
}

impl FileErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ErrorSink for FileErrorLog {
    fn append(&self, message: &str) {
        error!("{message}");
        let stamped = format!("{} - {message}\n", Utc::now().format("%d/%m/%Y %H:%M:%S"));
        let opened = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path);
        match opened {
            Ok(mut file) => {
                if let Err(e) = file.write_all(stamped.as_bytes()) {
                    warn!(path = %self.path.display(), error = %e, "Failed writing to error log");
                }
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed opening error log");
            }
        }
    }
}

/// In-memory sink for tests.
#[cfg(test)]
pub struct MemorySink(pub std::sync::Mutex<Vec<String>>);

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self(std::sync::Mutex::new(Vec::new()))
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ErrorSink for MemorySink {
    fn append(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}
