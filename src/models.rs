//! Data models for scraped verdict records.
//!
//! The central type is [`RawRecord`], one verdict's metadata as extracted
//! from a search-result page. Records are serialized as `;`-delimited lines,
//! one per record, with a fixed field order shared by the partial batch
//! files and the merged corpus.

/// 0-indexed position of the full identifier in a serialized record line.
pub const FULL_ID_FIELD: usize = 5;

/// One verdict's metadata as scraped from a search-result page.
///
/// The `full_id` (file identifier concatenated with file hash) is the
/// primary key: it deduplicates records across scraping runs and names the
/// persisted verdict text file (`{full_id}.txt`). Records are never mutated
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Label of the court the verdict belongs to.
    pub court: String,
    /// Pre-CNJ process number, as displayed.
    pub old_num: String,
    /// CNJ process number with periods and hyphens stripped.
    pub cnj_num: String,
    /// Name of the judge, taken from the description line.
    pub judge: String,
    /// Publication date, the last token of its description line.
    pub pub_date: String,
    /// File identifier concatenated with file hash. Dedup key.
    pub full_id: String,
    /// File identifier from the status icon handler.
    pub file_id: String,
    /// File hash from the status icon handler.
    pub file_hash: String,
    /// Synthesized download URL for the verdict text.
    pub url: String,
}

impl RawRecord {
    /// Serialize the record as one `;`-delimited line.
    pub fn to_line(&self) -> String {
        [
            self.court.as_str(),
            self.old_num.as_str(),
            self.cnj_num.as_str(),
            self.judge.as_str(),
            self.pub_date.as_str(),
            self.full_id.as_str(),
            self.file_id.as_str(),
            self.file_hash.as_str(),
            self.url.as_str(),
        ]
        .join(";")
    }
}

/// Extract the full identifier from a serialized record line.
///
/// Returns `None` when the line has too few fields to carry one.
pub fn full_id_of_line(line: &str) -> Option<&str> {
    line.split(';').nth(FULL_ID_FIELD)
}

/// Extract the download URL (the last field) from a serialized record line.
pub fn url_of_line(line: &str) -> Option<&str> {
    line.rsplit(';').next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawRecord {
        RawRecord {
            court: "3".to_string(),
            old_num: "1.0024.05.775553-9/001(1)".to_string(),
            cnj_num: "77555398120058130024".to_string(),
            judge: "Fulano de Tal".to_string(),
            pub_date: "01/02/2006".to_string(),
            full_id: "ID1HASH1".to_string(),
            file_id: "ID1".to_string(),
            file_hash: "HASH1".to_string(),
            url: "https://example.test/downloadArquivo.do?a=1".to_string(),
        }
    }

    #[test]
    fn line_round_trip_positions() {
        let line = sample().to_line();
        let fields: Vec<&str> = line.split(';').collect();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[0], "3");
        assert_eq!(fields[FULL_ID_FIELD], "ID1HASH1");
        assert_eq!(fields[8], "https://example.test/downloadArquivo.do?a=1");
    }

    #[test]
    fn full_id_of_line_reads_fixed_field() {
        let line = sample().to_line();
        assert_eq!(full_id_of_line(&line), Some("ID1HASH1"));
        assert_eq!(full_id_of_line("too;short"), None);
    }

    #[test]
    fn url_of_line_reads_last_field() {
        let line = sample().to_line();
        assert_eq!(
            url_of_line(&line),
            Some("https://example.test/downloadArquivo.do?a=1")
        );
    }
}
