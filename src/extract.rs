//! Extraction of verdict records from one search-result page.
//!
//! The result page is a table where three independent element selections —
//! process-number cells, description cells, and status icons — come back as
//! flat lists that must be realigned by position, not by DOM nesting.
//! Process-number and description cells appear two per record (old number
//! then CNJ number; judge line then publication-date line); status icons
//! appear one per record. Consecutive cells are paired at indices
//! (2i, 2i+1) and a trailing unpaired cell is discarded. When the three
//! selections disagree on the record count, extraction truncates to the
//! shortest aligned set and warns.

use crate::config::Config;
use crate::models::RawRecord;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Marker string a result page carries when the search has no more pages.
pub const EMPTY_RESULT_MARKER: &str = "Nenhum registro foi encontrado.";

/// Whether a page body is the distinguished "no results" page.
pub fn is_empty_result(body: &str) -> bool {
    body.contains(EMPTY_RESULT_MARKER)
}

/// Parse one search-result page into its ordered records.
pub fn extract(page_html: &str, court_label: &str, config: &Config) -> Vec<RawRecord> {
    let document = Html::parse_document(page_html);
    let num_selector = Selector::parse("#tabelaSentenca .caixa_processo a div").unwrap();
    let desc_selector = Selector::parse("#tabelaSentenca .corpo").unwrap();
    let img_selector = Selector::parse("#tabelaSentenca span img").unwrap();

    let num_cells: Vec<ElementRef> = document.select(&num_selector).collect();
    let desc_cells: Vec<ElementRef> = document.select(&desc_selector).collect();
    let icons: Vec<ElementRef> = document.select(&img_selector).collect();

    let nums = pair_consecutive(&num_cells);
    let descs = pair_consecutive(&desc_cells);
    if nums.len() != descs.len() || descs.len() != icons.len() {
        warn!(
            court = court_label,
            nums = nums.len(),
            descs = descs.len(),
            icons = icons.len(),
            "Mismatched element counts on result page; truncating to shortest"
        );
    }

    let mut records = Vec::new();
    for ((num, desc), icon) in nums.iter().zip(&descs).zip(&icons) {
        let old_num = text_of(num.0);
        let cnj_num = text_of(num.1).replace(['.', '-'], "");
        let judge = after_last_colon(&text_of(desc.0));
        let pub_date = last_token(&text_of(desc.1));
        let Some((file_id, file_hash)) = id_and_hash_from_icon(*icon) else {
            warn!(court = court_label, old_num = %old_num, "Status icon without a parseable handler; skipping record");
            continue;
        };
        let full_id = format!("{file_id}{file_hash}");
        let url = config.download_url(&file_id, &file_hash).to_string();
        records.push(RawRecord {
            court: court_label.to_string(),
            old_num,
            cnj_num,
            judge,
            pub_date,
            full_id,
            file_id,
            file_hash,
            url,
        });
    }
    records
}

/// Group a flat element list into consecutive pairs, discarding a trailing
/// unpaired element.
fn pair_consecutive<'a>(
    elements: &[ElementRef<'a>],
) -> Vec<(ElementRef<'a>, ElementRef<'a>)> {
    elements.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn after_last_colon(line: &str) -> String {
    line.rsplit(':').next().unwrap_or_default().trim().to_string()
}

fn last_token(line: &str) -> String {
    line.split_whitespace().last().unwrap_or_default().to_string()
}

/// Pull the file identifier and hash out of a status icon's inline handler.
///
/// The attribute value looks like `javascript:f(0,'ID','HASH');` — quotes
/// are stripped, the parenthesized argument list is split on commas, and
/// the second and third tokens are kept (the first is a UI widget index).
fn id_and_hash_from_icon(icon: ElementRef) -> Option<(String, String)> {
    let handler = icon.value().attr("onclick")?;
    let cleaned = handler.replace(['\'', '"'], "");
    let start = cleaned.find('(')? + 1;
    let end = cleaned.rfind(')')?;
    if end < start {
        return None;
    }
    let mut tokens = cleaned[start..end].split(',');
    let _widget_index = tokens.next()?;
    let file_id = tokens.next()?.trim().to_string();
    let file_hash = tokens.next()?.trim().to_string();
    if file_id.is_empty() || file_hash.is_empty() {
        return None;
    }
    Some((file_id, file_hash))
}
