use crate::extraction::pdftotext::PdftotextSource;
use crate::extraction::TableExtractor;
use crate::model::{RawTable, Role};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Last-resort text parser: builds the four canonical columns directly
/// from plain text lines when no extractor produced a table.
///
/// Two strategies per line, tried in order:
/// 1. A fixed-format row pattern (serial, item, paid, free, rate, amount)
///    which is authoritative when it matches.
/// 2. A generic token heuristic: a line qualifies if it has at least two
///    digit-bearing tokens; the item name is everything before the first
///    numeric token, the price is the first numeric token, and paid/free
///    quantities come from the last two numeric tokens.
pub struct TextRowsExtractor {
    source: PdftotextSource,
}

impl TextRowsExtractor {
    pub fn new() -> Self {
        TextRowsExtractor {
            source: PdftotextSource::new(),
        }
    }
}

impl Default for TextRowsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExtractor for TextRowsExtractor {
    fn extract(&self, document_bytes: &[u8]) -> Vec<RawTable> {
        let pages = match self.source.extract_pages(document_bytes) {
            Ok(pages) => pages,
            Err(e) => {
                warn!(error = %e, "text extraction failed");
                return Vec::new();
            }
        };
        let lines: Vec<&str> = pages
            .iter()
            .flat_map(|p| p.lines.iter().map(|s| s.as_str()))
            .collect();
        let table = parse_text_rows(&lines);
        if table.is_empty() {
            Vec::new()
        } else {
            vec![table]
        }
    }

    fn backend_name(&self) -> &str {
        "text-heuristic"
    }
}

/// Fixed-format invoice line: serial, item, paid qty, free qty, unit
/// rate, line amount. Serial and amount are matched but not carried into
/// the row.
static STRUCTURED_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<serial>\d+)[.)]?\s+(?P<item>\S.*?\S|\S)\s+(?P<paid>\d+)\s+(?P<free>\d+)\s+(?P<rate>\d[\d,]*(?:\.\d+)?)\s+(?P<amount>\d[\d,]*(?:\.\d+)?)\s*$",
    )
    .expect("structured row pattern is valid")
});

/// Parse free text lines into a table with the canonical four columns.
pub fn parse_text_rows(lines: &[&str]) -> RawTable {
    let mut rows: Vec<Vec<String>> = Vec::new();

    for line in lines {
        if let Some(row) = parse_structured(line).or_else(|| parse_generic(line)) {
            rows.push(row);
        }
    }

    debug!(rows = rows.len(), "text-heuristic rows parsed");

    RawTable::new(
        Role::ALL
            .iter()
            .map(|r| r.canonical_header().to_string())
            .collect(),
        rows,
    )
}

/// The strict pattern wins over the token heuristic when it matches.
fn parse_structured(line: &str) -> Option<Vec<String>> {
    let caps = STRUCTURED_ROW.captures(line)?;
    Some(vec![
        caps["item"].trim().to_string(),
        caps["rate"].to_string(),
        caps["paid"].to_string(),
        caps["free"].to_string(),
    ])
}

fn parse_generic(line: &str) -> Option<Vec<String>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let numeric_indices: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.chars().any(|c| c.is_ascii_digit()))
        .map(|(i, _)| i)
        .collect();

    if numeric_indices.len() < 2 {
        return None;
    }

    let first = numeric_indices[0];
    let item = tokens[..first].join(" ");
    let price = tokens[first];
    let paid = tokens[numeric_indices[numeric_indices.len() - 2]];
    let free = tokens[numeric_indices[numeric_indices.len() - 1]];

    Some(vec![
        item,
        price.to_string(),
        paid.to_string(),
        free.to_string(),
    ])
}
