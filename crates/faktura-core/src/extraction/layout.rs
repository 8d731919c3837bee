use crate::extraction::pdftotext::PdftotextSource;
use crate::extraction::{PageContent, TableExtractor};
use crate::model::RawTable;
use tracing::warn;

/// Table reconstruction from `pdftotext -layout` output.
///
/// Layout mode preserves column alignment with spaces; a header line is
/// located by keyword density and the columns under it are split on runs
/// of two or more spaces.
pub struct LayoutExtractor {
    source: PdftotextSource,
}

impl LayoutExtractor {
    pub fn new() -> Self {
        LayoutExtractor {
            source: PdftotextSource::new(),
        }
    }
}

impl Default for LayoutExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableExtractor for LayoutExtractor {
    fn extract(&self, document_bytes: &[u8]) -> Vec<RawTable> {
        // Backend failure degrades to "no tables"; the chain moves on.
        match self.source.extract_pages(document_bytes) {
            Ok(pages) => tables_from_pages(&pages),
            Err(e) => {
                warn!(error = %e, "layout extraction failed");
                Vec::new()
            }
        }
    }

    fn backend_name(&self) -> &str {
        "pdftotext-layout"
    }
}

/// Detect if a line looks like a table header row.
pub fn is_table_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    let header_keywords = [
        "item",
        "description",
        "product",
        "price",
        "rate",
        "qty",
        "quantity",
        "amount",
        "unit",
        "free",
        "mrp",
    ];
    let count = header_keywords
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count();
    count >= 2
}

/// Reconstruct tables from page lines: one table per detected header
/// region, ending at a blank line or page footer.
pub fn tables_from_pages(pages: &[PageContent]) -> Vec<RawTable> {
    let mut tables = Vec::new();

    for page in pages {
        let mut columns: Option<Vec<String>> = None;
        let mut rows: Vec<Vec<String>> = Vec::new();

        for line in &page.lines {
            if columns.is_none() {
                if is_table_header(line) {
                    columns = Some(
                        split_by_whitespace_gaps(line)
                            .into_iter()
                            .map(|s| s.to_string())
                            .collect(),
                    );
                }
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("Page") || trimmed.starts_with("---") {
                flush_table(&mut columns, &mut rows, &mut tables);
                continue;
            }

            let width = columns.as_ref().map(|c| c.len()).unwrap_or(0);
            let mut cells: Vec<String> = split_by_whitespace_gaps(line)
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            cells.truncate(width);
            rows.push(cells);
        }

        flush_table(&mut columns, &mut rows, &mut tables);
    }

    tables
}

fn flush_table(
    columns: &mut Option<Vec<String>>,
    rows: &mut Vec<Vec<String>>,
    tables: &mut Vec<RawTable>,
) {
    if let Some(cols) = columns.take() {
        if !rows.is_empty() {
            tables.push(RawTable::new(cols, std::mem::take(rows)));
        }
    }
    rows.clear();
}

/// Split a line by gaps of 2+ whitespace characters.
pub fn split_by_whitespace_gaps(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = None;
    let mut space_count = 0;

    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 2 {
                if let Some(s) = start {
                    let end = i - 1; // exclude the first space
                    segments.push(&line[s..end]);
                    start = None;
                }
            }
        } else {
            if start.is_none() {
                start = Some(i);
            }
            space_count = 0;
        }
    }

    if let Some(s) = start {
        segments.push(&line[s..]);
    }

    segments
}
