pub mod layout;
pub mod pdftotext;
pub mod textrows;

use crate::error::FakturaError;
use crate::model::RawTable;
use tracing::debug;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// A table-extraction backend.
///
/// Extraction failure is signaled by an empty result, never by an error:
/// the fallback chain treats "no tables" and "backend broke" identically
/// and moves on to the next backend.
pub trait TableExtractor: Send + Sync {
    /// Extract zero or more raw tables from document bytes.
    fn extract(&self, document_bytes: &[u8]) -> Vec<RawTable>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// A table together with the backend that produced it.
#[derive(Debug, Clone)]
pub struct ExtractedTable {
    pub table: RawTable,
    pub backend: String,
}

/// Run the extraction fallback chain: each backend is tried exactly once,
/// in order, and the first one yielding a non-empty table wins. No
/// retries, no backoff. When a backend returns several tables, the one
/// with the most rows is selected.
pub fn extract_with_fallback(
    document_bytes: &[u8],
    extractors: &[&dyn TableExtractor],
) -> Result<ExtractedTable, FakturaError> {
    for extractor in extractors {
        let tables = extractor.extract(document_bytes);
        debug!(
            backend = extractor.backend_name(),
            tables = tables.len(),
            "extraction attempt"
        );

        if let Some(table) = largest_table(tables) {
            return Ok(ExtractedTable {
                table,
                backend: extractor.backend_name().to_string(),
            });
        }
    }

    Err(FakturaError::ExtractionEmpty)
}

/// The candidate table with the most rows; ties go to the earlier table.
fn largest_table(tables: Vec<RawTable>) -> Option<RawTable> {
    let mut best: Option<RawTable> = None;
    for table in tables {
        if table.is_empty() {
            continue;
        }
        match &best {
            None => best = Some(table),
            Some(b) if table.row_count() > b.row_count() => best = Some(table),
            _ => {}
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        name: &'static str,
        tables: Vec<RawTable>,
    }

    impl TableExtractor for Stub {
        fn extract(&self, _bytes: &[u8]) -> Vec<RawTable> {
            self.tables.clone()
        }

        fn backend_name(&self) -> &str {
            self.name
        }
    }

    fn table_with_rows(n: usize) -> RawTable {
        RawTable::new(
            vec!["Item".into(), "Rate".into()],
            (0..n).map(|i| vec![format!("item {i}"), "1".into()]).collect(),
        )
    }

    #[test]
    fn first_non_empty_backend_wins() {
        let a = Stub { name: "a", tables: vec![] };
        let b = Stub { name: "b", tables: vec![table_with_rows(3)] };
        let c = Stub { name: "c", tables: vec![table_with_rows(9)] };

        let got = extract_with_fallback(&[], &[&a as &dyn TableExtractor, &b, &c]).unwrap();
        assert_eq!(got.backend, "b");
        assert_eq!(got.table.row_count(), 3);
    }

    #[test]
    fn largest_table_selected_within_a_backend() {
        let a = Stub {
            name: "a",
            tables: vec![table_with_rows(2), table_with_rows(5), table_with_rows(5)],
        };
        let got = extract_with_fallback(&[], &[&a as &dyn TableExtractor]).unwrap();
        assert_eq!(got.table.row_count(), 5);
    }

    #[test]
    fn headers_only_table_does_not_count() {
        let a = Stub { name: "a", tables: vec![table_with_rows(0)] };
        let result = extract_with_fallback(&[], &[&a as &dyn TableExtractor]);
        assert!(matches!(result, Err(FakturaError::ExtractionEmpty)));
    }

    #[test]
    fn all_empty_is_extraction_empty() {
        let a = Stub { name: "a", tables: vec![] };
        let b = Stub { name: "b", tables: vec![] };
        assert!(matches!(
            extract_with_fallback(&[], &[&a as &dyn TableExtractor, &b]),
            Err(FakturaError::ExtractionEmpty)
        ));
    }
}
