//! Integration tests for the analyze_pdf() end-to-end pipeline.
//!
//! Uses stub TableExtractors that return pre-built RawTables without
//! invoking pdftotext, so these tests run without poppler-utils.

use std::sync::atomic::{AtomicUsize, Ordering};

use faktura_core::economics::Discount;
use faktura_core::error::FakturaError;
use faktura_core::extraction::textrows::parse_text_rows;
use faktura_core::extraction::TableExtractor;
use faktura_core::model::{ManualMap, RawTable, Role};
use faktura_core::{analyze_pdf, analyze_table};
use rust_decimal_macros::dec;

struct StubExtractor {
    name: &'static str,
    tables: Vec<RawTable>,
    calls: AtomicUsize,
}

impl StubExtractor {
    fn new(name: &'static str, tables: Vec<RawTable>) -> Self {
        StubExtractor {
            name,
            tables,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TableExtractor for StubExtractor {
    fn extract(&self, _bytes: &[u8]) -> Vec<RawTable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tables.clone()
    }

    fn backend_name(&self) -> &str {
        self.name
    }
}

fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

fn discount(pct: f64) -> Discount {
    Discount::from_f64(pct).unwrap()
}

// ---------------------------------------------------------------------------
// Scenario 1: descriptive headers, free column present, 10% discount
// ---------------------------------------------------------------------------
#[test]
fn descriptive_headers_with_free_column() {
    let stub = StubExtractor::new(
        "stub",
        vec![table(
            &["Description", "Rate", "Qty", "Free"],
            &[&["Bolt M8", "10.00", "5", "1"]],
        )],
    );

    let result = analyze_pdf(&[], &[&stub as &dyn TableExtractor], discount(10.0), &[]).unwrap();

    assert_eq!(result.backend.as_deref(), Some("stub"));
    let row = &result.rows[0];
    assert_eq!(row.item_name, "Bolt M8");
    assert_eq!(row.original_price, dec!(10.00));
    assert_eq!(row.paid_qty, dec!(5));
    assert_eq!(row.free_qty, dec!(1));
    assert_eq!(row.discounted_unit_price, dec!(9.00));
    assert_eq!(row.total_qty, dec!(6));
    // 5 x 9.00 / 6
    assert_eq!(row.effective_rate, dec!(7.50));
}

// ---------------------------------------------------------------------------
// Scenario 2: no free column anywhere — free qty defaults to zero
// ---------------------------------------------------------------------------
#[test]
fn absent_free_column_defaults_to_zero() {
    let stub = StubExtractor::new(
        "stub",
        vec![table(
            &["Description", "Rate", "Qty"],
            &[&["Bolt M8", "10.00", "5"], &["Hex nut", "4.50", "12"]],
        )],
    );

    let result = analyze_pdf(&[], &[&stub as &dyn TableExtractor], discount(10.0), &[]).unwrap();

    assert!(result.assignment.free_qty.is_none());
    for row in &result.rows {
        assert_eq!(row.free_qty, dec!(0));
        assert_eq!(row.total_qty, row.paid_qty);
    }
}

// ---------------------------------------------------------------------------
// Scenario 3: empty price cell — zero price, zero effective rate
// ---------------------------------------------------------------------------
#[test]
fn empty_price_cell_zeroes_the_economics() {
    let stub = StubExtractor::new(
        "stub",
        vec![table(
            &["Description", "Rate", "Qty", "Free"],
            &[&["Mystery item", "", "5", "0"]],
        )],
    );

    let result = analyze_pdf(&[], &[&stub as &dyn TableExtractor], discount(10.0), &[]).unwrap();

    let row = &result.rows[0];
    assert_eq!(row.original_price, dec!(0));
    assert_eq!(row.discounted_unit_price, dec!(0.00));
    // total_qty > 0, so the formula applies and yields 0.
    assert_eq!(row.effective_rate, dec!(0.00));
    assert!(result.diagnostics.all_prices_zero);
}

// ---------------------------------------------------------------------------
// Fallback ordering: A empty, B non-empty — B wins, each tried once
// ---------------------------------------------------------------------------
#[test]
fn fallback_chain_tries_each_backend_once_in_order() {
    let a = StubExtractor::new("a", vec![]);
    let b = StubExtractor::new(
        "b",
        vec![table(
            &["Description", "Rate", "Qty"],
            &[
                &["Bolt M8", "10.00", "5"],
                &["Hex nut", "4.50", "12"],
                &["Washer", "2.00", "30"],
            ],
        )],
    );

    let result = analyze_pdf(&[], &[&a as &dyn TableExtractor, &b], discount(0.0), &[]).unwrap();

    assert_eq!(result.backend.as_deref(), Some("b"));
    assert_eq!(result.rows.len(), 3);
    assert_eq!(a.call_count(), 1);
    assert_eq!(b.call_count(), 1);
}

// ---------------------------------------------------------------------------
// All backends empty — ExtractionEmpty, nothing retried
// ---------------------------------------------------------------------------
#[test]
fn exhausted_chain_is_extraction_empty() {
    let a = StubExtractor::new("a", vec![]);
    let b = StubExtractor::new("b", vec![]);

    let result = analyze_pdf(&[], &[&a as &dyn TableExtractor, &b], discount(0.0), &[]);

    assert!(matches!(result, Err(FakturaError::ExtractionEmpty)));
    assert_eq!(a.call_count(), 1);
    assert_eq!(b.call_count(), 1);
}

// ---------------------------------------------------------------------------
// Text-heuristic fallback as the last link of the chain
// ---------------------------------------------------------------------------
#[test]
fn text_heuristic_rows_flow_through_the_pipeline() {
    let lines = vec![
        "ACME Traders",
        "1  Bolt M8  5  1  10.00  50.00",
        "Washer plain 2.00 30 6",
        "Thank you for your business",
    ];
    let parsed = parse_text_rows(&lines);
    let a = StubExtractor::new("a", vec![]);
    let text = StubExtractor::new("text-heuristic", vec![parsed]);

    let result = analyze_pdf(&[], &[&a as &dyn TableExtractor, &text], discount(10.0), &[]).unwrap();

    assert_eq!(result.backend.as_deref(), Some("text-heuristic"));
    assert_eq!(result.rows.len(), 2);
    let bolt = &result.rows[0];
    assert_eq!(bolt.item_name, "Bolt M8");
    assert_eq!(bolt.discounted_unit_price, dec!(9.00));
    assert_eq!(bolt.effective_rate, dec!(7.50));
}

// ---------------------------------------------------------------------------
// Discount bounds: 0% preserves prices, 100% zeroes them
// ---------------------------------------------------------------------------
#[test]
fn discount_bounds() {
    let make_stub = || {
        StubExtractor::new(
            "stub",
            vec![table(
                &["Description", "Rate", "Qty", "Free"],
                &[&["Bolt M8", "12.34", "5", "1"]],
            )],
        )
    };

    let stub = make_stub();
    let zero = analyze_pdf(&[], &[&stub as &dyn TableExtractor], discount(0.0), &[]).unwrap();
    assert_eq!(zero.rows[0].discounted_unit_price, dec!(12.34));

    let stub = make_stub();
    let full = analyze_pdf(&[], &[&stub as &dyn TableExtractor], discount(100.0), &[]).unwrap();
    assert_eq!(full.rows[0].discounted_unit_price, dec!(0.00));
    assert_eq!(full.rows[0].effective_rate, dec!(0.00));
}

// ---------------------------------------------------------------------------
// Messy currency cells clean up on the way through
// ---------------------------------------------------------------------------
#[test]
fn currency_cells_are_cleaned() {
    let stub = StubExtractor::new(
        "stub",
        vec![table(
            &["Description", "Rate", "Qty"],
            &[&["Imported valve", "Rs. 1,234.50", "2"]],
        )],
    );

    let result = analyze_pdf(&[], &[&stub as &dyn TableExtractor], discount(0.0), &[]).unwrap();

    assert_eq!(result.rows[0].original_price, dec!(1234.50));
}

// ---------------------------------------------------------------------------
// Manual mapping overrides a bad automatic pick
// ---------------------------------------------------------------------------
#[test]
fn manual_mapping_overrides_detection() {
    // "Amount" would win the price role by headers; the caller knows the
    // real unit price lives in "List".
    let t = table(
        &["Description", "List", "Amount", "Qty"],
        &[&["Bolt M8", "10.00", "50.00", "5"]],
    );
    let stub = StubExtractor::new("stub", vec![t]);
    let manual = vec![ManualMap {
        role: Role::Price,
        column: "List".into(),
    }];

    let result = analyze_pdf(&[], &[&stub as &dyn TableExtractor], discount(0.0), &manual).unwrap();

    assert_eq!(result.rows[0].original_price, dec!(10.00));
    let price = result.assignment.price.as_ref().unwrap();
    assert_eq!(price.column_name, "List");
}

// ---------------------------------------------------------------------------
// Duplicate headers and blank rows disappear before classification
// ---------------------------------------------------------------------------
#[test]
fn duplicate_columns_and_blank_rows_are_pruned() {
    let stub = StubExtractor::new(
        "stub",
        vec![table(
            &["Description", "Rate", "Rate", "Qty"],
            &[
                &["Bolt M8", "10.00", "99.00", "5"],
                &["", "", "", ""],
                &["Hex nut", "4.50", "99.00", "12"],
            ],
        )],
    );

    let result = analyze_pdf(&[], &[&stub as &dyn TableExtractor], discount(0.0), &[]).unwrap();

    assert_eq!(result.rows.len(), 2);
    // First "Rate" column wins.
    assert_eq!(result.rows[0].original_price, dec!(10.00));
    assert_eq!(result.rows[1].original_price, dec!(4.50));
}

// ---------------------------------------------------------------------------
// Summary aggregates are paid-quantity weighted
// ---------------------------------------------------------------------------
#[test]
fn summary_totals() {
    let stub = StubExtractor::new(
        "stub",
        vec![table(
            &["Description", "Rate", "Qty", "Free"],
            &[
                &["Bolt M8", "10.00", "2", "1"],
                &["Hex nut", "5.00", "4", "0"],
            ],
        )],
    );

    let result = analyze_pdf(&[], &[&stub as &dyn TableExtractor], discount(0.0), &[]).unwrap();

    assert_eq!(result.summary.item_count, 2);
    assert_eq!(result.summary.total_paid_qty, dec!(6));
    assert_eq!(result.summary.total_free_qty, dec!(1));
    // 2x10 + 4x5 = 40, not 10 + 5.
    assert_eq!(result.summary.total_value_after_discount, dec!(40.00));
}

// ---------------------------------------------------------------------------
// analyze_table works without any extractor in the loop
// ---------------------------------------------------------------------------
#[test]
fn analyze_table_direct_entry_point() {
    let t = table(
        &["Description", "Rate", "Qty", "Free"],
        &[&["Bolt M8", "10.00", "5", "1"]],
    );
    let result = analyze_table(&t, discount(10.0), &[]).unwrap();
    assert_eq!(result.rows[0].effective_rate, dec!(7.50));
    assert!(result.backend.is_none());
}
