pub mod classify;
pub mod clean;
pub mod economics;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod normalize;

use economics::Discount;
use error::FakturaError;
use extraction::TableExtractor;
use model::{
    AnalysisResult, Diagnostics, ExtractionReport, ManualMap, RawTable, Role, RoleAssignment,
};
use tracing::info;

/// Main API entry point: analyze a PDF invoice end to end.
///
/// Runs the extraction fallback chain (each backend once, in order, first
/// non-empty table wins), then classification, normalization and the
/// discount economics. Manual role mappings, when given, override the
/// automatic detection for those roles.
pub fn analyze_pdf(
    pdf_bytes: &[u8],
    extractors: &[&dyn TableExtractor],
    discount: Discount,
    manual: &[ManualMap],
) -> Result<AnalysisResult, FakturaError> {
    let extracted = extraction::extract_with_fallback(pdf_bytes, extractors)?;
    info!(
        backend = %extracted.backend,
        rows = extracted.table.row_count(),
        "table extracted"
    );

    let mut result = analyze_table(&extracted.table, discount, manual)?;
    result.backend = Some(extracted.backend);
    Ok(result)
}

/// Analyze a pre-extracted raw table: prepare, classify, normalize,
/// enrich.
pub fn analyze_table(
    table: &RawTable,
    discount: Discount,
    manual: &[ManualMap],
) -> Result<AnalysisResult, FakturaError> {
    let prepared = normalize::prepare(table);
    let assignment = classify::classify_with(&prepared, manual)?;
    Ok(run_economics(&prepared, &assignment, discount))
}

/// Alternate entry point bypassing automatic classification entirely: the
/// caller supplies the full role assignment.
pub fn analyze_table_with_roles(
    table: &RawTable,
    roles: &RoleAssignment,
    discount: Discount,
) -> AnalysisResult {
    let prepared = normalize::prepare(table);
    run_economics(&prepared, roles, discount)
}

/// Extraction + classification + normalization, without the economics.
/// Backs the CLI's `extract` command for inspecting detection quality.
pub fn extract_table(
    pdf_bytes: &[u8],
    extractors: &[&dyn TableExtractor],
    manual: &[ManualMap],
) -> Result<ExtractionReport, FakturaError> {
    let extracted = extraction::extract_with_fallback(pdf_bytes, extractors)?;
    let prepared = normalize::prepare(&extracted.table);
    let assignment = classify::classify_with(&prepared, manual)?;
    let normalized = normalize::normalize(&prepared, &assignment);

    Ok(ExtractionReport {
        backend: extracted.backend,
        assignment,
        rows: normalized.rows,
        absent_cells: normalized.absent_cells,
    })
}

fn run_economics(
    prepared: &RawTable,
    assignment: &RoleAssignment,
    discount: Discount,
) -> AnalysisResult {
    let normalized = normalize::normalize(prepared, assignment);
    let (rows, summary) = economics::enrich(&normalized.rows, discount);

    let diagnostics = Diagnostics {
        absent_cells: normalized.absent_cells,
        all_prices_zero: !rows.is_empty() && rows.iter().all(|r| r.original_price.is_zero()),
    };

    let mut warnings = Vec::new();
    for role in Role::ALL {
        if assignment.get(role).is_none() {
            warnings.push(format!(
                "no column detected for {role}; using its default value"
            ));
        }
    }
    if diagnostics.absent_cells > 0 {
        warnings.push(format!(
            "{} cell(s) could not be parsed as numbers and were treated as 0",
            diagnostics.absent_cells
        ));
    }
    if diagnostics.all_prices_zero {
        warnings.push(
            "every price normalized to 0 — the price column may be misclassified".to_string(),
        );
    }

    AnalysisResult {
        rows,
        summary,
        assignment: assignment.clone(),
        diagnostics,
        warnings,
        backend: None,
    }
}
