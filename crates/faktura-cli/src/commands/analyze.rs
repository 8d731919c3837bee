use faktura_core::economics::Discount;
use faktura_core::error::FakturaError;
use faktura_core::export;
use faktura_core::extraction::layout::LayoutExtractor;
use faktura_core::extraction::textrows::TextRowsExtractor;
use faktura_core::extraction::TableExtractor;
use std::path::PathBuf;

use crate::commands::parse_mappings;
use crate::output;

pub fn run(
    input_file: PathBuf,
    discount_percent: f64,
    map_flags: Vec<String>,
    output_format: &str,
    xlsx_file: Option<PathBuf>,
    csv_file: Option<PathBuf>,
) -> Result<(), FakturaError> {
    let discount = Discount::from_f64(discount_percent)?;
    let manual = parse_mappings(&map_flags)?;

    let pdf_bytes = std::fs::read(&input_file)?;
    let layout = LayoutExtractor::new();
    let textrows = TextRowsExtractor::new();
    let extractors: [&dyn TableExtractor; 2] = [&layout, &textrows];

    let result = faktura_core::analyze_pdf(&pdf_bytes, &extractors, discount, &manual)?;

    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print_analysis(&result, discount),
    }

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    if let Some(path) = xlsx_file {
        let bytes = export::xlsx::write_xlsx(&result.rows)?;
        std::fs::write(&path, bytes)?;
        eprintln!("Wrote {} row(s) to {}", result.rows.len(), path.display());
    }

    if let Some(path) = csv_file {
        let bytes = export::csv::write_csv(&result.rows)?;
        std::fs::write(&path, bytes)?;
        eprintln!("Wrote {} row(s) to {}", result.rows.len(), path.display());
    }

    Ok(())
}
