use faktura_core::error::FakturaError;
use faktura_core::extraction::layout::LayoutExtractor;
use faktura_core::extraction::textrows::TextRowsExtractor;
use faktura_core::extraction::TableExtractor;
use std::path::PathBuf;

use crate::commands::parse_mappings;
use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    map_flags: Vec<String>,
) -> Result<(), FakturaError> {
    let manual = parse_mappings(&map_flags)?;

    let pdf_bytes = std::fs::read(&input_file)?;
    let layout = LayoutExtractor::new();
    let textrows = TextRowsExtractor::new();
    let extractors: [&dyn TableExtractor; 2] = [&layout, &textrows];

    let report = faktura_core::extract_table(&pdf_bytes, &extractors, &manual)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Extracted {} row(s) via {}, written to {}",
                report.rows.len(),
                report.backend,
                path.display()
            );
            if report.absent_cells > 0 {
                eprintln!(
                    "  {} cell(s) could not be parsed as numbers",
                    report.absent_cells
                );
            }
        }
        None => {
            let output_str = match output_format {
                "json" => serde_json::to_string_pretty(&report)?,
                _ => output::table::format_extraction(&report),
            };
            println!("{output_str}");
        }
    }

    Ok(())
}
