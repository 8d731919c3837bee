use crate::error::FakturaError;
use crate::export::EXPORT_HEADERS;
use crate::model::EnrichedRow;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

/// Write the enriched table to a single-sheet xlsx workbook and return
/// the file bytes. File placement is the caller's concern.
pub fn write_xlsx(rows: &[EnrichedRow]) -> Result<Vec<u8>, FakturaError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Invoice Analysis")
        .map_err(|e| FakturaError::Export(e.to_string()))?;

    let header_format = Format::new().set_bold();

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| FakturaError::Export(e.to_string()))?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet
            .write_string(r, 0, &row.item_name)
            .map_err(|e| FakturaError::Export(e.to_string()))?;
        let numbers = [
            row.original_price,
            row.paid_qty,
            row.free_qty,
            row.total_qty,
            row.discounted_unit_price,
            row.effective_rate,
        ];
        for (j, value) in numbers.iter().enumerate() {
            worksheet
                .write_number(r, (j + 1) as u16, value.to_f64().unwrap_or(0.0))
                .map_err(|e| FakturaError::Export(e.to_string()))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| FakturaError::Export(e.to_string()))
}
