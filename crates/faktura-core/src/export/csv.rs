use crate::error::FakturaError;
use crate::export::EXPORT_HEADERS;
use crate::model::EnrichedRow;

/// Write the enriched table as CSV with the fixed export column order.
pub fn write_csv(rows: &[EnrichedRow]) -> Result<Vec<u8>, FakturaError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| FakturaError::Export(e.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.item_name.clone(),
                row.original_price.to_string(),
                row.paid_qty.to_string(),
                row.free_qty.to_string(),
                row.total_qty.to_string(),
                row.discounted_unit_price.to_string(),
                row.effective_rate.to_string(),
            ])
            .map_err(|e| FakturaError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| FakturaError::Export(e.to_string()))
}
