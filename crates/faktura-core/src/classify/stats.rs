use crate::clean::clean;
use crate::model::RawTable;
use rust_decimal::prelude::ToPrimitive;

/// Per-column statistics driving the role heuristics.
///
/// Computed on demand, never stored. Scores are heuristics, so the
/// arithmetic here is plain f64; the cell values themselves stay Decimal
/// everywhere downstream.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    /// Share of cells that parse as numeric, over all cells in the column.
    pub numeric_proportion: f64,
    /// Median of the parsed numeric values; None when nothing parses.
    pub median: Option<f64>,
    /// Population standard deviation of the parsed values; None when
    /// nothing parses.
    pub std_dev: Option<f64>,
    /// Mean character length of the raw cell text.
    pub avg_text_len: f64,
}

pub fn column_stats(table: &RawTable, col: usize) -> ColumnStats {
    let total = table.row_count();
    if total == 0 {
        return ColumnStats {
            numeric_proportion: 0.0,
            median: None,
            std_dev: None,
            avg_text_len: 0.0,
        };
    }

    let mut parsed: Vec<f64> = Vec::new();
    let mut len_sum = 0usize;

    for cell in table.column_values(col) {
        len_sum += cell.chars().count();
        if let Some(v) = clean(cell).and_then(|d| d.to_f64()) {
            parsed.push(v);
        }
    }

    let numeric_proportion = parsed.len() as f64 / total as f64;
    let avg_text_len = len_sum as f64 / total as f64;

    let (median, std_dev) = if parsed.is_empty() {
        (None, None)
    } else {
        (Some(median_of(&mut parsed)), Some(std_dev_of(&parsed)))
    };

    ColumnStats {
        numeric_proportion,
        median,
        std_dev,
        avg_text_len,
    }
}

fn median_of(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

fn std_dev_of(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
