use crate::error::FakturaError;
use crate::model::{CanonicalRow, EnrichedRow, InvoiceSummary};
use rust_decimal::Decimal;

/// A validated discount percentage in [0, 100].
///
/// Validation happens here at the boundary; the calculator itself assumes
/// the value is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount(Decimal);

impl Discount {
    pub fn new(percent: Decimal) -> Result<Discount, FakturaError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(FakturaError::InvalidDiscount(percent));
        }
        Ok(Discount(percent))
    }

    /// Build from an f64 (e.g. a CLI flag), via string round-trip to avoid
    /// floating-point artifacts (13.5_f64 must become exactly 13.5).
    pub fn from_f64(percent: f64) -> Result<Discount, FakturaError> {
        let decimal = format!("{percent}")
            .parse::<Decimal>()
            .or_else(|_| Decimal::try_from(percent))
            .map_err(|_| FakturaError::InvalidDiscount(Decimal::ZERO))?;
        Discount::new(decimal)
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }

    pub fn multiplier(&self) -> Decimal {
        (Decimal::ONE_HUNDRED - self.0) / Decimal::ONE_HUNDRED
    }
}

/// Compute the derived discount economics for each row, plus aggregates.
///
/// Per row:
/// - discounted_unit_price = original_price x (100 - d)/100
/// - total_qty = paid_qty + free_qty
/// - effective_rate = paid_qty x discounted_unit_price / total_qty when
///   total_qty > 0, otherwise the discounted unit price itself (a zero
///   total never produces a division fault)
///
/// All outputs rounded to 2 decimal places. Input rows are not mutated.
pub fn enrich(rows: &[CanonicalRow], discount: Discount) -> (Vec<EnrichedRow>, InvoiceSummary) {
    let multiplier = discount.multiplier();

    let enriched: Vec<EnrichedRow> = rows
        .iter()
        .map(|row| {
            let discounted_unit_price = (row.original_price * multiplier).round_dp(2);
            let total_qty = row.paid_qty + row.free_qty;
            let effective_rate = if total_qty > Decimal::ZERO {
                (row.paid_qty * discounted_unit_price / total_qty).round_dp(2)
            } else {
                discounted_unit_price
            };
            EnrichedRow {
                item_name: row.item_name.clone(),
                original_price: row.original_price,
                paid_qty: row.paid_qty,
                free_qty: row.free_qty,
                total_qty,
                discounted_unit_price,
                effective_rate,
            }
        })
        .collect();

    let summary = InvoiceSummary {
        item_count: enriched.len(),
        total_paid_qty: enriched.iter().map(|r| r.paid_qty).sum::<Decimal>().round_dp(2),
        total_free_qty: enriched.iter().map(|r| r.free_qty).sum::<Decimal>().round_dp(2),
        total_value_after_discount: enriched
            .iter()
            .map(|r| r.paid_qty * r.discounted_unit_price)
            .sum::<Decimal>()
            .round_dp(2),
    };

    (enriched, summary)
}
