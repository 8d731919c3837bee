use crate::clean::clean;
use crate::model::{CanonicalRow, RawTable, Role, RoleAssignment};
use rust_decimal::Decimal;

/// Canonical rows plus the silent-defaulting diagnostics collected on the
/// way there.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub rows: Vec<CanonicalRow>,
    /// Non-blank cells that failed numeric parsing and became zero.
    pub absent_cells: usize,
}

/// Upstream cleanup before classification: drop rows that are blank in
/// every column, and deduplicate columns with identical normalized names
/// (first occurrence wins). Classification must never see two columns
/// claiming the same name.
pub fn prepare(table: &RawTable) -> RawTable {
    let mut keep: Vec<usize> = Vec::with_capacity(table.columns.len());
    let mut seen: Vec<String> = Vec::new();

    for (i, name) in table.columns.iter().enumerate() {
        let normalized = name.trim().to_lowercase();
        if seen.contains(&normalized) {
            continue;
        }
        seen.push(normalized);
        keep.push(i);
    }

    let columns: Vec<String> = keep.iter().map(|&i| table.columns[i].clone()).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .filter(|row| keep.iter().any(|&i| !row[i].trim().is_empty()))
        .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
        .collect();

    RawTable { columns, rows }
}

/// Build canonical rows from a prepared table and a role assignment.
///
/// Unassigned roles default (empty text / zero). Numeric cells that fail
/// to parse become zero; rows whose trimmed item name is empty are
/// dropped.
pub fn normalize(table: &RawTable, roles: &RoleAssignment) -> NormalizedTable {
    let mut rows = Vec::with_capacity(table.row_count());
    let mut absent_cells = 0usize;

    for raw in &table.rows {
        let item_name = match roles.get(Role::ItemName) {
            Some(m) => raw[m.column].trim().to_string(),
            None => String::new(),
        };
        if item_name.is_empty() {
            continue;
        }

        let mut numeric = |role: Role| -> Decimal {
            match roles.get(role) {
                Some(m) => {
                    let cell = raw[m.column].trim();
                    match clean(cell) {
                        Some(v) => v,
                        None => {
                            if !cell.is_empty() {
                                absent_cells += 1;
                            }
                            Decimal::ZERO
                        }
                    }
                }
                None => Decimal::ZERO,
            }
        };

        let original_price = numeric(Role::Price);
        let paid_qty = numeric(Role::PaidQty);
        let free_qty = numeric(Role::FreeQty);

        rows.push(CanonicalRow {
            item_name,
            original_price,
            paid_qty,
            free_qty,
        });
    }

    NormalizedTable { rows, absent_cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::model::RoleAssignment;
    use rust_decimal_macros::dec;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn prepare_drops_blank_rows() {
        let t = table(
            &["Item", "Rate"],
            &[&["Bolt", "10"], &["", "  "], &["Nut", "5"]],
        );
        let p = prepare(&t);
        assert_eq!(p.row_count(), 2);
    }

    #[test]
    fn prepare_dedupes_columns_keeping_first() {
        let t = table(
            &["Item", "Rate", " rate "],
            &[&["Bolt", "10", "99"]],
        );
        let p = prepare(&t);
        assert_eq!(p.columns, vec!["Item".to_string(), "Rate".to_string()]);
        assert_eq!(p.rows[0], vec!["Bolt".to_string(), "10".to_string()]);
    }

    #[test]
    fn normalize_builds_canonical_rows() {
        let t = table(
            &["Description", "Rate", "Qty", "Free"],
            &[&["Bolt M8", "10.00", "5", "1"]],
        );
        let roles = classify(&t);
        let n = normalize(&t, &roles);
        assert_eq!(
            n.rows,
            vec![CanonicalRow {
                item_name: "Bolt M8".into(),
                original_price: dec!(10.00),
                paid_qty: dec!(5),
                free_qty: dec!(1),
            }]
        );
        assert_eq!(n.absent_cells, 0);
    }

    #[test]
    fn rows_without_item_name_are_dropped() {
        let t = table(
            &["Description", "Rate", "Qty"],
            &[&["Bolt", "10", "5"], &["   ", "20", "6"]],
        );
        let roles = classify(&t);
        let n = normalize(&t, &roles);
        assert_eq!(n.rows.len(), 1);
        assert_eq!(n.rows[0].item_name, "Bolt");
    }

    #[test]
    fn unassigned_roles_default_to_zero() {
        // No "free" header anywhere: free qty is a zero-filled virtual
        // column.
        let t = table(&["Description", "Rate", "Qty"], &[&["Bolt", "10", "5"]]);
        let roles = classify(&t);
        assert!(roles.free_qty.is_none());
        let n = normalize(&t, &roles);
        assert_eq!(n.rows[0].free_qty, Decimal::ZERO);
    }

    #[test]
    fn empty_price_cell_becomes_zero_without_diagnostic() {
        let t = table(&["Description", "Rate", "Qty"], &[&["Bolt", "", "5"]]);
        let roles = classify(&t);
        let n = normalize(&t, &roles);
        assert_eq!(n.rows[0].original_price, Decimal::ZERO);
        assert_eq!(n.absent_cells, 0);
    }

    #[test]
    fn unparsable_cell_counts_as_absent() {
        let t = table(
            &["Description", "Rate", "Qty"],
            &[&["Bolt", "n/a", "5"], &["Nut", "4.50", "included"]],
        );
        let roles = classify(&t);
        let n = normalize(&t, &roles);
        assert_eq!(n.absent_cells, 2);
        assert_eq!(n.rows[0].original_price, Decimal::ZERO);
        assert_eq!(n.rows[1].paid_qty, Decimal::ZERO);
    }

    #[test]
    fn item_name_is_trimmed() {
        let t = table(&["Description", "Rate", "Qty"], &[&["  Bolt M8  ", "10", "5"]]);
        let roles = classify(&t);
        let n = normalize(&t, &roles);
        assert_eq!(n.rows[0].item_name, "Bolt M8");
    }

    #[test]
    fn identity_assignment_on_canonical_table_is_idempotent() {
        let t = table(
            &["Item Name", "Original Price", "Paid Qty", "Free Qty"],
            &[&["Bolt M8", "10.00", "5", "1"], &["Nut", "4.50", "12", "0"]],
        );
        let roles = RoleAssignment::identity(&t);
        let first = normalize(&t, &roles);

        // Feed the canonical rows back through as a raw table.
        let again = RawTable::new(
            t.columns.clone(),
            first
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.item_name.clone(),
                        r.original_price.to_string(),
                        r.paid_qty.to_string(),
                        r.free_qty.to_string(),
                    ]
                })
                .collect(),
        );
        let second = normalize(&again, &RoleAssignment::identity(&again));
        assert_eq!(first.rows, second.rows);
    }
}
