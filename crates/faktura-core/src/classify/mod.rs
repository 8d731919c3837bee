pub mod stats;

use crate::error::FakturaError;
use crate::model::{ManualMap, MatchSource, RawTable, Role, RoleAssignment, RoleMatch};
use stats::{column_stats, ColumnStats};
use tracing::debug;

/// Assign each semantic role to the best-fitting column of the table.
///
/// Resolution order per role: manual mapping (if any), header keyword
/// match, statistical scoring. Roles are resolved in priority order
/// (item name, price, paid qty, free qty) and a column claimed by an
/// earlier role is skipped by later searches. A role with no convincing
/// column stays unassigned; the normalizer supplies its default.
pub fn classify(table: &RawTable) -> RoleAssignment {
    let mut assignment = RoleAssignment::default();
    resolve_automatic(table, &mut assignment);
    assignment
}

/// Like [`classify`], but with caller-supplied mappings taking precedence.
pub fn classify_with(
    table: &RawTable,
    manual: &[ManualMap],
) -> Result<RoleAssignment, FakturaError> {
    let mut assignment = RoleAssignment::default();
    apply_manual(table, manual, &mut assignment)?;
    resolve_automatic(table, &mut assignment);
    Ok(assignment)
}

fn resolve_automatic(table: &RawTable, assignment: &mut RoleAssignment) {
    apply_header_keywords(table, assignment);
    apply_statistics(table, assignment);

    for role in Role::ALL {
        match assignment.get(role) {
            Some(m) => debug!(
                role = %role,
                column = %m.column_name,
                confidence = m.confidence,
                source = ?m.matched_by,
                "role resolved"
            ),
            None => debug!(role = %role, "role unresolved, normalizer will default"),
        }
    }
}

fn apply_manual(
    table: &RawTable,
    manual: &[ManualMap],
    assignment: &mut RoleAssignment,
) -> Result<(), FakturaError> {
    for map in manual {
        let col = table.find_column(&map.column).ok_or_else(|| {
            FakturaError::InvalidRoleMapping(format!(
                "no column named '{}' (available: {})",
                map.column,
                table.columns.join(", ")
            ))
        })?;
        if assignment.claimed_columns().contains(&col) {
            return Err(FakturaError::InvalidRoleMapping(format!(
                "column '{}' mapped to more than one role",
                map.column
            )));
        }
        assignment.set(
            map.role,
            RoleMatch {
                column: col,
                column_name: table.columns[col].clone(),
                confidence: 1.0,
                matched_by: MatchSource::Manual,
            },
        );
    }
    Ok(())
}

/// Header fast path: keyword chain per column, first hit claims it.
///
/// A role is accepted from headers only when exactly one column claimed
/// it; an ambiguous role falls back to the statistical pass.
fn apply_header_keywords(table: &RawTable, assignment: &mut RoleAssignment) {
    let mut candidates: [Vec<usize>; 4] = Default::default();

    for (col, name) in table.columns.iter().enumerate() {
        let lower = name.trim().to_lowercase();
        if lower.is_empty() {
            continue;
        }
        let role = if lower.contains("item") || lower.contains("description") || lower.contains("name") {
            Some(Role::ItemName)
        } else if lower.contains("price")
            || lower.contains("rate")
            || lower.contains("unit")
            || lower.contains("amount")
        {
            Some(Role::Price)
        } else if lower.contains("free") {
            Some(Role::FreeQty)
        } else if lower.contains("qty") || lower.contains("quantity") {
            Some(Role::PaidQty)
        } else {
            None
        };
        if let Some(role) = role {
            let slot = Role::ALL.iter().position(|r| *r == role).unwrap();
            candidates[slot].push(col);
        }
    }

    for (slot, role) in Role::ALL.into_iter().enumerate() {
        if assignment.get(role).is_some() {
            continue; // manual mapping wins
        }
        let cols: Vec<usize> = candidates[slot]
            .iter()
            .copied()
            .filter(|c| !assignment.claimed_columns().contains(c))
            .collect();
        // Only an unambiguous header match overrides the statistics.
        if cols.len() == 1 {
            let col = cols[0];
            assignment.set(
                role,
                RoleMatch {
                    column: col,
                    column_name: table.columns[col].clone(),
                    confidence: 1.0,
                    matched_by: MatchSource::Header,
                },
            );
        }
    }
}

/// Statistical fallback for roles the headers did not settle.
fn apply_statistics(table: &RawTable, assignment: &mut RoleAssignment) {
    let all_stats: Vec<ColumnStats> = (0..table.columns.len())
        .map(|c| column_stats(table, c))
        .collect();

    for role in Role::ALL {
        if assignment.get(role).is_some() {
            continue;
        }
        let claimed = assignment.claimed_columns();
        let open = || {
            all_stats
                .iter()
                .enumerate()
                .filter(|(c, _)| !claimed.contains(c))
        };

        let best = match role {
            Role::ItemName => pick_max(open().map(|(c, s)| (c, item_name_score(s)))),
            Role::Price => pick_max(
                open()
                    .filter(|(_, s)| s.median.is_some_and(|m| m > 0.0))
                    .map(|(c, s)| (c, s.numeric_proportion)),
            ),
            Role::PaidQty => pick_max(
                open()
                    .filter(|(_, s)| s.numeric_proportion >= 0.3)
                    .map(|(c, s)| (c, paid_qty_score(s))),
            ),
            // No statistical path: without a "free" header the quantity is
            // a zero-filled virtual column.
            Role::FreeQty => None,
        };

        if let Some((col, score)) = best {
            assignment.set(
                role,
                RoleMatch {
                    column: col,
                    column_name: table.columns[col].clone(),
                    confidence: score,
                    matched_by: MatchSource::Stats,
                },
            );
        }
    }
}

/// Favors long, mostly non-numeric text.
fn item_name_score(s: &ColumnStats) -> f64 {
    0.6 * (1.0 - s.numeric_proportion) + 0.4 * (s.avg_text_len / 100.0)
}

/// Favors dense numeric columns with small, tightly clustered values.
fn paid_qty_score(s: &ColumnStats) -> f64 {
    let mut score = s.numeric_proportion;
    if let Some(median) = s.median {
        if median < 10_000.0 {
            score += 0.5;
        }
        if let Some(std_dev) = s.std_dev {
            if std_dev < 2.0 * median + 1.0 {
                score += 0.2;
            }
        }
    }
    score
}

/// First strictly-greatest score wins, so ties resolve to the leftmost
/// column.
fn pick_max(scored: impl Iterator<Item = (usize, f64)>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (col, score) in scored {
        match best {
            None => best = Some((col, score)),
            Some((_, s)) if score > s => best = Some((col, score)),
            _ => {}
        }
    }
    best
}
