use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table as it comes out of an extractor: named columns of raw string cells.
///
/// Column names may be blank or duplicated; `normalize::prepare` cleans that
/// up before classification. Every row is padded to the column count at
/// construction so indexing is always safe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<String>>) -> RawTable {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        RawTable { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All cell values of one column, top to bottom.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |r| r[col].as_str())
    }

    /// Find a column by name, trimmed and case-insensitive.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let needle = name.trim().to_lowercase();
        self.columns
            .iter()
            .position(|c| c.trim().to_lowercase() == needle)
    }
}

/// The four semantic column meanings every raw column is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ItemName,
    Price,
    PaidQty,
    FreeQty,
}

impl Role {
    /// All roles in classifier priority order (first-match-wins).
    pub const ALL: [Role; 4] = [Role::ItemName, Role::Price, Role::PaidQty, Role::FreeQty];

    pub fn from_str_loose(s: &str) -> Option<Role> {
        match s.trim().to_lowercase().as_str() {
            "item" | "item_name" | "name" | "description" => Some(Role::ItemName),
            "price" | "rate" | "original_price" => Some(Role::Price),
            "paid" | "qty" | "paid_qty" | "quantity" => Some(Role::PaidQty),
            "free" | "free_qty" => Some(Role::FreeQty),
            _ => None,
        }
    }

    /// Canonical column header used in normalized output and exports.
    pub fn canonical_header(&self) -> &'static str {
        match self {
            Role::ItemName => "Item Name",
            Role::Price => "Original Price",
            Role::PaidQty => "Paid Qty",
            Role::FreeQty => "Free Qty",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::ItemName => write!(f, "item name"),
            Role::Price => write!(f, "price"),
            Role::PaidQty => write!(f, "paid qty"),
            Role::FreeQty => write!(f, "free qty"),
        }
    }
}

/// How a role was resolved to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Header,
    Stats,
    Manual,
}

/// One resolved role: which column, how confidently, and by which path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleMatch {
    pub column: usize,
    pub column_name: String,
    pub confidence: f64,
    pub matched_by: MatchSource,
}

/// Mapping from each semantic role to an optional column.
///
/// A column serves at most one role; a role left unresolved gets a neutral
/// default (empty text / zero) in the normalizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub item_name: Option<RoleMatch>,
    pub price: Option<RoleMatch>,
    pub paid_qty: Option<RoleMatch>,
    pub free_qty: Option<RoleMatch>,
}

impl RoleAssignment {
    pub fn get(&self, role: Role) -> Option<&RoleMatch> {
        match role {
            Role::ItemName => self.item_name.as_ref(),
            Role::Price => self.price.as_ref(),
            Role::PaidQty => self.paid_qty.as_ref(),
            Role::FreeQty => self.free_qty.as_ref(),
        }
    }

    pub fn set(&mut self, role: Role, m: RoleMatch) {
        let slot = match role {
            Role::ItemName => &mut self.item_name,
            Role::Price => &mut self.price,
            Role::PaidQty => &mut self.paid_qty,
            Role::FreeQty => &mut self.free_qty,
        };
        *slot = Some(m);
    }

    /// Column indices already claimed by some role.
    pub fn claimed_columns(&self) -> Vec<usize> {
        Role::ALL
            .iter()
            .filter_map(|r| self.get(*r).map(|m| m.column))
            .collect()
    }

    pub fn assigned_count(&self) -> usize {
        Role::ALL.iter().filter(|r| self.get(**r).is_some()).count()
    }

    /// Assignment mapping the canonical headers onto themselves.
    ///
    /// Useful for re-running a table that is already in canonical form.
    pub fn identity(table: &RawTable) -> RoleAssignment {
        let mut assignment = RoleAssignment::default();
        for role in Role::ALL {
            if let Some(col) = table.find_column(role.canonical_header()) {
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
        assignment
    }
}

/// A manual role-to-column mapping supplied by the caller, by column name.
///
/// Resolved against the prepared table at classification time; overrides the
/// automatic detection for that role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualMap {
    pub role: Role,
    pub column: String,
}

/// One normalized invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub item_name: String,
    pub original_price: Decimal,
    pub paid_qty: Decimal,
    pub free_qty: Decimal,
}

/// A canonical row plus the derived discount economics, all rounded to 2 dp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRow {
    pub item_name: String,
    pub original_price: Decimal,
    pub paid_qty: Decimal,
    pub free_qty: Decimal,
    pub total_qty: Decimal,
    pub discounted_unit_price: Decimal,
    pub effective_rate: Decimal,
}

/// Aggregates over all enriched rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub item_count: usize,
    pub total_paid_qty: Decimal,
    pub total_free_qty: Decimal,
    /// Sum of paid_qty x discounted_unit_price across rows.
    pub total_value_after_discount: Decimal,
}

/// Non-fatal signals about how much silent defaulting happened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Non-blank cells that failed numeric parsing and were coerced to zero.
    pub absent_cells: usize,
    /// Every row's original price normalized to zero — likely misclassified
    /// columns.
    pub all_prices_zero: bool,
}

/// Full outcome of one invoice analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub rows: Vec<EnrichedRow>,
    pub summary: InvoiceSummary,
    pub assignment: RoleAssignment,
    pub diagnostics: Diagnostics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Extraction backend that produced the table, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

/// Outcome of extraction + classification + normalization, before economics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub backend: String,
    pub assignment: RoleAssignment,
    pub rows: Vec<CanonicalRow>,
    pub absent_cells: usize,
}
