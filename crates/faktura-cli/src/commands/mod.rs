pub mod analyze;
pub mod extract;

use faktura_core::error::FakturaError;
use faktura_core::model::{ManualMap, Role};

/// Parse repeated `--map role=column` flags into manual mappings.
pub fn parse_mappings(flags: &[String]) -> Result<Vec<ManualMap>, FakturaError> {
    flags
        .iter()
        .map(|flag| {
            let (role, column) = flag.split_once('=').ok_or_else(|| {
                FakturaError::InvalidRoleMapping(format!(
                    "'{flag}' is not of the form role=column"
                ))
            })?;
            let role = Role::from_str_loose(role).ok_or_else(|| {
                FakturaError::InvalidRoleMapping(format!(
                    "unknown role '{role}' (expected item, price, paid or free)"
                ))
            })?;
            Ok(ManualMap {
                role,
                column: column.trim().to_string(),
            })
        })
        .collect()
}
