//! Column lookup by alias.

use crate::config::ColumnAliases;
use crate::error::ReconError;
use crate::table::{RawTable, Side};

/// Resolved column positions for one table. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub id: usize,
    pub name: Option<usize>,
}

/// First header (in column order) whose trimmed, uppercased text equals one of
/// `aliases`. Aliases are expected to be uppercase already.
pub fn resolve_column<S: AsRef<str>>(headers: &[String], aliases: &[S]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_uppercase();
        aliases.iter().any(|a| a.as_ref() == h)
    })
}

/// Resolve the identifier (required) and name (optional) columns of a table.
pub fn resolve_columns(
    side: Side,
    table: &RawTable,
    aliases: &ColumnAliases,
) -> Result<ColumnIndex, ReconError> {
    let headers = table.headers();
    let id = resolve_column(headers, &aliases.id).ok_or_else(|| ReconError::MissingKeyColumn {
        side,
        aliases: aliases.id.clone(),
    })?;
    let name = resolve_column(headers, &aliases.name);

    if name.is_none() {
        log::debug!("{side}: no name column found, names compare as empty");
    }

    Ok(ColumnIndex { id, name })
}
