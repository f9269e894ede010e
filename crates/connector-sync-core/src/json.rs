//! JSON-encoded field helpers.

use connector_sync_types::{tree_from_json, ConfigTree, Result, SyncError};

/// Parse a JSON object supplied for `field`.
pub fn parse_object(field: &str, text: &str) -> Result<ConfigTree> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| SyncError::invalid_input(field, format!("error parsing {}: {}", field, e)))?;
    tree_from_json(value)
        .ok_or_else(|| SyncError::invalid_input(field, format!("{} must be a JSON object", field)))
}

/// Like [`parse_object`], but absent or blank text means "not supplied".
pub fn parse_optional_object(field: &str, text: Option<&str>) -> Result<Option<ConfigTree>> {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => parse_object(field, text).map(Some),
        None => Ok(None),
    }
}
