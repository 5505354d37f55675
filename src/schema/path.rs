//! Dotted settings paths (`RenderSettings.aov_separator`).

use crate::error::SettingsError;

/// Split a dotted path into its segments.
///
/// The empty string addresses the root and yields no segments. Empty
/// segments (`a..b`, leading or trailing dots) are rejected.
pub fn segments(path: &str) -> Result<Vec<&str>, SettingsError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let parts: Vec<&str> = path.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(SettingsError::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

/// Append a key to a parent path
pub fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Append a list index to a parent path (`custom_passes[2]`)
pub fn index(parent: &str, i: usize) -> String {
    format!("{}[{}]", parent, i)
}
