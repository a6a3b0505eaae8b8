//! Filesystem helpers shared across intake and the CLI.

use crate::utils::{CompressorError, CompressorResult};

/// Returns the final path component as an owned string.
///
/// Handles both separator styles; a path with no separator is returned
/// whole.
pub fn file_name_of(path: &str) -> String {
    path.rsplit(['/', '\\']).next().unwrap_or(path).to_string()
}

/// Reads the on-disk size of `path` in bytes.
pub async fn file_size(path: &str) -> CompressorResult<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| CompressorError::io(format!("Failed to read metadata for {}: {}", path, e)))?;
    Ok(metadata.len())
}

/// Formats a byte count for display, e.g. `2.5 MB`.
///
/// Sizes use 1024-based units and keep at most two decimals, with
/// trailing zeros trimmed.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        return format!("{} {}", bytes, UNITS[unit]);
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
