//! Raw page body storage.
//!
//! Bodies are UTF-8 text files. The stored form always ends with exactly
//! one `\r\n` terminator; [`normalize_terminator`] is idempotent, so
//! re-saving an already-terminated body never grows a second one.

use std::fs;
use std::path::Path;

use crate::error::StoreError;

/// Canonical line terminator of stored bodies.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Read the full raw body at `path`.
///
/// Returns `NotFound` if the file does not exist and `Decode` if its
/// bytes are not valid UTF-8.
pub fn load(path: &Path) -> Result<String, StoreError> {
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound(path.display().to_string())
        } else {
            StoreError::Io(e)
        }
    })?;

    String::from_utf8(bytes).map_err(|_| StoreError::Decode(path.display().to_string()))
}

/// Write the full raw body at `path`, overwriting, creating parent
/// directories as needed. The body is normalized to end with a single
/// line terminator before writing.
pub fn save(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, normalize_terminator(content))?;
    Ok(())
}

/// Ensure `content` ends with exactly one `\r\n`.
///
/// A trailing bare `\n` is upgraded rather than doubled; a body already
/// ending in `\r\n` is returned unchanged.
pub fn normalize_terminator(content: &str) -> String {
    if content.ends_with(LINE_TERMINATOR) {
        content.to_string()
    } else if let Some(stripped) = content.strip_suffix('\n') {
        format!("{stripped}{LINE_TERMINATOR}")
    } else {
        format!("{content}{LINE_TERMINATOR}")
    }
}
