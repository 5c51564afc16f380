//! Raw file access for eHYD exports.
//!
//! eHYD writes its CSV exports in the Windows-1252 code page (German
//! umlauts, `Lücke`). Files are decoded once and handed on as lines.

use crate::error::{EhydError, Result};
use encoding_rs::WINDOWS_1252;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Read a file and decode it into lines
pub fn read_decoded_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(EhydError::Io)?;
    let lines = decode_lines(&bytes);

    if lines.is_empty() {
        return Err(EhydError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    debug!("Decoded {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Decode Windows-1252 bytes and split into lines without terminators
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
    if had_errors {
        warn!("Input contained bytes outside Windows-1252; replaced with U+FFFD");
    }
    text.lines().map(str::to_string).collect()
}
