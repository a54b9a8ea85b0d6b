//! Local artifact written after a successful quotation.
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use quote_common::Result;

/// Text stored in the report file for `bid`.
pub fn format_bid_line(bid: &str) -> String {
    format!("Dólar: {}", bid)
}

/// Creates (or truncates) `path`, writes the bid line and returns the file size in bytes.
/// Missing parent directories are created.
pub fn write_bid_file(path: &Path, bid: &str) -> Result<u64> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut file = File::create(path)?;
    file.write_all(format_bid_line(bid).as_bytes())?;
    Ok(file.metadata()?.len())
}
