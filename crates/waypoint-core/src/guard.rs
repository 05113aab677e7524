//! Data-lineage guard for deprecated "combined" files.
//!
//! Combined files merged several periods into one synthetic dataset and break
//! period-aware steps downstream. They must never be registered again, and an
//! old manifest that still points at one must not resolve.

use std::path::Path;

use crate::error::{Error, Result};

/// Filename suffixes that are rejected. The generic `_combined.csv` catches
/// anything the named legacy files don't.
pub const FORBIDDEN_FILE_SUFFIXES: &[&str] = &[
    "complete_spu_sales_2025Q2_combined.csv",
    "complete_category_sales_2025Q2_combined.csv",
    "store_config_2025Q2_combined.csv",
    "store_sales_2025Q2_combined.csv",
    "_combined.csv",
];

/// Whether `path`'s filename ends with one of the forbidden suffixes.
pub fn is_forbidden(path: &str) -> bool {
    let name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);
    FORBIDDEN_FILE_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

pub fn ensure_allowed(path: &str) -> Result<()> {
    if is_forbidden(path) {
        return Err(Error::ForbiddenPath {
            path: path.to_string(),
        });
    }
    Ok(())
}
