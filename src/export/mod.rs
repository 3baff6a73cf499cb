// src/export/mod.rs

pub(crate) mod fs_utils;
pub(crate) mod tsv;

use crate::ui::messages::success;
use std::path::Path;

/// Shared completion message for every file written by an export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}
