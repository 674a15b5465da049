//! Source-folder scanning for invoice photographs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Recognized image extensions, matched case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// List invoice photographs in `dir`, sorted by file name.
///
/// Sorting makes processing and merge order deterministic; raw
/// directory-listing order varies across platforms and filesystems.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            images.push(path);
        } else {
            debug!(path = %path.display(), "Skipping non-image file");
        }
    }
    images.sort();
    Ok(images)
}
