//! Presence-based per-image result cache.
//!
//! Identity is the image file name: a correspondingly named JSON file
//! in the output directory is the sole cache signal. There is no
//! content hash and no TTL; an operator deletes the file to force
//! reprocessing. Extraction calls are paid, so skip-if-present is the
//! chosen policy even though stale results are never refreshed.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::record::SnapshotEntry;

/// Path of the cached result file for `image` inside `output_dir`.
///
/// Same base name as the image, `.json` extension.
pub fn result_path(output_dir: &Path, image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    output_dir.join(format!("{stem}.json"))
}

/// Whether `image` still needs an extraction call.
///
/// Returns false iff a cached result file already exists, regardless
/// of its content. Pure check, no side effects.
pub fn should_process(output_dir: &Path, image: &Path) -> bool {
    !result_path(output_dir, image).exists()
}

/// Persist one extraction result as a pretty-printed cache file.
pub fn store(path: &Path, entry: &SnapshotEntry) -> Result<()> {
    let json = serde_json::to_string_pretty(entry)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_result_path_swaps_extension() {
        let path = result_path(Path::new("/out"), Path::new("/photos/factura01.jpeg"));
        assert_eq!(path, PathBuf::from("/out/factura01.json"));
    }

    #[test]
    fn test_should_process_when_no_result_exists() {
        let dir = tempfile::tempdir().unwrap();
        assert!(should_process(dir.path(), Path::new("foto.jpg")));
    }

    #[test]
    fn test_skips_when_result_exists_regardless_of_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("foto.json"), "garbage").unwrap();
        assert!(!should_process(dir.path(), Path::new("foto.jpg")));
    }

    #[test]
    fn test_store_writes_parseable_result() {
        let dir = tempfile::tempdir().unwrap();
        let entry: SnapshotEntry =
            serde_json::from_str(r#"{"Monto":"100"}"#).unwrap();
        let path = result_path(dir.path(), Path::new("foto.jpg"));

        store(&path, &entry).unwrap();

        let reloaded: SnapshotEntry =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, entry);
    }
}
