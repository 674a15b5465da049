//! Merging cached extraction results into one snapshot file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{MergeError, Result};
use crate::models::record::SnapshotEntry;

/// File name of the merged snapshot inside the output directory.
pub const MERGED_SNAPSHOT_FILENAME: &str = "merged_responses.json";

/// Merge every cached result in `output_dir` into one ordered snapshot.
///
/// The previous snapshot file is deleted first and the new one is
/// rebuilt from scratch, so merging is idempotent and never
/// accumulates entries across runs. Entries are ordered by result
/// file name. A single unreadable or corrupt result file fails the
/// whole merge; there is no partial recovery.
pub fn merge(output_dir: &Path) -> Result<Vec<SnapshotEntry>> {
    let snapshot_path = output_dir.join(MERGED_SNAPSHOT_FILENAME);
    if snapshot_path.exists() {
        debug!(path = %snapshot_path.display(), "Deleting old merged snapshot");
        fs::remove_file(&snapshot_path).map_err(|source| MergeError::WriteSnapshot {
            path: snapshot_path.clone(),
            source,
        })?;
    }

    let mut entries = Vec::new();
    for path in list_result_files(output_dir)? {
        let content = fs::read_to_string(&path).map_err(|source| MergeError::ReadEntry {
            path: path.clone(),
            source,
        })?;
        let entry: SnapshotEntry =
            serde_json::from_str(&content).map_err(|source| MergeError::ParseEntry {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "Loaded cached result");
        entries.push(entry);
    }

    let json = serde_json::to_string_pretty(&entries)?;
    fs::write(&snapshot_path, json).map_err(|source| MergeError::WriteSnapshot {
        path: snapshot_path.clone(),
        source,
    })?;
    info!(count = entries.len(), path = %snapshot_path.display(), "Merged snapshot written");
    Ok(entries)
}

/// Cached result files in `output_dir`, sorted by file name. The
/// merged snapshot itself is never treated as a result file.
fn list_result_files(output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(output_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) == Some(MERGED_SNAPSHOT_FILENAME) {
            continue;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext.eq_ignore_ascii_case("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
