use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Section;
use crate::ops::snapshot;

/// Error type for reading the authoritative snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not read snapshot {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse snapshot {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read the snapshot file and transform it into sections for `load`
pub fn read_snapshot(path: &Path) -> Result<Vec<Section>, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|e| SnapshotError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let snap = snapshot::parse(&text).map_err(|e| SnapshotError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(snapshot::to_sections(&snap))
}
