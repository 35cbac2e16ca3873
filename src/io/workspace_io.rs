use std::fs;
use std::path::{Path, PathBuf};

use crate::model::workspace::Workspace;

/// Error type for workspace file I/O
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize workspace: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Load a workspace file. A missing file yields an empty workspace so a new
/// one can be started in place.
pub fn load_workspace(path: &Path) -> Result<Workspace, WorkspaceError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "workspace file missing, starting empty");
        return Ok(Workspace::default());
    }
    let text = fs::read_to_string(path).map_err(|e| WorkspaceError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| WorkspaceError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the workspace as pretty JSON.
pub fn save_workspace(path: &Path, workspace: &Workspace) -> Result<(), WorkspaceError> {
    let content = serde_json::to_string_pretty(workspace)?;
    fs::write(path, content + "\n").map_err(|e| WorkspaceError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
