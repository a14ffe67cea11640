//! Error types surfaced by scanning and file actions

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReviewError>;

#[derive(Debug, Error)]
pub enum ReviewError {
    /// The source directory (or a file in it) could not be read
    #[error("cannot access {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Sending a file to the trash failed; the file stays in the queue
    #[error("cannot delete '{}': {reason}", file_label(path))]
    Delete { path: PathBuf, reason: String },

    /// A file with the same name already exists in the destination folder
    #[error("'{}' already exists in the destination folder", file_label(path))]
    MoveConflict { path: PathBuf },

    /// Relocating a file failed for a reason other than a name collision
    #[error("cannot move '{}': {reason}", file_label(path))]
    Move { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ReviewError {
    pub fn access(path: &Path, source: io::Error) -> Self {
        ReviewError::Access {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ReviewError::Access { path, .. }
            | ReviewError::Delete { path, .. }
            | ReviewError::MoveConflict { path }
            | ReviewError::Move { path, .. } => Some(path),
            ReviewError::Config(_) => None,
        }
    }
}

/// Reason text for I/O failures on a file the user is acting on
pub(crate) fn describe_io_error(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "file not found".to_string(),
        io::ErrorKind::PermissionDenied => {
            "permission denied (the file may be open in another program)".to_string()
        }
        _ => err.to_string(),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
