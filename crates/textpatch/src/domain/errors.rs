//! Domain-specific errors.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures a single patch operation can surface.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("file not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8 (first invalid byte at offset {offset})", path.display())]
    Encoding { path: PathBuf, offset: usize },
    #[error("needle not found in {}", path.display())]
    NoMatch { path: PathBuf },
    #[error("needle must not be empty")]
    EmptyNeedle,
    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PatchError {
    /// Classify an I/O failure on `path` into the patch error taxonomy.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => PatchError::NotFound { path, source },
            io::ErrorKind::PermissionDenied => PatchError::PermissionDenied { path, source },
            _ => PatchError::Io { path, source },
        }
    }
}
