//! Scoped temporary files.

use std::path::{Path, PathBuf};

/// A file deleted when the guard is dropped, unless released.
///
/// Guards are created before the file is written, so a future dropped at any
/// await point (Ctrl-C) still cleans up after itself.
#[derive(Debug)]
pub struct TempFile {
    path: Option<PathBuf>,
}

impl TempFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Stop owning the file; it will not be deleted.
    pub fn release(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take()
            && let Err(e) = std::fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::debug!(path = %path.display(), error = %e, "Temporary file cleanup failed");
        }
    }
}
