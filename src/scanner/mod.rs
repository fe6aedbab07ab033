//! Discovery of the audio files a run will process.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::converter;
use crate::error::{Error, Result};
use crate::metadata;

/// Files selected for processing, relative to a common root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    /// Directory every entry of `files` is relative to
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
}

impl ScanPlan {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Extensions eligible for processing.
///
/// Always the tag codec's formats; when converting, only those the converter
/// also accepts as input.
pub fn allowed_extensions(converting: bool) -> Vec<&'static str> {
    metadata::SUPPORTED_EXTENSIONS
        .iter()
        .copied()
        .filter(|ext| !converting || converter::is_supported_target(ext))
        .collect()
}

/// Build the plan for `source`.
///
/// A directory is walked (only its top level unless `recursive`) and filtered
/// by extension, case-insensitively. A single file is taken as-is, with its
/// parent directory as the root.
pub fn plan(source: &Path, recursive: bool, allowed: &[&str]) -> Result<ScanPlan> {
    if !source.exists() {
        return Err(Error::not_found(source));
    }

    if source.is_file() {
        let root = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let name = source
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| Error::config(format!("invalid source {}", source.display())))?;
        return Ok(ScanPlan {
            root,
            files: vec![name],
        });
    }

    Ok(ScanPlan {
        root: source.to_path_buf(),
        files: collect(source, recursive, allowed),
    })
}

/// Walk `root` for files with an allowed extension, returning paths relative
/// to `root`, sorted.
pub fn collect(root: &Path, recursive: bool, allowed: &[&str]) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(true);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| allowed.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "Scan complete");
    files
}
