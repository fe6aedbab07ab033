//! Placement of processed files.
//!
//! Decides where a tagged file ends up and moves it there.
//!
//! # Features
//! - Output under a destination root or back next to the source
//! - Source directory hierarchy reproduced unless flattening
//! - Optional `Artist - Title` renaming from the resolved metadata
//! - Collision handling: overwrite, or a ` - N` suffix until the name is free

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::{Error, Result, ResultExt};
use crate::model::Song;

/// Compute where the processed copy of `relative` should go, before
/// collision handling.
///
/// `working` is the processed file: its extension wins over the original's,
/// since conversion may have changed it.
pub fn destination(
    config: &OutputConfig,
    source_root: &Path,
    relative: &Path,
    working: &Path,
    song: &Song,
) -> PathBuf {
    let extension = working
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let stem = match (config.rename, song.artist(), song.title()) {
        (true, Some(artist), Some(title)) => format!("{artist} - {title}"),
        _ => relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let mut dir = config
        .destination
        .clone()
        .unwrap_or_else(|| source_root.to_path_buf());
    if !config.flatten
        && let Some(parent) = relative.parent()
    {
        dir.push(parent);
    }

    dir.join(file_name(&sanitize_filename(&stem), &extension))
}

/// Pick a free path based on `path`.
///
/// With `overwrite` the path is used as-is; otherwise ` - 1`, ` - 2`, ...
/// is appended to the stem until nothing exists there.
pub fn unique_path(path: &Path, overwrite: bool) -> PathBuf {
    if overwrite || !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    (1u32..)
        .map(|i| dir.join(file_name(&format!("{stem} - {i}"), &extension)))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Move the processed file to its final location, returning that location.
pub fn place(
    config: &OutputConfig,
    source_root: &Path,
    relative: &Path,
    song: &Song,
) -> Result<PathBuf> {
    let target = destination(config, source_root, relative, song.path(), song);
    let target = unique_path(&target, config.overwrite);
    move_file(song.path(), &target)?;
    tracing::info!(from = %relative.display(), to = %target.display(), "File placed");
    Ok(target)
}

/// Move a file, creating parent directories as needed.
///
/// Falls back to copy + delete when a plain rename is impossible, such as
/// across filesystems.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(format!("creating directory {}", parent.display()))?;
    }

    if let Err(e) = fs::rename(from, to) {
        tracing::debug!(error = %e, "Rename failed, copying instead");
        fs::copy(from, to).map_err(|e| {
            Error::organization(format!("failed to copy file to {}: {e}", to.display()))
        })?;
        fs::remove_file(from)
            .with_context(format!("removing source file {}", from.display()))?;
    }
    Ok(())
}

fn file_name(stem: &str, extension: &str) -> String {
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{extension}")
    }
}

/// Sanitizes a filename: path separators become `-`, other characters that
/// are invalid on common filesystems become `_`.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
