//! Directory tree copying and relocation.
//!
//! Used by fork-style transitions (copy, keep source) and by the migrator
//! (rename, falling back to copy-then-delete across filesystems). The
//! fallback is not crash-atomic: an interruption can leave a partial copy at
//! the destination while the source is still intact.

use crate::error::{ClaudexError, Result};
use fs_err as fs;
use std::path::Path;
use walkdir::WalkDir;

/// How [`move_dir`] relocated a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Renamed,
    Copied,
}

/// What [`copy_dir_with`] does with a file already present at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingFiles {
    Overwrite,
    Keep,
}

/// Recursively copies `src` into `dst`, creating `dst` and preserving the
/// relative structure. Returns the number of files copied.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    copy_dir_with(src, dst, ExistingFiles::Overwrite)
}

/// [`copy_dir`] with a choice of what happens to files already at `dst`.
/// Kept files are not counted.
pub fn copy_dir_with(src: &Path, dst: &Path, existing: ExistingFiles) -> Result<usize> {
    let context = || format!("copy {} to {}", src.display(), dst.display());
    let mut files = 0;

    fs::create_dir_all(dst).map_err(|e| ClaudexError::io(context(), e))?;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| ClaudexError::io(context(), e.into()))?;
        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| ClaudexError::io(context(), e))?;
        } else if existing == ExistingFiles::Keep && target.symlink_metadata().is_ok() {
            continue;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target).map_err(|e| ClaudexError::io(context(), e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| ClaudexError::io(context(), e))?;
            files += 1;
        }
    }

    Ok(files)
}

/// Moves `src` to `dst`: rename first, then copy and remove the source.
pub fn move_dir(src: &Path, dst: &Path) -> Result<MoveOutcome> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(MoveOutcome::Renamed),
        Err(rename_err) => {
            tracing::debug!(
                error = %rename_err,
                src = %src.display(),
                dst = %dst.display(),
                "Rename failed, falling back to copy"
            );
            copy_dir(src, dst)?;
            fs::remove_dir_all(src)
                .map_err(|e| ClaudexError::io(format!("remove {}", src.display()), e))?;
            Ok(MoveOutcome::Copied)
        }
    }
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    let target = fs::read_link(src)?;
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}
