mod chapter;
pub use chapter::*;

mod volume;
pub use volume::*;

mod ordering;
pub use ordering::*;

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// A crawled novel on disk: one directory per volume, one file per chapter
#[derive(Debug)]
pub struct NovelSource {
    /// Identifier of the work, taken from the input directory's name
    pub work_id: String,
    /// Volume directories in reading order
    pub volume_dirs: Vec<PathBuf>,
}

impl NovelSource {
    pub fn open(root: &Path) -> Result<NovelSource> {
        if !root.is_dir() {
            return Err(anyhow!("Input path {} isn't a directory!", root.display()));
        }

        let work_id = work_id_of(root)?;
        let volume_dirs = list_sorted(root, EntryKind::Directory)?;

        Ok(NovelSource {
            work_id,
            volume_dirs,
        })
    }
}

/// Derive a work identifier from the base name of an input directory.
///
/// The name is taken from the path as given, so a symlinked input keeps the
/// link's name. Paths without a final name, like `.` or `..`, are resolved
/// first.
pub fn work_id_of(root: &Path) -> Result<String> {
    if let Some(name) = root.file_name() {
        return Ok(name.to_string_lossy().to_string());
    }

    let canonical = std::fs::canonicalize(root)
        .map_err(|e| anyhow!("Failed to canonicalize {}: {e:#}", root.display()))?;
    match canonical.file_name() {
        Some(name) => Ok(name.to_string_lossy().to_string()),
        None => Err(anyhow!(
            "Input directory {} doesn't have a name?",
            canonical.display()
        )),
    }
}
