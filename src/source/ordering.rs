//! Explicit ordering of crawled directory entries.
//!
//! Volumes and chapters are read in the order their names describe, never in
//! whatever order the filesystem happens to enumerate them. Crawlers name
//! volume directories `01`, `02`, ... and chapter files `0001.json`, ...,
//! but padding is not always consistent (`9` next to `10`), so names whose
//! stem is a plain unsigned integer are compared numerically.
//!
//! Ordering rules:
//! 1. Numeric stems first, ascending by value (ties broken by full name)
//! 2. Everything else afterwards, sorted by name

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Which kind of entry a listing should keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Only directories (volumes inside a work directory)
    Directory,
    /// Only regular files (chapters inside a volume directory)
    File,
}

/// Sort key computed from an entry's file name.
#[derive(Debug, PartialEq, Eq)]
enum SortKey<'a> {
    Numeric(u64, &'a str),
    Name(&'a str),
}

impl<'a> SortKey<'a> {
    fn of(name: &'a str) -> SortKey<'a> {
        let stem = match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        };

        if !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = stem.parse::<u64>() {
                return SortKey::Numeric(n, name);
            }
        }
        SortKey::Name(name)
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Numeric(a, an), SortKey::Numeric(b, bn)) => a.cmp(b).then_with(|| an.cmp(bn)),
            (SortKey::Numeric(..), SortKey::Name(_)) => Ordering::Less,
            (SortKey::Name(_), SortKey::Numeric(..)) => Ordering::Greater,
            (SortKey::Name(a), SortKey::Name(b)) => a.cmp(b),
        }
    }
}

/// Compare two entry names by their computed sort keys.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    SortKey::of(a).cmp(&SortKey::of(b))
}

/// Sort paths in place by the sort key of their final component.
pub fn sort_entries(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| compare_names(&file_name_of(a), &file_name_of(b)));
}

/// List the entries of `dir` of the given kind, skipping hidden entries, in
/// explicit sort order.
pub fn list_sorted(dir: &Path, kind: EntryKind) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::default();
    let listing = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory {}", dir.display()))?;

    for entry in listing {
        let entry =
            entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();

        if file_name_of(&path).starts_with('.') {
            log::debug!("Skipping hidden entry {}", path.display());
            continue;
        }

        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        let keep = match kind {
            EntryKind::Directory => file_type.is_dir(),
            EntryKind::File => file_type.is_file(),
        };
        if keep {
            entries.push(path);
        } else {
            log::debug!("Skipping {}", path.display());
        }
    }

    sort_entries(&mut entries);
    Ok(entries)
}

/// The final path component as a string, or empty if there is none.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
