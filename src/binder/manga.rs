//! Binding crawled manga.
//!
//! Manga chapters are already page images, so there is nothing to assemble:
//! the crawl directory goes straight to kcc, which builds the book itself.

use crate::config::Configuration;
use crate::source::work_id_of;
use crate::tools::{display_name, Kcc, ToolOutcome};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// What a manga binding run produced.
#[derive(Debug)]
pub struct MangaReport {
    pub title: String,
    pub output_dir: PathBuf,
    pub outcome: ToolOutcome,
}

/// Convert the manga in `input` into `<output_root>/<manga_id>/`.
pub fn bind(input: &Path, config: &Configuration) -> Result<MangaReport> {
    if !input.is_dir() {
        return Err(anyhow!("Input path {} isn't a directory!", input.display()));
    }

    let manga_id = work_id_of(input)?;
    let title = display_name(&manga_id);
    let output_dir = config.work_output_dir(&manga_id);

    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!("Failed to create output directory {}", output_dir.display())
    })?;

    log::info!("Binding {title} into {}", output_dir.display());
    let outcome = Kcc::from_config(&config.kcc)
        .convert(&title, &output_dir, input)
        .with_context(|| format!("Failed to run kcc for {}", input.display()))?;

    Ok(MangaReport {
        title,
        output_dir,
        outcome,
    })
}
