use super::{arg, ExternalTool, ToolOutcome};
use crate::config::KindlegenConfig;
use crate::sinks::epub::CONTAINER_EXTENSION;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Converts EPUB containers into Kindle books with kindlegen.
#[derive(Debug, Clone)]
pub struct Kindlegen {
    tool: ExternalTool,
}

/// Per-file results of converting a directory.
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub conversions: Vec<(PathBuf, ToolOutcome)>,
}

impl ConversionReport {
    pub fn succeeded(&self) -> usize {
        self.conversions.iter().filter(|(_, o)| o.success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &(PathBuf, ToolOutcome)> {
        self.conversions.iter().filter(|(_, o)| !o.success())
    }
}

impl Kindlegen {
    pub fn new<P: Into<PathBuf>>(program: P) -> Kindlegen {
        Kindlegen {
            tool: ExternalTool::new(program),
        }
    }

    pub fn from_config(config: &KindlegenConfig) -> Kindlegen {
        Kindlegen::new(&config.program)
    }

    /// Convert every container in `dir`, one program run per file, in name
    /// order. The converted book lands next to its source.
    ///
    /// A conversion that fails is recorded and the next file is still
    /// converted; only being unable to list `dir` or start the program is an
    /// error.
    pub fn convert_directory(&self, dir: &Path) -> Result<ConversionReport> {
        let mut report = ConversionReport::default();
        for container in containers_in(dir)? {
            log::info!("Converting: {}", container.display());
            let outcome = self.tool.run(&[arg(&container)])?;
            report.conversions.push((container, outcome));
        }
        Ok(report)
    }
}

/// Container files directly inside `dir`, sorted by name.
///
/// The extension match is case-sensitive; anything else is ignored.
pub fn containers_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let listing = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory {}", dir.display()))?;

    let mut containers = Vec::default();
    for entry in listing {
        let entry =
            entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        let is_container = path.extension().and_then(|e| e.to_str()) == Some(CONTAINER_EXTENSION);
        if is_container && path.is_file() {
            containers.push(path);
        }
    }
    containers.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(containers)
}
