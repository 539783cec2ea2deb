use super::{arg, ExternalTool, ToolOutcome};
use crate::config::KccConfig;
use anyhow::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Kindle Comic Converter (`kcc-c2e`), which turns a directory of page
/// images into a finished book.
#[derive(Debug, Clone)]
pub struct Kcc {
    tool: ExternalTool,
    /// Target device profile, e.g. "KPW"
    profile: String,
}

impl Kcc {
    pub fn new<P: Into<PathBuf>, S: ToString>(program: P, profile: S) -> Kcc {
        Kcc {
            tool: ExternalTool::new(program),
            profile: profile.to_string(),
        }
    }

    pub fn from_config(config: &KccConfig) -> Kcc {
        Kcc::new(&config.program, &config.profile)
    }

    /// Arguments for converting `input_dir` into `output_dir` under `title`.
    pub fn args(&self, title: &str, output_dir: &Path, input_dir: &Path) -> Vec<OsString> {
        vec![
            OsString::from("-p"),
            OsString::from(&self.profile),
            OsString::from("-t"),
            OsString::from(title),
            OsString::from("-o"),
            arg(output_dir),
            arg(input_dir),
        ]
    }

    pub fn convert(&self, title: &str, output_dir: &Path, input_dir: &Path) -> Result<ToolOutcome> {
        self.tool.run(&self.args(title, output_dir, input_dir))
    }
}

/// Human-readable title from a crawl identifier: underscore-separated
/// segments, each capitalised.
pub fn display_name(id: &str) -> String {
    id.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
