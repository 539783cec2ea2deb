use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One crawled chapter, as stored on disk by the crawler.
///
/// `chapter_no`, `chapter_title` and `novel` are required; a record missing
/// any of them is corrupt crawl data. `body` may be absent or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub chapter_no: String,
    pub chapter_title: String,
    /// Title of the work the chapter belongs to
    pub novel: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl ChapterRecord {
    /// Read and deserialize a chapter record from a JSON file.
    pub fn load(path: &Path) -> Result<ChapterRecord> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chapter {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Malformed chapter {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<ChapterRecord> {
        serde_json::from_str(contents).with_context(|| "Failed to parse chapter record")
    }

    /// The chapter number left-padded with zeros to four characters, used to
    /// name the chapter's document inside the book.
    pub fn padded_number(&self) -> String {
        format!("{:0>4}", self.chapter_no)
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}
