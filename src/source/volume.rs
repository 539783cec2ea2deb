use super::chapter::ChapterRecord;
use super::ordering::{file_name_of, list_sorted, EntryKind};
use anyhow::Result;
use std::path::Path;

/// Chapters gathered from one volume directory, in reading order.
#[derive(Debug, Clone, Default)]
pub struct VolumeDraft {
    /// Name of the volume directory, used verbatim in identifiers and file names
    pub volume_no: String,
    pub chapters: Vec<ChapterRecord>,
    /// Work title taken from the first chapter that supplies one
    title: Option<String>,
}

impl VolumeDraft {
    pub fn new<S: ToString>(volume_no: S) -> VolumeDraft {
        VolumeDraft {
            volume_no: volume_no.to_string(),
            chapters: Vec::default(),
            title: None,
        }
    }

    /// Read every chapter file in `dir`, in explicit sort order.
    ///
    /// Any unreadable or malformed chapter aborts the whole volume.
    pub fn load(dir: &Path) -> Result<VolumeDraft> {
        let mut draft = VolumeDraft::new(file_name_of(dir));
        for path in list_sorted(dir, EntryKind::File)? {
            log::debug!("Reading chapter {}", path.display());
            draft.push(ChapterRecord::load(&path)?);
        }
        Ok(draft)
    }

    /// Append a chapter. The first non-empty work title seen sticks; later
    /// chapters never overwrite it.
    pub fn push(&mut self, chapter: ChapterRecord) -> &mut Self {
        if self.title.is_none() && !chapter.novel.is_empty() {
            self.title = Some(chapter.novel.clone());
        }
        self.chapters.push(chapter);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The volume number left-padded with zeros to two characters.
    pub fn display_number(&self) -> String {
        format!("{:0>2}", self.volume_no)
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}
