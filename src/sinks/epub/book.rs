use crate::source::ChapterRecord;
use derive_builder::Builder;

/// One chapter document inside a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Document name inside the container, e.g. `chap_0001.xhtml`
    pub file_name: String,
    pub title: String,
    /// Chapter markup as crawled; normalised to XHTML when rendered
    pub body: String,
}

impl From<&ChapterRecord> for ContentItem {
    fn from(chapter: &ChapterRecord) -> Self {
        ContentItem {
            file_name: format!("chap_{}.xhtml", chapter.padded_number()),
            title: chapter.chapter_title.clone(),
            body: chapter.body().to_string(),
        }
    }
}

impl From<ChapterRecord> for ContentItem {
    fn from(chapter: ChapterRecord) -> Self {
        ContentItem::from(&chapter)
    }
}

/// A position in the book's reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpineEntry {
    Cover,
    Navigation,
    /// Index into [`BookContainer::chapters`]
    Chapter(usize),
}

/// Everything needed to write one volume as an EPUB.
#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct BookContainer {
    /// Stable identifier, the work id followed by the volume directory name
    pub identifier: String,
    pub title: String,
    /// PNG-encoded cover image
    pub cover_png: Vec<u8>,
    #[builder(setter(each(name = "chapter", into)), default)]
    pub chapters: Vec<ContentItem>,
}

impl BookContainer {
    /// Reading order: cover, navigation, then every chapter in order.
    pub fn spine(&self) -> Vec<SpineEntry> {
        let mut spine = vec![SpineEntry::Cover, SpineEntry::Navigation];
        spine.extend((0..self.chapters.len()).map(SpineEntry::Chapter));
        spine
    }

    /// Table of contents entries; always the chapters, in spine order.
    pub fn toc(&self) -> &[ContentItem] {
        &self.chapters
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(no: &str, title: &str, body: Option<&str>) -> ChapterRecord {
        ChapterRecord {
            chapter_no: no.to_string(),
            chapter_title: title.to_string(),
            novel: "Novel X".to_string(),
            body: body.map(ToString::to_string),
        }
    }

    #[test]
    fn content_items_are_named_by_padded_chapter_number() {
        let item = ContentItem::from(record("12", "Twelve", Some("<p>12</p>")));
        assert_eq!(item.file_name, "chap_0012.xhtml");
        assert_eq!(item.title, "Twelve");
        assert_eq!(item.body, "<p>12</p>");

        let item = ContentItem::from(record("3", "Three", None));
        assert_eq!(item.body, "");
    }

    #[test]
    fn can_build_container_with_builder_pattern() {
        let book = BookContainerBuilder::default()
            .identifier("novel_x01")
            .title("Novel X Volume 01")
            .cover_png(vec![1u8, 2, 3])
            .chapter(record("1", "One", None))
            .chapter(record("2", "Two", None))
            .build()
            .expect("can build container");

        assert_eq!(book.identifier, "novel_x01");
        assert_eq!(
            book.spine(),
            vec![
                SpineEntry::Cover,
                SpineEntry::Navigation,
                SpineEntry::Chapter(0),
                SpineEntry::Chapter(1)
            ]
        );
        let titles: Vec<&str> = book.toc().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn empty_container_spine_is_cover_and_navigation() {
        let book = BookContainerBuilder::default()
            .identifier("x01")
            .title("X Volume 01")
            .cover_png(Vec::<u8>::new())
            .build()
            .expect("can build empty container");
        assert!(book.toc().is_empty());
        assert_eq!(book.spine(), vec![SpineEntry::Cover, SpineEntry::Navigation]);
    }

    #[test]
    fn missing_fields_fail_to_build() {
        assert!(BookContainerBuilder::default().title("T").build().is_err());
    }
}
