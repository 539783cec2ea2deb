//! EPUB rendering orchestration.
//!
//! Walks a [`BookContainer`]'s spine and turns each entry into a document:
//! cover page, navigation page, then one XHTML document per chapter. Uses the
//! `epub-builder` crate which handles the complex EPUB packaging requirements
//! (OPF manifest, NCX navigation, ZIP structure with proper MIME type).
//!
//! Only chapters carry a title, so the generated NCX navigation lists
//! exactly the chapters while the cover and TOC pages stay in the spine.

mod chapter;
mod cover;
mod toc;

use super::book::{BookContainer, SpineEntry};
use super::styles;
use crate::config::BookConfig;
use anyhow::{anyhow, Context, Result};
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, ZipLibrary};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use uuid::Uuid;

/// File extension of generated containers.
pub const CONTAINER_EXTENSION: &str = "epub";

fn epub_error<E: Display>(what: &'static str) -> impl FnOnce(E) -> anyhow::Error {
    move |e| anyhow!("{what}: {e}")
}

impl BookContainer {
    /// Write the book to `path`, replacing any existing file.
    pub fn write_to_path(&self, book: &BookConfig, path: &Path) -> Result<()> {
        let output_file = File::create(path)
            .with_context(|| format!("Failed to create EPUB file: {}", path.display()))?;
        let mut writer = BufWriter::new(output_file);
        self.generate(book, &mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush EPUB file: {}", path.display()))?;
        Ok(())
    }

    /// Package the book as an EPUB into `writer`.
    pub fn generate<W: Write>(&self, book: &BookConfig, writer: W) -> Result<()> {
        let zip = ZipLibrary::new().map_err(epub_error("Failed to create ZIP library for EPUB"))?;
        let mut builder = EpubBuilder::new(zip).map_err(epub_error("Failed to build builder"))?;

        // set metadata
        builder
            .metadata("title", &self.title)
            .map_err(epub_error("Failed to set title metadata"))?;
        builder
            .metadata("lang", &book.language)
            .map_err(epub_error("Failed to set language metadata"))?;
        builder
            .metadata("generator", &book.generator)
            .map_err(epub_error("Failed to set generator metadata"))?;
        if let Some(author) = book.author_opt() {
            builder
                .metadata("author", author)
                .map_err(epub_error("Failed to set author metadata"))?;
        }
        builder.set_uuid(Uuid::new_v5(
            &Uuid::NAMESPACE_URL,
            self.identifier.as_bytes(),
        ));

        builder
            .stylesheet(styles::generate_stylesheet().as_bytes())
            .map_err(epub_error("Failed to add stylesheet"))?;
        builder
            .add_cover_image(cover::COVER_IMAGE, self.cover_png.as_slice(), "image/png")
            .map_err(epub_error("Failed to add cover image"))?;

        for entry in self.spine() {
            match entry {
                SpineEntry::Cover => {
                    let html = cover::render(self, &book.language);
                    builder
                        .add_content(
                            EpubContent::new("cover.xhtml", html.as_bytes())
                                .reftype(ReferenceType::Cover),
                        )
                        .map_err(epub_error("Failed to add cover page"))?;
                }
                SpineEntry::Navigation => {
                    let html = toc::render(self, &book.language);
                    builder
                        .add_content(
                            EpubContent::new(toc::TOC_PAGE, html.as_bytes())
                                .reftype(ReferenceType::Toc),
                        )
                        .map_err(epub_error("Failed to add table of contents page"))?;
                }
                SpineEntry::Chapter(index) => {
                    let item = self
                        .chapters
                        .get(index)
                        .ok_or_else(|| anyhow!("Spine refers to missing chapter {index}"))?;
                    let html = chapter::render(item, &book.language);
                    builder
                        .add_content(
                            EpubContent::new(&item.file_name, html.as_bytes())
                                .title(&item.title)
                                .reftype(ReferenceType::Text),
                        )
                        .map_err(|e| {
                            anyhow!("Failed to add chapter {} to EPUB: {e}", item.file_name)
                        })?;
                }
            }
        }

        builder
            .generate(writer)
            .map_err(epub_error("Failed to generate EPUB file"))?;
        Ok(())
    }
}
