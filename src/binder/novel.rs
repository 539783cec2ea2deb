//! Binding crawled novels into per-volume books.
//!
//! A crawled novel is laid out as `<work_id>/<volume>/<chapter>.json`. Every
//! volume directory becomes one EPUB at
//! `<output_root>/<work_id>/<work_id>_v<volume>.epub` with a generated cover,
//! and the finished directory is then handed to kindlegen.
//!
//! Any unreadable directory, malformed chapter or write failure aborts the
//! run. Volumes already written stay on disk.

use crate::config::Configuration;
use crate::sinks::cover_art::CoverRenderer;
use crate::sinks::epub::{BookContainer, BookContainerBuilder, ContentItem, CONTAINER_EXTENSION};
use crate::source::{NovelSource, VolumeDraft};
use crate::tools::{ConversionReport, Kindlegen};
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::path::{Path, PathBuf};

/// What a novel binding run produced.
#[derive(Debug)]
pub struct NovelReport {
    pub work_id: String,
    pub output_dir: PathBuf,
    /// Written containers, in volume order
    pub books: Vec<PathBuf>,
    /// Set when the kindlegen conversion ran
    pub conversion: Option<ConversionReport>,
}

/// Bind every volume of the novel in `input`, then convert the results
/// unless `convert` is false or kindlegen is disabled in `config`.
pub fn bind(
    input: &Path,
    config: &Configuration,
    convert: bool,
    progress: &ProgressBar,
) -> Result<NovelReport> {
    let renderer = CoverRenderer::new(&config.cover.font)?;
    let mut rng = cover_rng(config.cover.seed);

    let mut report = assemble(input, config, &renderer, rng.as_mut(), progress)?;

    if !(convert && config.kindlegen.enabled) {
        log::info!("Skipping kindlegen conversion");
    } else if report.books.is_empty() {
        log::warn!("No volumes found in {}, nothing to convert", input.display());
    } else {
        progress.set_message("Converting...");
        let kindlegen = Kindlegen::from_config(&config.kindlegen);
        report.conversion = Some(
            kindlegen
                .convert_directory(&report.output_dir)
                .with_context(|| "Failed to convert books with kindlegen")?,
        );
    }

    Ok(report)
}

/// Write one container per volume directory of `input`.
pub fn assemble(
    input: &Path,
    config: &Configuration,
    renderer: &CoverRenderer,
    rng: &mut dyn RngCore,
    progress: &ProgressBar,
) -> Result<NovelReport> {
    let novel = NovelSource::open(input)?;
    let output_dir = config.work_output_dir(&novel.work_id);

    progress.set_length(novel.volume_dirs.len() as u64);
    progress.set_message(format!("Binding {}...", novel.work_id));

    let mut books = Vec::with_capacity(novel.volume_dirs.len());
    for volume_dir in &novel.volume_dirs {
        log::info!("Processing: {}", volume_dir.display());
        let draft = VolumeDraft::load(volume_dir)?;
        if draft.is_empty() {
            log::warn!("Volume {} has no chapters", draft.volume_no);
        }
        let book = assemble_volume(&novel.work_id, &draft, renderer, rng)?;

        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory {}", output_dir.display())
        })?;
        let path = output_dir.join(format!(
            "{}_v{}.{}",
            novel.work_id, draft.volume_no, CONTAINER_EXTENSION
        ));
        log::info!("Creating: {}", path.display());
        book.write_to_path(&config.book, &path)?;

        books.push(path);
        progress.inc(1);
    }

    Ok(NovelReport {
        work_id: novel.work_id,
        output_dir,
        books,
        conversion: None,
    })
}

/// Build the container for one volume.
///
/// A volume where no chapter names the work is titled after `work_id`.
pub fn assemble_volume(
    work_id: &str,
    draft: &VolumeDraft,
    renderer: &CoverRenderer,
    rng: &mut dyn RngCore,
) -> Result<BookContainer> {
    let work_title = match draft.title() {
        Some(title) => title,
        None => {
            log::warn!(
                "No chapter in volume {} names the work, using {work_id}",
                draft.volume_no
            );
            work_id
        }
    };
    let volume = draft.display_number();

    let cover_png = renderer
        .render(work_title, &volume, rng)
        .with_context(|| format!("Failed to render cover for volume {volume}"))?;

    BookContainerBuilder::default()
        .identifier(format!("{work_id}{}", draft.volume_no))
        .title(format!("{work_title} Volume {volume}"))
        .cover_png(cover_png)
        .chapters(
            draft
                .chapters
                .iter()
                .map(ContentItem::from)
                .collect::<Vec<ContentItem>>(),
        )
        .build()
        .with_context(|| format!("Failed to build book for volume {volume}"))
}

/// Random source for cover backgrounds: seeded when configured, otherwise
/// fresh every run.
fn cover_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_entropy()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sinks::cover_art::BUNDLED;
    use crate::sinks::epub::SpineEntry;
    use crate::source::ChapterRecord;

    fn write_chapter(dir: &Path, file: &str, no: &str, title: &str, novel: &str, body: &str) {
        std::fs::create_dir_all(dir).expect("can create volume dir");
        let record = ChapterRecord {
            chapter_no: no.to_string(),
            chapter_title: title.to_string(),
            novel: novel.to_string(),
            body: Some(body.to_string()),
        };
        let json = serde_json::to_string(&record).expect("can serialize chapter");
        std::fs::write(dir.join(file), json).expect("can write chapter");
    }

    fn config_in(root: &Path) -> Configuration {
        let mut config = Configuration {
            output_root: root.join("_book"),
            ..Configuration::default()
        };
        config.kindlegen.enabled = false;
        config.cover.seed = Some(11);
        config
    }

    fn renderer() -> CoverRenderer {
        CoverRenderer::new(BUNDLED).expect("can create renderer")
    }

    #[test]
    fn single_chapter_novel_binds_to_one_volume() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let input = dir.path().join("novel_x");
        std::fs::create_dir_all(input.join("01")).expect("can create volume dir");
        std::fs::write(
            input.join("01").join("0001.json"),
            r#"{"chapter_no":"1","chapter_title":"Beginnings","novel":"Novel X","body":"<p>Text</p>"}"#,
        )
        .expect("can write chapter");

        let config = config_in(dir.path());
        let report = bind(&input, &config, true, &ProgressBar::hidden()).expect("can bind novel");

        let expected = dir.path().join("_book").join("novel_x").join("novel_x_v01.epub");
        assert_eq!(report.work_id, "novel_x");
        assert_eq!(report.books, vec![expected.clone()]);
        assert!(expected.is_file());
        assert!(report.conversion.is_none());

        let draft = VolumeDraft::load(&input.join("01")).expect("can load volume");
        let book = assemble_volume("novel_x", &draft, &renderer(), &mut StdRng::seed_from_u64(1))
            .expect("can assemble volume");
        assert_eq!(book.title, "Novel X Volume 01");
        assert_eq!(book.identifier, "novel_x01");
        assert_eq!(book.toc().len(), 1);
        assert_eq!(book.toc()[0].title, "Beginnings");
        assert_eq!(book.toc()[0].body, "<p>Text</p>");
        assert_eq!(book.toc()[0].file_name, "chap_0001.xhtml");
        assert!(book.cover_png.starts_with(b"\x89PNG"));
    }

    #[test]
    fn chapter_count_and_order_follow_the_directory() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let vol = dir.path().join("work").join("2");
        for (file, no) in [("0003.json", "3"), ("0001.json", "1"), ("0002.json", "2")] {
            write_chapter(&vol, file, no, &format!("Chapter {no}"), "", "");
        }
        write_chapter(&vol, "0004.json", "4", "Chapter 4", "Late Title", "");

        let draft = VolumeDraft::load(&vol).expect("can load volume");
        let book = assemble_volume("work", &draft, &renderer(), &mut StdRng::seed_from_u64(2))
            .expect("can assemble volume");

        let titles: Vec<&str> = book.toc().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Chapter 1", "Chapter 2", "Chapter 3", "Chapter 4"]);
        assert_eq!(book.title, "Late Title Volume 02");

        let spine = book.spine();
        assert_eq!(spine.len(), 2 + 4);
        assert_eq!(&spine[..2], &[SpineEntry::Cover, SpineEntry::Navigation]);
        for (i, entry) in spine[2..].iter().enumerate() {
            assert_eq!(*entry, SpineEntry::Chapter(i));
        }
    }

    #[test]
    fn empty_volume_falls_back_to_work_id() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let input = dir.path().join("lonely_work");
        std::fs::create_dir_all(input.join("1")).expect("can create empty volume");

        let draft = VolumeDraft::load(&input.join("1")).expect("can load empty volume");
        let book = assemble_volume("lonely_work", &draft, &renderer(), &mut StdRng::seed_from_u64(3))
            .expect("empty volume still assembles");
        assert_eq!(book.title, "lonely_work Volume 01");
        assert!(book.toc().is_empty());
        assert_eq!(book.spine(), vec![SpineEntry::Cover, SpineEntry::Navigation]);

        let config = config_in(dir.path());
        let report = bind(&input, &config, false, &ProgressBar::hidden()).expect("can bind");
        assert_eq!(
            report.books,
            vec![dir.path().join("_book").join("lonely_work").join("lonely_work_v1.epub")]
        );
    }

    #[test]
    fn rebinding_keeps_structure_and_overwrites() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let vol = dir.path().join("novel").join("01");
        write_chapter(&vol, "0001.json", "1", "One", "Novel", "<p>1</p>");
        write_chapter(&vol, "0002.json", "2", "Two", "Novel", "<p>2</p>");

        let draft = VolumeDraft::load(&vol).expect("can load volume");
        let a = assemble_volume("novel", &draft, &renderer(), &mut StdRng::seed_from_u64(4))
            .expect("can assemble volume");
        let b = assemble_volume("novel", &draft, &renderer(), &mut StdRng::seed_from_u64(5))
            .expect("can assemble volume");
        assert_eq!(a.title, b.title);
        assert_eq!(a.spine(), b.spine());
        assert_eq!(a.toc(), b.toc());

        let config = config_in(dir.path());
        let input = dir.path().join("novel");
        let first = bind(&input, &config, false, &ProgressBar::hidden()).expect("can bind");
        let second = bind(&input, &config, false, &ProgressBar::hidden()).expect("can rebind");
        assert_eq!(first.books, second.books);
        assert!(second.books[0].is_file());
    }

    #[test]
    fn malformed_chapter_aborts_but_keeps_earlier_volumes() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let input = dir.path().join("broken");
        write_chapter(&input.join("1"), "0001.json", "1", "Fine", "Broken", "");
        std::fs::create_dir_all(input.join("2")).expect("can create volume dir");
        std::fs::write(
            input.join("2").join("0001.json"),
            r#"{"chapter_title":"No number","novel":"Broken"}"#,
        )
        .expect("can write chapter");

        let config = config_in(dir.path());
        let err = bind(&input, &config, false, &ProgressBar::hidden())
            .expect_err("malformed chapter is fatal");
        assert!(format!("{err:#}").contains("0001.json"));

        let out = dir.path().join("_book").join("broken");
        assert!(out.join("broken_v1.epub").is_file());
        assert!(!out.join("broken_v2.epub").exists());
    }

    #[cfg(unix)]
    #[test]
    fn finished_books_are_handed_to_kindlegen() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("can create temp dir");
        let input = dir.path().join("novel_k");
        write_chapter(&input.join("01"), "0001.json", "1", "One", "K", "");
        write_chapter(&input.join("02"), "0001.json", "2", "Two", "K", "");

        let script = dir.path().join("fake-kindlegen");
        std::fs::write(&script, "#!/bin/sh\ntouch \"${1%.epub}.mobi\"\n")
            .expect("can write script");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("can make script executable");

        let mut config = config_in(dir.path());
        config.kindlegen.enabled = true;
        config.kindlegen.program = script;

        let report = bind(&input, &config, true, &ProgressBar::hidden()).expect("can bind");
        let conversion = report.conversion.expect("conversion ran");
        assert_eq!(conversion.conversions.len(), 2);
        assert_eq!(conversion.succeeded(), 2);
        assert!(report.output_dir.join("novel_k_v01.mobi").is_file());
        assert!(report.output_dir.join("novel_k_v02.mobi").is_file());
    }
}
