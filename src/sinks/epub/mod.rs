//! EPUB generation for crawled novels.
//!
//! This module turns one assembled volume into an EPUB ebook with:
//! - Generated cover image and a cover page showing it
//! - Table of contents page listing the chapters in reading order
//! - One XHTML document per chapter, body re-serialised as well-formed XHTML
//!
//! The container is modelled first ([`BookContainer`]) so its reading order
//! and navigation can be checked without unpacking an archive, then packaged.

mod book;
mod rendering;
mod styles;

pub use book::{BookContainer, BookContainerBuilder, ContentItem, SpineEntry};
pub use rendering::CONTAINER_EXTENSION;
