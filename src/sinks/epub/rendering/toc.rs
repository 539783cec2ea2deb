//! Table of contents rendering for EPUB.
//!
//! Generates a navigable TOC page listing every chapter in reading order.
//! This complements the EPUB's built-in navigation (NCX) with a
//! human-readable page that readers can browse.

use crate::sinks::epub::book::BookContainer;

/// File name of the navigation page inside the container.
pub const TOC_PAGE: &str = "toc.xhtml";

/// Render the table of contents as XHTML.
pub fn render(book: &BookContainer, lang: &str) -> String {
    let items = book
        .toc()
        .iter()
        .map(|item| {
            format!(
                r#"<li><a href="{}">{}</a></li>"#,
                html_escape::encode_double_quoted_attribute(&item.file_name),
                html_escape::encode_text(&item.title)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
    <meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/>
    <title>Table of Contents - {title}</title>
    <link rel="stylesheet" type="text/css" href="stylesheet.css"/>
</head>
<body>
<div class="toc">
<h2>Table of Contents</h2>
<ol>
{items}
</ol>
</div>
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(lang),
        title = html_escape::encode_text(&book.title),
        items = items,
    )
}
