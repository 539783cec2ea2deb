//! Cover page rendering for EPUB.
//!
//! The cover page shows nothing but the generated cover image. It is marked
//! with EPUB's cover reference type so e-readers display it appropriately in
//! library views.

use crate::sinks::epub::book::BookContainer;

/// File name of the cover image inside the container.
pub const COVER_IMAGE: &str = "cover.png";

/// Render the cover page as XHTML.
pub fn render(book: &BookContainer, lang: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
    <meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="stylesheet.css"/>
</head>
<body>
<div class="cover">
<img src="{image}" alt="{title}"/>
</div>
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(lang),
        title = html_escape::encode_double_quoted_attribute(&book.title),
        image = COVER_IMAGE,
    )
}
