//! Stylesheet for generated books.
//!
//! Chapter bodies come straight from the crawler with their own markup, so
//! only light prose defaults are set here. The cover page is laid out to show
//! the generated cover image on its own.

/// Generate the CSS stylesheet shared by every page of a book.
pub fn generate_stylesheet() -> String {
    r#"/* Base styles */
body {
    font-family: serif;
    line-height: 1.5;
    margin: 1em;
}

h1, h2, h3 {
    text-align: center;
    margin: 1em 0 0.5em;
}

p {
    margin: 0 0 0.8em;
    text-indent: 1.2em;
}

/* Table of contents */
.toc ol {
    list-style-type: none;
    padding-left: 1em;
}

.toc li {
    margin: 0.3em 0;
}

.toc a {
    text-decoration: none;
    color: inherit;
}

/* Cover page */
.cover {
    text-align: center;
    margin: 0;
    padding: 0;
}

.cover img {
    max-width: 100%;
    max-height: 100%;
}
"#
    .to_string()
}
