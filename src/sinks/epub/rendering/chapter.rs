use crate::sinks::epub::book::ContentItem;
use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Elements that never have content, written self-closed.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Wrap a chapter's crawled markup in an XHTML document.
pub fn render(item: &ContentItem, lang: &str) -> String {
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
{body}
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(lang),
        title = html_escape::encode_text(&item.title),
        body = to_xhtml(&item.body),
    )
}

/// Re-serialise crawled HTML as well-formed XHTML.
///
/// The markup goes through an HTML parser, so unclosed tags get closed and
/// entities like `&nbsp;` become plain characters. Comments, doctypes and
/// processing instructions are dropped.
pub fn to_xhtml(body: &str) -> String {
    let fragment = Html::parse_fragment(body);
    let mut out = String::with_capacity(body.len());
    for child in fragment.root_element().children() {
        write_node(child, &mut out);
    }
    out
}

fn write_node(node: NodeRef<Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&html_escape::encode_text(&**text)),
        Node::Element(element) => {
            let name = element.name();
            out.push('<');
            out.push_str(name);
            for (attr, value) in element.attrs() {
                out.push_str(&format!(
                    r#" {attr}="{}""#,
                    html_escape::encode_double_quoted_attribute(value)
                ));
            }

            if VOID_ELEMENTS.contains(&name) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in node.children() {
                write_node(child, out);
            }
            out.push_str(&format!("</{name}>"));
        }
        _ => {}
    }
}
