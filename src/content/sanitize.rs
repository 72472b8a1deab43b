//! HTML sanitization
//!
//! Rendered HTML is parsed into a DOM and written back out from an
//! allow-list. Anything not explicitly allowed is removed, so scripts and
//! event handlers cannot survive regardless of how they were spelled in
//! the source.

use ego_tree::NodeRef;
use scraper::{Html, Node};

use crate::helpers::{escape_text, html_escape};

/// Elements kept in the output
const ALLOWED_ELEMENTS: &[&str] = &[
    "a",
    "blockquote",
    "br",
    "code",
    "del",
    "em",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "img",
    "li",
    "ol",
    "p",
    "pre",
    "span",
    "strong",
    "sub",
    "sup",
    "ul",
];

/// Elements removed together with everything inside them
const DROPPED_ELEMENTS: &[&str] = &[
    "applet", "base", "button", "embed", "frame", "frameset", "form", "head", "iframe", "input",
    "link", "math", "meta", "noembed", "noframes", "noscript", "object", "plaintext", "script",
    "select", "style", "svg", "template", "textarea", "title", "xmp",
];

/// Elements without a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img"];

/// URL schemes accepted in `href`/`src`.
///
/// Links with any other scheme (`javascript:`, `data:`, `vbscript:`, ...) keep
/// their text but lose the URL attribute.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "sms", "ftp", "ftps"];

fn allowed_attributes(element: &str) -> &'static [&'static str] {
    match element {
        "a" => &["href", "title"],
        "img" => &["src", "alt", "title", "width", "height"],
        "code" | "pre" | "span" => &["class"],
        "ol" => &["start"],
        _ => &[],
    }
}

/// Sanitize an HTML fragment
pub fn sanitize_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    for child in fragment.root_element().children() {
        write_node(child, &mut out);
    }
    out
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Element(element) => {
            let name = element.name();
            if DROPPED_ELEMENTS.contains(&name) {
                return;
            }
            if !ALLOWED_ELEMENTS.contains(&name) {
                // Unknown wrapper: keep its children only
                for child in node.children() {
                    write_node(child, out);
                }
                return;
            }

            let mut attrs: Vec<(&str, String)> = element
                .attrs()
                .filter_map(|(attr, value)| {
                    clean_attribute(name, attr, value).map(|value| (attr, value))
                })
                .collect();
            attrs.sort_by(|a, b| a.0.cmp(b.0));

            out.push('<');
            out.push_str(name);
            for (attr, value) in attrs {
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                out.push_str(&html_escape(&value));
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&name) {
                return;
            }
            for child in node.children() {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        // Comments, doctypes and processing instructions
        _ => {}
    }
}

/// Returns the value to keep, or `None` to drop the attribute
fn clean_attribute(element: &str, attr: &str, value: &str) -> Option<String> {
    let attr_lower = attr.to_ascii_lowercase();
    if attr_lower.starts_with("on") || !allowed_attributes(element).contains(&attr_lower.as_str())
    {
        return None;
    }

    match attr_lower.as_str() {
        "href" | "src" => is_safe_url(value).then(|| value.to_string()),
        "class" => {
            let classes: Vec<&str> = value
                .split_whitespace()
                .filter(|class| {
                    class
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                })
                .collect();
            (!classes.is_empty()).then(|| classes.join(" "))
        }
        "start" | "width" | "height" => value
            .trim()
            .parse::<u32>()
            .ok()
            .map(|n| n.to_string()),
        _ => Some(value.to_string()),
    }
}

/// Relative URLs and a small set of schemes are accepted
fn is_safe_url(value: &str) -> bool {
    // Browsers ignore embedded whitespace and control characters in schemes
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match normalized.find(':') {
        None => true,
        Some(colon) => {
            let scheme = &normalized[..colon];
            // A colon after the path, query or fragment started is not a scheme separator
            scheme.contains(['/', '?', '#']) || ALLOWED_SCHEMES.contains(&scheme)
        }
    }
}
