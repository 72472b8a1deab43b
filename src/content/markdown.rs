//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::sanitize::sanitize_html;
use crate::helpers::{escape_text, html_escape};

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
}

/// Deepest heading level rendered as a heading element
const MAX_HEADING_DEPTH: usize = 3;

/// Markdown renderer producing sanitized HTML
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    highlight: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self { highlight: true }
    }

    /// Create with custom settings
    pub fn with_options(highlight: bool) -> Self {
        Self { highlight }
    }

    /// Render markdown to sanitized HTML.
    ///
    /// Never fails: syntax that is not recognized ends up as literal text.
    pub fn render(&self, markdown: &str) -> String {
        sanitize_html(&self.render_unsanitized(markdown))
    }

    fn render_unsanitized(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);

        let mut events: Vec<Event> = Vec::new();
        // (language, collected source) while inside a code block
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            if code_block.is_some() {
                match event {
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, code)) = code_block.take() {
                            let rendered = self.render_code_block(&code, lang.as_deref());
                            events.push(Event::Html(CowStr::from(rendered)));
                        }
                    }
                    Event::Text(text) => {
                        if let Some((_, code)) = code_block.as_mut() {
                            code.push_str(&text);
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(Tag::Heading { level, .. })
                    if heading_depth(level) > MAX_HEADING_DEPTH =>
                {
                    events.push(Event::Start(Tag::Paragraph));
                    let marker = format!("{} ", "#".repeat(heading_depth(level)));
                    events.push(Event::Text(CowStr::from(marker)));
                }
                Event::End(TagEnd::Heading(level)) if heading_depth(level) > MAX_HEADING_DEPTH => {
                    events.push(Event::End(TagEnd::Paragraph));
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Render a code block as `<pre><code>`, tokenized when highlighting is on
    fn render_code_block(&self, code: &str, lang: Option<&str>) -> String {
        let class = lang
            .map(|lang| format!(r#" class="language-{}""#, html_escape(lang)))
            .unwrap_or_default();

        let body = match lang {
            Some(lang) if self.highlight => {
                highlight_code(code, lang).unwrap_or_else(|| escape_text(code))
            }
            _ => escape_text(code),
        };

        format!("<pre><code{}>{}</code></pre>\n", class, body)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Highlight a code block with class-based spans; `None` for unknown languages
fn highlight_code(code: &str, lang: &str) -> Option<String> {
    let syntax = SYNTAX_SET
        .find_syntax_by_token(lang)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))?;

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::debug!("Highlighting failed for language {}: {}", lang, e);
            return None;
        }
    }
    Some(generator.finalize())
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use scraper::{Html, Selector};

    fn plain() -> MarkdownRenderer {
        MarkdownRenderer::with_options(false)
    }

    /// True when the HTML has no script element and no `on*` attribute
    fn is_inert(html: &str) -> bool {
        let fragment = Html::parse_fragment(html);
        let all = Selector::parse("*").unwrap();
        let tree_ok = fragment.select(&all).all(|el| {
            el.value().name() != "script"
                && el
                    .value()
                    .attrs()
                    .all(|(name, _)| !name.to_ascii_lowercase().starts_with("on"))
        });
        tree_ok && !html.to_ascii_lowercase().contains("<script")
    }

    #[test]
    fn test_render_structure() {
        let markdown = "# Title\n\n## Subtitle\n\n- one\n- two\n\n[Read more](/blog)";
        let html = plain().render(markdown);
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<h2>Subtitle</h2>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<li>two</li>"));
        assert_eq!(html.matches("<ul>").count(), 1);
        assert!(html.contains(r#"<a href="/blog">Read more</a>"#));
    }

    #[test]
    fn test_render_sanitizes_inline_html() {
        let markdown =
            "Safe text <script>alert('xss')</script><img src='x' onerror='alert(1)' />";
        let html = plain().render(markdown);
        assert!(html.contains("Safe text"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
        assert!(html.contains(r#"<img src="x">"#));
    }

    #[test]
    fn test_render_emphasis_and_code() {
        let html = plain().render("**bold** and *italic* and _also_ with `code`");
        assert_eq!(
            html,
            "<p><strong>bold</strong> and <em>italic</em> and <em>also</em> with <code>code</code></p>\n"
        );
    }

    #[test]
    fn test_render_paragraphs() {
        let html = plain().render("First block\nstill first.\n\nSecond block.");
        assert_eq!(html, "<p>First block\nstill first.</p>\n<p>Second block.</p>\n");
    }

    #[test]
    fn test_render_fenced_code_plain() {
        let html = plain().render("```rust\nfn main() { if a < b {} }\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">fn main() { if a &lt; b {} }\n</code></pre>\n"
        );
    }

    #[test]
    fn test_render_fenced_code_highlighted() {
        let html = MarkdownRenderer::new().render("```rust\nfn main() {}\n```");
        assert!(html.starts_with(r#"<pre><code class="language-rust">"#));
        assert!(html.contains("<span class="));
        assert!(!html.contains("style="));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain() {
        let html = MarkdownRenderer::new().render("```nosuchlang\na < b\n```");
        assert!(html.contains("a &lt; b"));
        assert!(html.contains("language-nosuchlang"));
    }

    #[test]
    fn test_code_block_script_is_text() {
        let html = plain().render("```html\n<script>alert(1)</script>\n```");
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(is_inert(&html));
    }

    #[test]
    fn test_deep_headings_stay_text() {
        let html = plain().render("### Third\n\n#### Fourth");
        assert!(html.contains("<h3>Third</h3>"));
        assert!(html.contains("<p>#### Fourth</p>"));
        assert!(!html.contains("<h4>"));
    }

    #[test]
    fn test_link_href_unmodified() {
        let html = plain().render("[docs](https://example.com/a?b=1&c=2)");
        assert!(html.contains(r#"href="https://example.com/a?b=1&amp;c=2""#));
    }

    #[test]
    fn test_javascript_link_neutralized() {
        let html = plain().render("[click](javascript:alert(1))");
        assert!(html.contains("click"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_unrecognized_syntax_is_literal() {
        let html = plain().render("a ]] weird [[ line ~~~ ::");
        assert!(html.starts_with("<p>"));
        assert!(html.contains("a ]] weird [[ line"));
    }

    proptest! {
        #[test]
        fn prop_render_is_deterministic(markdown in "\\PC{0,200}") {
            let renderer = MarkdownRenderer::new();
            prop_assert_eq!(renderer.render(&markdown), renderer.render(&markdown));
        }

        #[test]
        fn prop_payloads_are_neutralized(
            before in "[a-zA-Z0-9 #*_\\-\\n]{0,40}",
            payload in prop::sample::select(vec![
                "<script>alert(1)</script>",
                "<SCRIPT SRC=//x.js></SCRIPT>",
                "<img src=x onerror=alert(1)>",
                "<img src='x' OnError='alert(1)' />",
                "<svg onload=alert(1)>",
                "<a href=\"javascript:alert(1)\" onclick=\"x()\">c</a>",
                "<div onmouseover='x'>hi</div>",
                "<scr<script>ipt>alert(1)</script>",
                "<iframe src=javascript:alert(1)></iframe>",
                "<p ONCLICK=y>t</p>",
                "<details open ontoggle=alert(1)>",
                "<!--<script>-->alert(1)",
            ]),
            after in "[a-zA-Z0-9 \\n]{0,40}",
        ) {
            let markdown = format!("{}{}{}", before, payload, after);
            let html = plain().render(&markdown);
            prop_assert!(is_inert(&html), "not inert: {}", html);
        }
    }
}
