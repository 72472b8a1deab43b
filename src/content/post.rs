//! Blog post model

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{reading_time, FrontMatter, MarkdownRenderer};
use crate::error::ContentError;

/// A published blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Identifier derived from the file name, used in URLs
    pub id: String,

    pub title: String,

    /// Publication date, exactly as written in the front-matter
    pub date: String,

    pub excerpt: String,

    pub category: String,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    pub featured: bool,

    /// Raw markdown body
    pub content_markdown: String,

    /// Rendered and sanitized HTML body
    pub content_html: String,

    /// Estimated minutes to read, at least 1
    pub reading_time: u32,

    /// Parsed `date`, used for ordering
    #[serde(skip)]
    pub published: NaiveDateTime,
}

impl BlogPost {
    /// Build a post from the full text of a content file.
    ///
    /// Pure: no file system access.
    pub fn from_source(
        id: &str,
        source: &str,
        renderer: &MarkdownRenderer,
        words_per_minute: u32,
    ) -> Result<Self, ContentError> {
        let (fm, body) = FrontMatter::parse(source)?;
        let published = fm
            .parse_date()
            .ok_or_else(|| ContentError::malformed(format!("unrecognized date `{}`", fm.date)))?;

        Ok(Self {
            id: id.to_string(),
            featured: fm.is_featured(),
            title: fm.title,
            date: fm.date,
            excerpt: fm.excerpt,
            category: fm.category,
            tags: fm.tags,
            content_html: renderer.render(body),
            reading_time: reading_time(body, words_per_minute),
            content_markdown: body.to_string(),
            published,
        })
    }

    /// Whether the post carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Get the previous (newer) post in a date-sorted list
    pub fn prev<'a>(&self, posts: &'a [BlogPost]) -> Option<&'a BlogPost> {
        let pos = posts.iter().position(|p| p.id == self.id)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) post in a date-sorted list
    pub fn next<'a>(&self, posts: &'a [BlogPost]) -> Option<&'a BlogPost> {
        let pos = posts.iter().position(|p| p.id == self.id)?;
        posts.get(pos + 1)
    }
}

/// Listing view of a post, without the body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub reading_time: u32,
}

impl From<&BlogPost> for PostSummary {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            date: post.date.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            featured: post.featured,
            reading_time: post.reading_time,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal valid source file for tests
    pub(crate) fn source(title: &str, date: &str, tags: &[&str], body: &str) -> String {
        format!(
            "---\ntitle: {}\ndate: {}\nexcerpt: About {}\ncategory: General\ntags: [{}]\n---\n\n{}",
            title,
            date,
            title,
            tags.join(", "),
            body
        )
    }

    /// Post built from [`source`], for index and ranking tests
    pub(crate) fn post(id: &str, date: &str, tags: &[&str]) -> BlogPost {
        BlogPost::from_source(
            id,
            &source(id, date, tags, "Body text."),
            &MarkdownRenderer::with_options(false),
            200,
        )
        .unwrap()
    }

    #[test]
    fn test_from_source() {
        let text = source("Hello", "2024-03-01", &["rust", "web"], "# Heading\n\nSome words here.");
        let post =
            BlogPost::from_source("hello", &text, &MarkdownRenderer::with_options(false), 200)
                .unwrap();
        assert_eq!(post.id, "hello");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.date, "2024-03-01");
        assert_eq!(post.tags, vec!["rust", "web"]);
        assert!(!post.featured);
        assert_eq!(post.content_markdown, "# Heading\n\nSome words here.");
        assert!(post.content_html.contains("<h1>Heading</h1>"));
        assert_eq!(post.reading_time, 1);
    }

    #[test]
    fn test_duplicate_tags_kept() {
        let p = post("dup", "2024-01-01", &["go", "go"]);
        assert_eq!(p.tags, vec!["go", "go"]);
    }

    #[test]
    fn test_malformed_source() {
        let err = BlogPost::from_source(
            "bad",
            "no front matter",
            &MarkdownRenderer::with_options(false),
            200,
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::Malformed(_)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let p = post("json", "2024-01-01", &["a"]);
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["id"], "json");
        assert_eq!(value["readingTime"], 1);
        assert!(value["contentHtml"].as_str().unwrap().contains("Body text."));
        assert!(value.get("published").is_none());
    }

    #[test]
    fn test_prev_next() {
        let posts = vec![
            post("c", "2024-03-01", &[]),
            post("b", "2024-02-01", &[]),
            post("a", "2024-01-01", &[]),
        ];
        assert_eq!(posts[1].prev(&posts).map(|p| p.id.as_str()), Some("c"));
        assert_eq!(posts[1].next(&posts).map(|p| p.id.as_str()), Some("a"));
        assert!(posts[0].prev(&posts).is_none());
        assert!(posts[2].next(&posts).is_none());
    }
}
