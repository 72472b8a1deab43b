//! Content module - blog posts and the pipeline that builds them

mod frontmatter;
pub mod index;
pub mod loader;
mod markdown;
pub(crate) mod post;
mod reading_time;
pub mod sanitize;

pub use frontmatter::FrontMatter;
pub use index::{
    featured_posts, related_posts, unique_categories, unique_tags, PostFilter, SortOrder,
    DEFAULT_RELATED_COUNT,
};
pub use loader::ContentRepository;
pub use markdown::MarkdownRenderer;
pub use post::{BlogPost, PostSummary};
pub use reading_time::{reading_time, DEFAULT_WORDS_PER_MINUTE};
