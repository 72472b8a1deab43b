//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::{DEFAULT_RELATED_COUNT, DEFAULT_WORDS_PER_MINUTE};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    /// URL prefix under which posts are served
    pub blog_path: String,

    // Content
    /// Directory holding the post files, relative to the base directory
    pub content_dir: String,
    /// File extension (without dot) of eligible post files
    pub extension: String,

    // Writing
    pub words_per_minute: u32,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Listings
    pub related_count: usize,
    pub featured_count: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: String::new(),

            url: "http://localhost:3000".to_string(),
            blog_path: "/blog".to_string(),

            content_dir: "content/blog".to_string(),
            extension: "md".to_string(),

            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            highlight: HighlightConfig::default(),

            related_count: DEFAULT_RELATED_COUNT,
            featured_count: 3,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        if config.words_per_minute == 0 {
            anyhow::bail!("words_per_minute must be greater than zero");
        }
        Ok(config)
    }

    /// Absolute URL of a post
    pub fn post_url(&self, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.url.trim_end_matches('/'),
            self.blog_path.trim_matches('/'),
            id
        )
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}
