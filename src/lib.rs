//! folio: the blog content pipeline behind a personal portfolio site
//!
//! Markdown files with YAML front-matter are read from a content directory,
//! rendered to sanitized HTML and exposed as typed [`content::BlogPost`]
//! records, together with related-post, category and tag views.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;

use anyhow::Result;
use std::path::Path;

pub use error::ContentError;

/// The application handle: configuration plus resolved directories
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Directory holding the post files
    pub content_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already-built configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);

        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Repository over this site's posts
    pub fn repository(&self) -> content::ContentRepository<'_> {
        content::ContentRepository::new(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<std::path::PathBuf> {
        commands::new::create_post(self, title)
    }
}
