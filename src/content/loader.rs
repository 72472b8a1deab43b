//! Content repository - loads blog posts from the content directory

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::index::{sort_newest_first, unique_categories, unique_tags};
use super::{BlogPost, MarkdownRenderer};
use crate::cache::{self, PostCache};
use crate::error::ContentError;
use crate::Folio;

/// Read-only access to the posts stored in the content directory.
///
/// Every call re-reads the directory; nothing is kept between calls unless
/// a [`PostCache`] is attached.
pub struct ContentRepository<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
    cache: Option<&'a PostCache>,
}

impl<'a> ContentRepository<'a> {
    /// Create a new content repository
    pub fn new(folio: &'a Folio) -> Self {
        let renderer = MarkdownRenderer::with_options(folio.config.highlight.enable);
        Self {
            folio,
            renderer,
            cache: None,
        }
    }

    /// Reuse rendered posts whose source files have not changed
    pub fn with_cache(mut self, cache: &'a PostCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Load all posts, newest first.
    ///
    /// Files that fail to load are logged and left out. An unavailable
    /// directory yields an empty list.
    pub fn list_all(&self) -> Vec<BlogPost> {
        let paths = match self.discover() {
            Ok(paths) => paths,
            Err(e) => {
                tracing::error!("{}", e);
                return Vec::new();
            }
        };

        if let Some(cache) = self.cache {
            cache.retain_paths(&paths);
        }

        let mut posts = Vec::with_capacity(paths.len());
        for path in &paths {
            match self.load_post(path) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping post {:?}: {}", path, e);
                }
            }
        }

        sort_newest_first(&mut posts);
        tracing::debug!("Loaded {} of {} content files", posts.len(), paths.len());

        posts
    }

    /// Load a single post by id; `None` when it does not exist or cannot be loaded
    pub fn get_by_id(&self, id: &str) -> Option<BlogPost> {
        if !is_valid_id(id) {
            tracing::debug!("Rejected post id {:?}", id);
            return None;
        }

        let path = self
            .folio
            .content_dir
            .join(format!("{}.{}", id, self.folio.config.extension));
        if !path.is_file() {
            tracing::debug!("No post with id {:?}", id);
            return None;
        }

        match self.load_post(&path) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::warn!("Failed to load post {:?}: {}", path, e);
                None
            }
        }
    }

    /// Deduplicated, sorted categories of all posts
    pub fn categories(&self) -> Vec<String> {
        unique_categories(&self.list_all())
    }

    /// Deduplicated, sorted tags of all posts
    pub fn tags(&self) -> Vec<String> {
        unique_tags(&self.list_all())
    }

    /// List eligible content files, sorted by file name
    pub fn discover(&self) -> Result<Vec<PathBuf>, ContentError> {
        let dir = &self.folio.content_dir;
        fs::read_dir(dir).map_err(|source| ContentError::DirectoryUnavailable {
            path: dir.clone(),
            source,
        })?;

        let extension = &self.folio.config.extension;
        let mut paths = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && is_content_file(path, extension) {
                        paths.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                }
            }
        }

        Ok(paths)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<BlogPost, ContentError> {
        let text = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::malformed("file name is not valid UTF-8"))?;

        let content_hash = cache::hash_content(&text);
        if let Some(cache) = self.cache {
            if let Some(post) = cache.lookup(path, content_hash) {
                tracing::debug!("Cache hit for {:?}", path);
                return Ok(post);
            }
        }

        let result = BlogPost::from_source(
            id,
            &text,
            &self.renderer,
            self.folio.config.words_per_minute,
        );

        if let Some(cache) = self.cache {
            match &result {
                Ok(post) => cache.store(path, content_hash, post.clone()),
                Err(_) => cache.invalidate(path),
            }
        }

        result
    }
}

/// Check if a file is an eligible content file
fn is_content_file(path: &Path, extension: &str) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(true);

    !hidden
        && path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == extension)
            .unwrap_or(false)
}

/// Ids are plain file stems. A path separator is needed to leave the
/// directory; a leading dot (`.`, `..`, hidden files) is never discovered.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.starts_with('.') && !id.contains(['/', '\\', '\0'])
}
