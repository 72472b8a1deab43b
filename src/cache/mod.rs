//! Memoization of rendered posts
//!
//! Entries are keyed by source path and validated against a hash of the
//! file's current content, so a hit is only possible when the bytes on disk
//! are exactly those the post was built from.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::content::BlogPost;

/// A cached post and the content hash it was built from
#[derive(Debug, Clone)]
struct CacheEntry {
    content_hash: u64,
    post: BlogPost,
}

/// Thread-safe post cache shared across repository reads
#[derive(Debug, Default)]
pub struct PostCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl PostCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached post for `path`, if it was built from content with `content_hash`
    pub fn lookup(&self, path: &Path, content_hash: u64) -> Option<BlogPost> {
        let entries = self.lock();
        entries
            .get(path)
            .filter(|entry| entry.content_hash == content_hash)
            .map(|entry| entry.post.clone())
    }

    /// Remember the post built from `path`
    pub fn store(&self, path: &Path, content_hash: u64, post: BlogPost) {
        self.lock()
            .insert(path.to_path_buf(), CacheEntry { content_hash, post });
    }

    /// Forget `path`, e.g. after it stopped parsing
    pub fn invalidate(&self, path: &Path) {
        self.lock().remove(path);
    }

    /// Drop entries whose source files are no longer present
    pub fn retain_paths(&self, paths: &[PathBuf]) {
        self.lock().retain(|path, _| paths.contains(path));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, CacheEntry>> {
        // Entries are replaced whole, so a poisoned map is still consistent
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Calculate a hash for file content
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}
