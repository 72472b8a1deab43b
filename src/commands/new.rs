//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Write a new post with a complete front-matter block, returning its path
pub fn create_post(folio: &Folio, title: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&folio.content_dir)?;

    let file_path = folio
        .content_dir
        .join(format!("{}.{}", slug, folio.config.extension));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = chrono::Local::now().format("%Y-%m-%d");
    let content = format!(
        "---\ntitle: {}\ndate: {}\nexcerpt: \"\"\ncategory: General\ntags: []\nfeatured: false\n---\n\n",
        serde_json::to_string(title)?,
        today
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}
