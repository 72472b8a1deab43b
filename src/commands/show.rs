//! Inspect single posts and render markdown files

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::{related_posts, MarkdownRenderer, PostSummary};
use crate::Folio;

/// Print a post as JSON
pub fn show(folio: &Folio, id: &str) -> Result<()> {
    let post = folio
        .repository()
        .get_by_id(id)
        .with_context(|| format!("No post with id {:?}", id))?;
    println!("{}", serde_json::to_string_pretty(&post)?);
    Ok(())
}

/// Print the posts related to `id`
pub fn related(folio: &Folio, id: &str, count: usize) -> Result<()> {
    let posts = folio.repository().list_all();
    let post = posts
        .iter()
        .find(|p| p.id == id)
        .with_context(|| format!("No post with id {:?}", id))?;

    let related: Vec<PostSummary> = related_posts(post, &posts, count)
        .into_iter()
        .map(PostSummary::from)
        .collect();
    println!("{}", serde_json::to_string_pretty(&related)?);
    Ok(())
}

/// Render a markdown file (without front-matter) to sanitized HTML on stdout
pub fn render(folio: &Folio, path: &Path) -> Result<()> {
    let markdown =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let renderer = MarkdownRenderer::with_options(folio.config.highlight.enable);
    print!("{}", renderer.render(&markdown));
    Ok(())
}
