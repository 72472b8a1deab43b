//! List site content

use anyhow::Result;
use chrono::Local;

use crate::content::featured_posts;
use crate::helpers::{full_date, relative_date};
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let repository = folio.repository();

    match content_type {
        "post" | "posts" => {
            let posts = repository.list_all();
            let today = Local::now().date_naive();
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} ({}) - {} [{}] {} min",
                    full_date(post.published.date()),
                    relative_date(post.published.date(), today),
                    post.title,
                    post.id,
                    post.reading_time
                );
            }
        }
        "featured" => {
            let posts = repository.list_all();
            let featured = featured_posts(&posts, folio.config.featured_count);
            println!("Featured ({}):", featured.len());
            for post in featured {
                println!(
                    "  {} - {} [{}]",
                    full_date(post.published.date()),
                    post.title,
                    post.id
                );
            }
        }
        "tag" | "tags" => {
            let tags = repository.tags();
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {}", tag);
            }
        }
        "category" | "categories" => {
            let categories = repository.categories();
            println!("Categories ({}):", categories.len());
            for category in categories {
                println!("  {}", category);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, featured, tag, category",
                content_type
            );
        }
    }

    Ok(())
}
