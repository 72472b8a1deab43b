//! Derived views over a post collection: related posts, category and tag
//! indexes, featured posts and listing filters.

use std::borrow::Borrow;
use std::collections::BTreeSet;

use super::BlogPost;

/// Number of related posts shown under an article
pub const DEFAULT_RELATED_COUNT: usize = 3;

/// Select up to `count` posts sharing at least one tag with `post`.
///
/// The reference post itself is excluded (matched by id). Qualifying posts
/// keep the order in which they appear in `candidates`.
pub fn related_posts<'a>(
    post: &BlogPost,
    candidates: &'a [BlogPost],
    count: usize,
) -> Vec<&'a BlogPost> {
    if post.tags.is_empty() {
        return Vec::new();
    }

    candidates
        .iter()
        .filter(|candidate| candidate.id != post.id)
        .filter(|candidate| candidate.tags.iter().any(|tag| post.has_tag(tag)))
        .take(count)
        .collect()
}

/// Deduplicated categories, sorted ascending
pub fn unique_categories(posts: &[BlogPost]) -> Vec<String> {
    posts
        .iter()
        .map(|post| post.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Deduplicated tags across all posts, sorted ascending
pub fn unique_tags(posts: &[BlogPost]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// First `count` featured posts, in collection order
pub fn featured_posts(posts: &[BlogPost], count: usize) -> Vec<&BlogPost> {
    posts.iter().filter(|post| post.featured).take(count).collect()
}

/// Ordering of a filtered listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first
    #[default]
    Date,
    /// Shortest read first
    ReadingTime,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortOrder::Date),
            "reading-time" | "reading_time" | "readingTime" => Ok(SortOrder::ReadingTime),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Listing filter: category, any-of tags, then ordering
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub sort: SortOrder,
}

impl PostFilter {
    pub fn apply<'a>(&self, posts: &'a [BlogPost]) -> Vec<&'a BlogPost> {
        let mut selected: Vec<&BlogPost> = posts
            .iter()
            .filter(|post| {
                self.category
                    .as_ref()
                    .map_or(true, |category| &post.category == category)
            })
            .filter(|post| self.tags.is_empty() || self.tags.iter().any(|tag| post.has_tag(tag)))
            .collect();

        match self.sort {
            SortOrder::Date => sort_newest_first(&mut selected),
            SortOrder::ReadingTime => selected.sort_by_key(|post| post.reading_time),
        }
        selected
    }
}

/// Stable sort by date descending, ties broken by id
pub(crate) fn sort_newest_first<P: Borrow<BlogPost>>(posts: &mut [P]) {
    posts.sort_by(|a, b| {
        let (a, b) = (Borrow::<BlogPost>::borrow(a), Borrow::<BlogPost>::borrow(b));
        b.published.cmp(&a.published).then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::post::tests::post;
    use proptest::prelude::*;

    #[test]
    fn test_related_posts_scenario() {
        let current = post("current", "2024-05-01", &["go", "rust"]);
        let candidates = vec![
            post("go-only", "2024-04-01", &["go"]),
            post("python", "2024-03-01", &["python"]),
            post("rust-go", "2024-02-01", &["rust", "go"]),
        ];

        let related = related_posts(&current, &candidates, 3);
        let ids: Vec<&str> = related.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["go-only", "rust-go"]);
    }

    #[test]
    fn test_related_excludes_self_and_keeps_input_order() {
        let current = post("current", "2024-05-01", &["rust"]);
        let candidates = vec![
            post("b", "2024-01-01", &["rust"]),
            current.clone(),
            post("a", "2024-04-01", &["rust"]),
            post("c", "2024-03-01", &["rust"]),
        ];

        let related = related_posts(&current, &candidates, 2);
        let ids: Vec<&str> = related.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_related_without_tags_is_empty() {
        let current = post("current", "2024-05-01", &[]);
        let candidates = vec![post("a", "2024-04-01", &["rust"])];
        assert!(related_posts(&current, &candidates, 3).is_empty());
    }

    #[test]
    fn test_unique_categories_and_tags() {
        let mut posts = vec![
            post("a", "2024-01-01", &["rust", "web"]),
            post("b", "2024-01-02", &["go", "rust"]),
            post("c", "2024-01-03", &[]),
        ];
        posts[1].category = "Career".to_string();

        assert_eq!(unique_categories(&posts), vec!["Career", "General"]);
        assert_eq!(unique_tags(&posts), vec!["go", "rust", "web"]);
        assert!(unique_tags(&[]).is_empty());
    }

    #[test]
    fn test_featured_posts() {
        let mut posts = vec![
            post("a", "2024-01-03", &[]),
            post("b", "2024-01-02", &[]),
            post("c", "2024-01-01", &[]),
        ];
        posts[0].featured = true;
        posts[2].featured = true;

        let ids: Vec<&str> = featured_posts(&posts, 3).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(featured_posts(&posts, 1).len(), 1);
    }

    #[test]
    fn test_filter_by_category_and_tags() {
        let mut posts = vec![
            post("a", "2024-01-01", &["rust"]),
            post("b", "2024-03-01", &["go"]),
            post("c", "2024-02-01", &["python"]),
        ];
        posts[2].category = "Data".to_string();

        let filter = PostFilter {
            category: Some("General".to_string()),
            tags: vec!["rust".to_string(), "go".to_string()],
            sort: SortOrder::Date,
        };
        let ids: Vec<&str> = filter.apply(&posts).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_filter_sort_by_reading_time() {
        let mut posts = vec![
            post("long", "2024-01-01", &[]),
            post("short", "2024-03-01", &[]),
            post("medium", "2024-02-01", &[]),
        ];
        posts[0].reading_time = 9;
        posts[2].reading_time = 4;

        let filter = PostFilter {
            sort: SortOrder::ReadingTime,
            ..Default::default()
        };
        let ids: Vec<&str> = filter.apply(&posts).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["short", "medium", "long"]);
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("date".parse::<SortOrder>(), Ok(SortOrder::Date));
        assert_eq!("reading-time".parse::<SortOrder>(), Ok(SortOrder::ReadingTime));
        assert!("random".parse::<SortOrder>().is_err());
    }

    proptest! {
        #[test]
        fn prop_related_posts_share_a_tag(
            reference_tags in prop::collection::vec("[a-d]", 0..3),
            candidate_tags in prop::collection::vec(prop::collection::vec("[a-f]", 0..3), 0..8),
            count in 0usize..5,
        ) {
            let reference_refs: Vec<&str> = reference_tags.iter().map(String::as_str).collect();
            let reference = post("reference", "2024-06-01", &reference_refs);

            let mut candidates: Vec<BlogPost> = candidate_tags
                .iter()
                .enumerate()
                .map(|(i, tags)| {
                    let refs: Vec<&str> = tags.iter().map(String::as_str).collect();
                    post(&format!("p{}", i), "2024-01-01", &refs)
                })
                .collect();
            candidates.push(reference.clone());

            let related = related_posts(&reference, &candidates, count);
            prop_assert!(related.len() <= count);
            for p in related {
                prop_assert!(p.id != reference.id);
                prop_assert!(p.tags.iter().any(|t| reference.has_tag(t)));
            }
        }
    }
}
