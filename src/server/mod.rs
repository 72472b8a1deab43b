//! Read-only JSON content API

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cache::PostCache;
use crate::content::{
    featured_posts, related_posts, unique_categories, unique_tags, BlogPost, ContentRepository,
    PostFilter, PostSummary, SortOrder,
};
use crate::helpers::html_escape;
use crate::Folio;

/// Server state
struct ServerState {
    folio: Folio,
    cache: PostCache,
}

impl ServerState {
    fn repository(&self) -> ContentRepository<'_> {
        ContentRepository::new(&self.folio).with_cache(&self.cache)
    }
}

/// Query parameters of the post listing
#[derive(Debug, Default, Deserialize)]
struct ListParams {
    category: Option<String>,
    /// Comma-separated tag names
    tags: Option<String>,
    sort: Option<String>,
}

impl ListParams {
    fn into_filter(self) -> Result<PostFilter, String> {
        let sort = match self.sort.as_deref() {
            Some(sort) => sort.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };
        let tags = self
            .tags
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(PostFilter {
            category: self.category.filter(|c| !c.is_empty()),
            tags,
            sort,
        })
    }
}

/// A post together with its related posts and its neighbours in the
/// newest-first listing
#[derive(Debug, Serialize)]
struct PostDetail {
    #[serde(flatten)]
    post: BlogPost,
    related: Vec<PostSummary>,
    newer: Option<PostSummary>,
    older: Option<PostSummary>,
}

/// Site metadata for page headers and feeds
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteInfo {
    title: String,
    description: String,
    author: String,
    url: String,
    blog_path: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

fn new_state(folio: Folio) -> Arc<ServerState> {
    Arc::new(ServerState {
        folio,
        cache: PostCache::new(),
    })
}

/// Build the API router
pub fn router(folio: Folio) -> Router {
    Router::new()
        .route("/api/site", get(site_info))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:id", get(get_post))
        .route("/api/featured", get(list_featured))
        .route("/api/categories", get(list_categories))
        .route("/api/tags", get(list_tags))
        .route("/sitemap.xml", get(sitemap))
        .layer(TraceLayer::new_for_http())
        .with_state(new_state(folio))
}

/// Start the API server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    tracing::info!(
        "Serving {} from {:?} at http://{}:{}",
        folio.config.title,
        folio.content_dir,
        ip,
        port
    );
    println!("Press Ctrl+C to stop.");

    let app = router(folio.clone());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn site_info(State(state): State<Arc<ServerState>>) -> Json<SiteInfo> {
    let config = &state.folio.config;
    Json(SiteInfo {
        title: config.title.clone(),
        description: config.description.clone(),
        author: config.author.clone(),
        url: config.url.clone(),
        blog_path: config.blog_path.clone(),
    })
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ListParams>,
) -> Response {
    let filter = match params.into_filter() {
        Ok(filter) => filter,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let posts = state.repository().list_all();
    let summaries: Vec<PostSummary> = filter
        .apply(&posts)
        .into_iter()
        .map(PostSummary::from)
        .collect();
    Json(summaries).into_response()
}

async fn get_post(State(state): State<Arc<ServerState>>, Path(id): Path<String>) -> Response {
    let repository = state.repository();
    let Some(post) = repository.get_by_id(&id) else {
        return error_response(StatusCode::NOT_FOUND, format!("Post not found: {}", id));
    };

    let posts = repository.list_all();
    let related = related_posts(&post, &posts, state.folio.config.related_count)
        .into_iter()
        .map(PostSummary::from)
        .collect();
    let newer = post.prev(&posts).map(PostSummary::from);
    let older = post.next(&posts).map(PostSummary::from);

    Json(PostDetail {
        post,
        related,
        newer,
        older,
    })
    .into_response()
}

async fn list_featured(State(state): State<Arc<ServerState>>) -> Json<Vec<PostSummary>> {
    let posts = state.repository().list_all();
    Json(
        featured_posts(&posts, state.folio.config.featured_count)
            .into_iter()
            .map(PostSummary::from)
            .collect(),
    )
}

async fn list_categories(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    Json(unique_categories(&state.repository().list_all()))
}

async fn list_tags(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    Json(unique_tags(&state.repository().list_all()))
}

async fn sitemap(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let posts = state.repository().list_all();
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap(&state.folio, &posts),
    )
}

/// Sitemap listing the blog index and every post
pub fn render_sitemap(folio: &Folio, posts: &[BlogPost]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    let index_url = format!(
        "{}/{}",
        folio.config.url.trim_end_matches('/'),
        folio.config.blog_path.trim_matches('/')
    );
    xml.push_str(&format!(
        "  <url><loc>{}</loc><changefreq>weekly</changefreq><priority>0.8</priority></url>\n",
        html_escape(&index_url)
    ));

    for post in posts {
        xml.push_str(&format!(
            "  <url><loc>{}</loc><lastmod>{}</lastmod><changefreq>monthly</changefreq><priority>0.6</priority></url>\n",
            html_escape(&folio.config.post_url(&post.id)),
            post.published.format("%Y-%m-%d")
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}
