//! JSON query server over the content index

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::{Post, PostMetadata};
use crate::index::{ContentIndex, Sidebar};
use crate::Blog;

/// Server state
struct ServerState {
    index: ContentIndex,
}

/// Query string of `GET /search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// One year of the archive
#[derive(Debug, Serialize)]
pub struct ArchiveYear {
    pub year: String,
    pub posts: Vec<PostMetadata>,
}

/// Build the router for an index
pub fn router(index: ContentIndex) -> Router {
    let state = Arc::new(ServerState { index });

    Router::new()
        .route("/search", get(search_handler))
        .route("/api/search", get(search_handler))
        .route("/api/posts", get(posts_handler))
        .route("/api/posts/:slug", get(post_handler))
        .route("/api/tags", get(tags_handler))
        .route("/api/archive", get(archive_handler))
        .route("/api/sidebar", get(sidebar_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the query server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog.index());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Serving {:?} at http://{}:{}", blog.posts_dir, ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run an index query on the blocking pool
async fn with_index<T, F>(state: &Arc<ServerState>, query: F) -> Result<T, StatusCode>
where
    F: FnOnce(&ContentIndex) -> T + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || query(&state.index))
        .await
        .map_err(|e| {
            tracing::error!("Index query panicked: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// `GET /search?q=` - an empty or missing query yields `[]`
async fn search_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PostMetadata>>, StatusCode> {
    let q = params.q.unwrap_or_default();
    if q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }
    with_index(&state, move |index| index.search(&q)).await.map(Json)
}

async fn posts_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<PostMetadata>>, StatusCode> {
    with_index(&state, |index| index.sorted_by_recency())
        .await
        .map(Json)
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, StatusCode> {
    with_index(&state, move |index| index.get_full_by_slug(&slug))
        .await?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn tags_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<IndexMap<String, Vec<PostMetadata>>>, StatusCode> {
    with_index(&state, |index| index.group_by_tag())
        .await
        .map(Json)
}

async fn archive_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<ArchiveYear>>, StatusCode> {
    let archive = with_index(&state, |index| index.archive()).await?;
    Ok(Json(
        archive
            .into_iter()
            .map(|(year, posts)| ArchiveYear { year, posts })
            .collect(),
    ))
}

async fn sidebar_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Sidebar>, StatusCode> {
    with_index(&state, |index| index.sidebar()).await.map(Json)
}
