//! Gate HTTP routes
//!
//! The content API the hosting shell reads once it is past the wall. The
//! gate serves data only; progression runs inside the visitor's client.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;

use story_atlas::{Chapter, Link, Node, NodeId, StoryAtlas};

use crate::auth;
use crate::config::AuthConfig;

/// State shared across handlers.
pub struct GateState {
    pub atlas: StoryAtlas,
    pub auth: AuthConfig,
}

pub type SharedState = Arc<GateState>;

/// Create the gate router. Every route sits behind the password wall,
/// the health check included.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/constellation", get(constellation))
        .route("/api/chapters/:id", get(chapter))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        .with_state(state)
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Map payload for the hosting shell.
#[derive(Serialize)]
pub struct ConstellationResponse {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
    pub start: NodeId,
    pub terminal: NodeId,
}

/// GET /api/constellation
pub async fn constellation(State(state): State<SharedState>) -> Json<ConstellationResponse> {
    let constellation = state.atlas.constellation();

    Json(ConstellationResponse {
        nodes: constellation.nodes().to_vec(),
        links: constellation.links().to_vec(),
        start: state.atlas.start().clone(),
        terminal: state.atlas.terminal().clone(),
    })
}

/// Chapter payload, the node id alongside the content.
#[derive(Serialize)]
pub struct ChapterResponse {
    pub id: NodeId,
    #[serde(flatten)]
    pub chapter: Chapter,
}

/// GET /api/chapters/:id
pub async fn chapter(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ChapterResponse>, StatusCode> {
    let chapter = state.atlas.chapter(&id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(ChapterResponse {
        id: NodeId::new(id),
        chapter: chapter.clone(),
    }))
}
