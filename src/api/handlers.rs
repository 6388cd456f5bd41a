use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    api::models::*,
    loader::LoadOutcome,
    page::{entries::RenderedFeed, MenuView, Page},
    Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub page: Arc<Page>,
}

/// GET /api/feeds - List the feed registry
pub async fn list_feeds(State(state): State<AppState>) -> Json<Vec<FeedCard>> {
    let feeds = state
        .page
        .registry()
        .iter()
        .enumerate()
        .map(|(index, feed)| FeedCard {
            index,
            name: feed.name.clone(),
            url: feed.url.clone(),
        })
        .collect();

    Json(feeds)
}

/// POST /api/feeds/:index/load - Load a feed and report how it went
pub async fn load_feed(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<LoadOutcome>> {
    debug!("Load feed request: {}", index);

    // Unknown indices are a client error here; every other failure is an outcome
    state.page.registry().get(index)?;

    Ok(Json(state.page.load_feed(index).await))
}

/// GET /api/entries - The currently rendered entries
pub async fn get_entries(State(state): State<AppState>) -> Json<RenderedFeed> {
    Json(state.page.entries().snapshot())
}

/// GET /api/menu - Current menu state
pub async fn get_menu(State(state): State<AppState>) -> Json<MenuView> {
    Json(state.page.menu())
}

/// POST /api/menu/toggle - Toggle the menu and return its new state
pub async fn toggle_menu(State(state): State<AppState>) -> Json<MenuView> {
    state.page.toggle_menu();
    Json(state.page.menu())
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
