use axum::http::{header, HeaderValue};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::web::handlers as web_handlers;

/// Create the router with all endpoints (API + reader page)
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/feeds", get(api_handlers::list_feeds))
        .route("/feeds/:index/load", post(api_handlers::load_feed))
        .route("/entries", get(api_handlers::get_entries))
        .route("/menu", get(api_handlers::get_menu))
        .route("/menu/toggle", post(api_handlers::toggle_menu))
        .with_state(state.clone());

    let web_routes = Router::new()
        .route("/", get(web_handlers::index))
        .route("/feeds/:index", get(web_handlers::select_feed))
        .route("/menu/toggle", post(web_handlers::toggle_menu))
        .with_state(state);

    Router::new()
        .merge(web_routes)
        .route("/health", get(api_handlers::health_check))
        .nest("/api", api_routes)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
