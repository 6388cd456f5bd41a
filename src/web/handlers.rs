use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
};
use tracing::debug;

use crate::{api::handlers::AppState, Result};

const DEFAULT_HEADER_TITLE: &str = "Feeds";

/// Reader page template
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    header_title: String,
    body_class: String,
    menu_transform: &'static str,
    feeds: Vec<FeedLink>,
    feed_html: String,
}

#[allow(dead_code)] // Fields are used by Askama templates
struct FeedLink {
    index: usize,
    name: String,
}

/// GET / - The reader page
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let rendered = state.page.entries().snapshot();
    let menu = state.page.menu();

    let feeds = state
        .page
        .registry()
        .iter()
        .enumerate()
        .map(|(index, feed)| FeedLink {
            index,
            name: feed.name.clone(),
        })
        .collect();

    let template = IndexTemplate {
        header_title: rendered
            .title
            .unwrap_or_else(|| DEFAULT_HEADER_TITLE.to_string()),
        body_class: menu.body_class,
        menu_transform: menu.transform,
        feeds,
        feed_html: rendered.html,
    };

    Ok(Html(template.render()?))
}

/// GET /feeds/:index - Pick a feed from the menu
pub async fn select_feed(State(state): State<AppState>, Path(index): Path<usize>) -> Redirect {
    let outcome = state.page.select_feed(index).await;
    debug!("Feed selection finished: {:?}", outcome);
    Redirect::to("/")
}

/// POST /menu/toggle - Menu icon activation
pub async fn toggle_menu(State(state): State<AppState>) -> Redirect {
    state.page.toggle_menu();
    Redirect::to("/")
}
