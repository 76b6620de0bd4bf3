//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{content, health, interaction, navigation, page, tabs, waiting};
use crate::state::AppState;

/// Build the router.
///
/// ## Route Structure
///
/// ```text
/// POST /navigate, GET /url, POST /back, /forward, /refresh
/// GET  /title, /text, /snapshot?max_length=N
/// POST /element/text, /element/html, /elements/text
/// POST /click, /type, /press, /scroll, /hover
/// POST /wait/element, /wait/text, /wait/url, /wait/time
/// POST /screenshot, /evaluate
/// GET  /cookies, POST /cookies/set, /cookies/clear
/// GET  /browser/tabs
/// POST /browser/new-tab, /browser/switch-tab, /browser/close-tab, /browser/restart
/// GET  /status
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Navigation
        .route("/navigate", post(navigation::navigate))
        .route("/url", get(navigation::url))
        .route("/back", post(navigation::back))
        .route("/forward", post(navigation::forward))
        .route("/refresh", post(navigation::refresh))
        // Content
        .route("/title", get(navigation::title))
        .route("/text", get(content::text))
        .route("/snapshot", get(content::snapshot))
        .route("/element/text", post(content::element_text))
        .route("/element/html", post(content::element_html))
        .route("/elements/text", post(content::elements_text))
        // Interaction
        .route("/click", post(interaction::click))
        .route("/type", post(interaction::type_text))
        .route("/press", post(interaction::press))
        .route("/scroll", post(interaction::scroll))
        .route("/hover", post(interaction::hover))
        // Waiting
        .route("/wait/element", post(waiting::wait_element))
        .route("/wait/text", post(waiting::wait_text))
        .route("/wait/url", post(waiting::wait_url))
        .route("/wait/time", post(waiting::wait_time))
        // Visual and script
        .route("/screenshot", post(page::screenshot))
        .route("/evaluate", post(page::evaluate))
        // Cookies
        .route("/cookies", get(page::get_cookies))
        .route("/cookies/set", post(page::set_cookies))
        .route("/cookies/clear", post(page::clear_cookies))
        // Tabs
        .route("/browser/tabs", get(tabs::list))
        .route("/browser/new-tab", post(tabs::new_tab))
        .route("/browser/switch-tab", post(tabs::switch_tab))
        .route("/browser/close-tab", post(tabs::close_tab))
        .route("/browser/restart", post(tabs::restart))
        // Health
        .route("/status", get(health::status))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn count_requests(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    state.record_request();
    next.run(request).await
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
