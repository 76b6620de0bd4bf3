//! Tab and browser lifecycle handlers.

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use browserd_browser::actions;

use super::ok;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NewTabRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchTabRequest {
    pub index: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct CloseTabRequest {
    /// Tab to close; the active tab when absent.
    #[serde(default)]
    pub index: Option<usize>,
}

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    let tabs = session.list_tabs().await?;
    let count = tabs.len();
    let active = session.active_index();
    ok(json!({"tabs": tabs, "count": count, "active": active}))
}

pub async fn new_tab(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<NewTabRequest>,
) -> ApiResult {
    let url = req.url.as_deref().map(actions::normalize_url).transpose()?;
    let mut session = state.manager().acquire().await?;
    let tab = session.new_tab(url.as_deref()).await?;
    ok(json!({"tab": tab}))
}

pub async fn switch_tab(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SwitchTabRequest>,
) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    let tab = session.switch_tab(req.index).await?;
    ok(json!({"tab": tab}))
}

pub async fn close_tab(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CloseTabRequest>,
) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    ok(session.close_tab(req.index).await?)
}

pub async fn restart(State(state): State<Arc<AppState>>) -> ApiResult {
    let generation = state.manager().restart().await?;
    info!("Browser restarted via API, generation {}", generation);
    ok(json!({"message": "Browser restarted", "generation": generation}))
}
