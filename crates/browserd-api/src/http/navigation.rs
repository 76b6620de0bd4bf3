//! Navigation handlers.

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use browserd_browser::actions;

use super::ok;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub url: String,
}

pub async fn navigate(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<NavigateRequest>,
) -> ApiResult {
    let url = actions::normalize_url(&req.url)?;
    let mut session = state.manager().acquire().await?;
    ok(actions::navigate(&mut session, &url).await?)
}

pub async fn url(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    let info = actions::page_info(&mut session).await?;
    ok(json!({"url": info.url}))
}

pub async fn title(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    let info = actions::page_info(&mut session).await?;
    ok(json!({"title": info.title}))
}

pub async fn back(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    ok(actions::back(&mut session).await?)
}

pub async fn forward(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    ok(actions::forward(&mut session).await?)
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    ok(actions::refresh(&mut session).await?)
}
