//! Interaction handlers: click, type, press, scroll and hover.

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;

use browserd_browser::actions::{self, ExecutionMode};

use super::{await_element, ok, parse_selector};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub selector: String,
    #[serde(default)]
    pub by_js: bool,
    #[serde(default)]
    pub timeout: f64,
}

#[derive(Debug, Deserialize)]
pub struct TypeRequest {
    pub selector: String,
    pub text: String,
    #[serde(default = "default_true")]
    pub clear: bool,
    #[serde(default)]
    pub by_js: bool,
    #[serde(default)]
    pub timeout: f64,
}

#[derive(Debug, Deserialize)]
pub struct PressRequest {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct ScrollRequest {
    #[serde(default)]
    pub delta_x: f64,
    #[serde(default = "default_delta_y")]
    pub delta_y: f64,
}

#[derive(Debug, Deserialize)]
pub struct HoverRequest {
    pub selector: String,
    #[serde(default)]
    pub timeout: f64,
}

fn default_true() -> bool {
    true
}

fn default_delta_y() -> f64 {
    500.0
}

pub async fn click(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ClickRequest>,
) -> ApiResult {
    let selector = parse_selector(&req.selector)?;
    await_element(&state, &selector, req.timeout).await?;
    let mut session = state.manager().acquire().await?;
    actions::click(&mut session, &selector, ExecutionMode::from_by_js(req.by_js)).await?;
    ok(())
}

pub async fn type_text(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<TypeRequest>,
) -> ApiResult {
    let selector = parse_selector(&req.selector)?;
    await_element(&state, &selector, req.timeout).await?;
    let mut session = state.manager().acquire().await?;
    actions::type_text(
        &mut session,
        &selector,
        &req.text,
        req.clear,
        ExecutionMode::from_by_js(req.by_js),
    )
    .await?;
    ok(())
}

pub async fn press(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PressRequest>,
) -> ApiResult {
    if req.key.is_empty() {
        return Err(ApiError::invalid_request("key must not be empty"));
    }
    let mut session = state.manager().acquire().await?;
    actions::press(&mut session, &req.key).await?;
    ok(())
}

pub async fn scroll(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ScrollRequest>,
) -> ApiResult {
    if !req.delta_x.is_finite() || !req.delta_y.is_finite() {
        return Err(ApiError::invalid_request("scroll deltas must be finite numbers"));
    }
    let mut session = state.manager().acquire().await?;
    ok(actions::scroll(&mut session, req.delta_x, req.delta_y).await?)
}

pub async fn hover(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<HoverRequest>,
) -> ApiResult {
    let selector = parse_selector(&req.selector)?;
    await_element(&state, &selector, req.timeout).await?;
    let mut session = state.manager().acquire().await?;
    actions::hover(&mut session, &selector).await?;
    ok(())
}
