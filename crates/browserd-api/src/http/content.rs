//! Page content handlers: text, snapshot and element reads.

use std::sync::Arc;

use axum::extract::{Query, State, rejection::QueryRejection};
use serde::Deserialize;
use serde_json::json;

use browserd_browser::{actions, snapshot};

use super::{await_element, ok, parse_selector};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

/// Body of single-element reads and element actions.
#[derive(Debug, Deserialize)]
pub struct SelectorRequest {
    pub selector: String,
    /// Seconds to wait for the element to exist. Zero looks once.
    #[serde(default)]
    pub timeout: f64,
}

#[derive(Debug, Deserialize)]
pub struct MultiSelectorRequest {
    pub selector: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Default, Deserialize)]
pub struct SnapshotParams {
    pub max_length: Option<usize>,
}

pub async fn text(State(state): State<Arc<AppState>>) -> ApiResult {
    let max_length = state.config().snapshot.text_max_length;
    let mut session = state.manager().acquire().await?;
    ok(snapshot::page_text(&mut session, max_length).await?)
}

pub async fn snapshot(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SnapshotParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = params.map_err(|e| ApiError::invalid_request(e.body_text()))?;
    let max_length = params
        .max_length
        .unwrap_or(state.config().snapshot.default_max_length);
    if max_length == 0 {
        return Err(ApiError::invalid_request("max_length must be positive"));
    }

    let mut session = state.manager().acquire().await?;
    ok(snapshot::snapshot(&mut session, max_length).await?)
}

pub async fn element_text(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SelectorRequest>,
) -> ApiResult {
    let selector = parse_selector(&req.selector)?;
    await_element(&state, &selector, req.timeout).await?;
    let mut session = state.manager().acquire().await?;
    ok(actions::element_text(&mut session, &selector).await?)
}

pub async fn element_html(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SelectorRequest>,
) -> ApiResult {
    let selector = parse_selector(&req.selector)?;
    await_element(&state, &selector, req.timeout).await?;
    let mut session = state.manager().acquire().await?;
    ok(actions::element_html(&mut session, &selector).await?)
}

pub async fn elements_text(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<MultiSelectorRequest>,
) -> ApiResult {
    let selector = parse_selector(&req.selector)?;
    let mut session = state.manager().acquire().await?;
    let elements = actions::elements_text(&mut session, &selector, req.limit).await?;
    let count = elements.len();
    ok(json!({"elements": elements, "count": count}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_request_defaults() {
        let req: SelectorRequest = serde_json::from_str(r##"{"selector": "#q"}"##).unwrap();
        assert_eq!(req.timeout, 0.0);

        let req: MultiSelectorRequest = serde_json::from_str(r#"{"selector": "tag:li"}"#).unwrap();
        assert_eq!(req.limit, 50);
    }
}
