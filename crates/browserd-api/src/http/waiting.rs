//! Wait handlers. The session lock is taken per poll, never for the whole wait.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use browserd_browser::actions;
use browserd_browser::wait::{ElementState, UrlMatch, WaitCondition, WaitOutcome};
use browserd_browser::BrowserError;

use super::{ok, parse_selector};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WaitElementRequest {
    pub selector: String,
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WaitTextRequest {
    pub text: String,
    #[serde(default = "default_timeout")]
    pub timeout: f64,
}

#[derive(Debug, Deserialize)]
pub struct WaitUrlRequest {
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    #[serde(default = "default_true")]
    pub contains: bool,
}

#[derive(Debug, Deserialize)]
pub struct WaitTimeRequest {
    pub seconds: f64,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_true() -> bool {
    true
}

/// Run a wait and turn expiry into a `TimedOut` error.
async fn run(state: &AppState, condition: &WaitCondition, timeout_secs: f64) -> Result<Duration, ApiError> {
    let timeout = state.waits().clamp_secs(timeout_secs);
    match state.waits().wait(state.manager(), condition, timeout).await? {
        WaitOutcome::Satisfied => Ok(timeout),
        WaitOutcome::TimedOut => Err(BrowserError::TimedOut(format!(
            "{} not met within {:.1}s",
            condition.describe(),
            timeout.as_secs_f64()
        ))
        .into()),
    }
}

pub async fn wait_element(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<WaitElementRequest>,
) -> ApiResult {
    let selector = parse_selector(&req.selector)?;
    let element_state = match req.state.as_deref() {
        Some(raw) => raw.parse::<ElementState>()?,
        None => ElementState::default(),
    };

    let condition = WaitCondition::Element {
        selector,
        state: element_state,
    };
    run(&state, &condition, req.timeout).await?;
    ok(json!({"found": true, "state": element_state.as_str()}))
}

pub async fn wait_text(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<WaitTextRequest>,
) -> ApiResult {
    if req.text.is_empty() {
        return Err(ApiError::invalid_request("text must not be empty"));
    }
    run(&state, &WaitCondition::Text(req.text), req.timeout).await?;
    ok(json!({"found": true}))
}

pub async fn wait_url(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<WaitUrlRequest>,
) -> ApiResult {
    if req.url.is_empty() {
        return Err(ApiError::invalid_request("url must not be empty"));
    }
    let mode = if req.contains {
        UrlMatch::Contains
    } else {
        UrlMatch::Exact
    };
    let condition = WaitCondition::Url {
        pattern: req.url,
        mode,
    };
    run(&state, &condition, req.timeout).await?;

    let mut session = state.manager().acquire().await?;
    let info = actions::page_info(&mut session).await?;
    ok(json!({"matched": true, "url": info.url}))
}

/// Unconditional delay, clamped to the wait ceiling. Holds no lock.
pub async fn wait_time(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<WaitTimeRequest>,
) -> ApiResult {
    if !req.seconds.is_finite() || req.seconds < 0.0 {
        return Err(ApiError::invalid_request("seconds must be a non-negative number"));
    }
    let waited = state.waits().sleep(state.waits().clamp_secs(req.seconds)).await;
    ok(json!({"waited": waited.as_secs_f64()}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_request_defaults() {
        let req: WaitElementRequest = serde_json::from_str(r##"{"selector": "#done"}"##).unwrap();
        assert_eq!(req.timeout, 30.0);
        assert!(req.state.is_none());

        let req: WaitUrlRequest = serde_json::from_str(r#"{"url": "/dashboard"}"#).unwrap();
        assert!(req.contains);
        assert_eq!(req.timeout, 30.0);
    }

    #[test]
    fn test_wait_time_requires_seconds() {
        assert!(serde_json::from_str::<WaitTimeRequest>("{}").is_err());
    }
}
