//! Screenshot, script and cookie handlers.

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use browserd_browser::actions;
use browserd_browser::cdp::CookieParam;

use super::ok;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScreenshotRequest {
    #[serde(default = "default_true")]
    pub full_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub script: String,
}

#[derive(Debug, Deserialize)]
pub struct CookieSetRequest {
    pub cookies: Vec<CookieParam>,
}

fn default_true() -> bool {
    true
}

pub async fn screenshot(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ScreenshotRequest>,
) -> ApiResult {
    let path = state.config().browser.screenshot_path();
    let mut session = state.manager().acquire().await?;
    ok(actions::screenshot(&mut session, &path, req.full_page).await?)
}

pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<EvaluateRequest>,
) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    let result = actions::evaluate(&mut session, &req.script).await?;
    ok(json!({"result": result}))
}

pub async fn get_cookies(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    let cookies = actions::get_cookies(&mut session).await?;
    let count = cookies.len();
    ok(json!({"cookies": cookies, "count": count}))
}

pub async fn set_cookies(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CookieSetRequest>,
) -> ApiResult {
    if req.cookies.is_empty() {
        return Err(ApiError::invalid_request("cookies must not be empty"));
    }
    let mut session = state.manager().acquire().await?;
    let count = actions::set_cookies(&mut session, req.cookies).await?;
    ok(json!({"count": count}))
}

pub async fn clear_cookies(State(state): State<Arc<AppState>>) -> ApiResult {
    let mut session = state.manager().acquire().await?;
    actions::clear_cookies(&mut session).await?;
    ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_defaults_to_full_page() {
        let req: ScreenshotRequest = serde_json::from_str("{}").unwrap();
        assert!(req.full_page);
    }

    #[test]
    fn test_cookie_request_uses_browser_field_names() {
        let req: CookieSetRequest = serde_json::from_str(
            r#"{"cookies": [{"name": "sid", "value": "abc", "httpOnly": true, "sameSite": "Lax"}]}"#,
        )
        .unwrap();
        assert_eq!(req.cookies[0].http_only, Some(true));
        assert_eq!(req.cookies[0].same_site.as_deref(), Some("Lax"));
        assert!(!req.cookies[0].has_scope());
    }
}
