//! HTTP surface: routes, handlers and response helpers.

pub mod routes;

pub(crate) mod content;
pub(crate) mod health;
pub(crate) mod interaction;
pub(crate) mod navigation;
pub(crate) mod page;
pub(crate) mod tabs;
pub(crate) mod waiting;

use axum::Json;
use serde::Serialize;
use serde_json::{Value, json};

use browserd_browser::wait::{ElementState, WaitCondition, WaitOutcome};
use browserd_browser::{BrowserError, Selector};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Success body: the fields of `data` plus `"ok": true`.
pub(crate) fn ok<T: Serialize>(data: T) -> ApiResult {
    let value = serde_json::to_value(data).map_err(|e| ApiError::internal(e.to_string()))?;
    let body = match value {
        Value::Object(mut map) => {
            map.insert("ok".to_string(), Value::Bool(true));
            Value::Object(map)
        }
        Value::Null => json!({"ok": true}),
        other => json!({"ok": true, "data": other}),
    };
    Ok(Json(body))
}

pub(crate) fn parse_selector(raw: &str) -> Result<Selector, ApiError> {
    if raw.trim().is_empty() {
        return Err(ApiError::invalid_request("selector must not be empty"));
    }
    Ok(Selector::parse(raw))
}

/// With a positive lookup timeout, wait for the selector to exist first.
/// Expiry is reported as `ElementNotFound`.
pub(crate) async fn await_element(
    state: &AppState,
    selector: &Selector,
    timeout_secs: f64,
) -> Result<(), ApiError> {
    let timeout = state.waits().clamp_secs(timeout_secs);
    if timeout.is_zero() {
        return Ok(());
    }

    let condition = WaitCondition::Element {
        selector: selector.clone(),
        state: ElementState::Exists,
    };
    match state.waits().wait(state.manager(), &condition, timeout).await? {
        WaitOutcome::Satisfied => Ok(()),
        WaitOutcome::TimedOut => Err(BrowserError::ElementNotFound(format!(
            "{} (waited {:.1}s)",
            selector,
            timeout.as_secs_f64()
        ))
        .into()),
    }
}
