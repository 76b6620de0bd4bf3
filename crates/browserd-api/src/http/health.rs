//! Health endpoint polled by process supervisors.

use std::sync::Arc;

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use browserd_browser::SessionStatus;

use super::ok;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub session: SessionStatus,
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
    pub uptime_secs: u64,
    pub requests: u64,
}

/// Never launches the browser and never waits long on a busy session.
pub async fn status(State(state): State<Arc<AppState>>) -> ApiResult {
    let session = state.manager().status().await;
    ok(StatusResponse {
        session,
        version: env!("CARGO_PKG_VERSION"),
        started_at: state.started_at(),
        uptime_secs: state.uptime().as_secs(),
        requests: state.request_count(),
    })
}
