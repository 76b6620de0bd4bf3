//! Translation of domain errors into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, warn};

use browserd_browser::{BrowserError, ErrorKind};

/// Handler result carrying a JSON body.
pub type ApiResult = Result<Json<Value>, ApiError>;

/// A failed request: machine-readable kind plus message.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::ElementNotFound => StatusCode::NOT_FOUND,
            ErrorKind::TabIndexError
            | ErrorKind::LastTab
            | ErrorKind::NotEditable
            | ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::StaleContext => StatusCode::CONFLICT,
            ErrorKind::TimedOut => StatusCode::REQUEST_TIMEOUT,
            ErrorKind::ScriptError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::LaunchError => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::NavigationError | ErrorKind::ActionFailed | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<BrowserError> for ApiError {
    fn from(e: BrowserError) -> Self {
        Self::new(e.kind(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = %self.kind, "Request failed: {}", self.message);
        } else {
            warn!(kind = %self.kind, "Request rejected: {}", self.message);
        }

        let body = Json(json!({
            "ok": false,
            "kind": self.kind.as_str(),
            "error": self.message,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorKind::ElementNotFound, 404),
            (ErrorKind::TabIndexError, 400),
            (ErrorKind::LastTab, 400),
            (ErrorKind::NotEditable, 400),
            (ErrorKind::InvalidRequest, 400),
            (ErrorKind::StaleContext, 409),
            (ErrorKind::TimedOut, 408),
            (ErrorKind::ScriptError, 422),
            (ErrorKind::LaunchError, 503),
            (ErrorKind::NavigationError, 500),
            (ErrorKind::Internal, 500),
        ];
        for (kind, code) in cases {
            assert_eq!(ApiError::new(kind, "x").status().as_u16(), code, "{}", kind);
        }
    }

    #[test]
    fn test_from_browser_error() {
        let err: ApiError = BrowserError::TabIndex { index: 5, count: 1 }.into();
        assert_eq!(err.kind, ErrorKind::TabIndexError);
        assert!(err.message.contains("5"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = BrowserError::ElementNotFound("text:Log in".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.message.contains("text:Log in"));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::new(ErrorKind::ScriptError, "boom").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["kind"], "ScriptError");
        assert_eq!(body["error"], "boom");
    }
}
