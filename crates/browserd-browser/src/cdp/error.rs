//! CDP error types.

use thiserror::Error;

/// Transport and protocol level failures.
#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Nothing answers on the debugging endpoint.
    #[error("Browser not available at {0}")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// An in-page script threw.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// The socket went away while a command was in flight.
    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CdpError {
    /// Whether the error means a remote object or execution context no longer
    /// exists, which happens after the page navigated away.
    pub fn is_context_lost(&self) -> bool {
        const MARKERS: [&str; 5] = [
            "Cannot find context with specified id",
            "Could not find object with given id",
            "Execution context was destroyed",
            "No node with given id",
            "Inspected target navigated or closed",
        ];
        match self {
            CdpError::Protocol { message, .. } | CdpError::JavaScript(message) => {
                MARKERS.iter().any(|m| message.contains(m))
            }
            _ => false,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_lost_detection() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "Could not find object with given id".to_string(),
        };
        assert!(err.is_context_lost());

        let err = CdpError::JavaScript("Execution context was destroyed.".to_string());
        assert!(err.is_context_lost());

        let err = CdpError::Protocol {
            code: -32602,
            message: "Invalid parameters".to_string(),
        };
        assert!(!err.is_context_lost());
        assert!(!CdpError::SessionClosed.is_context_lost());
    }

    #[test]
    fn test_display() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "CDP error: boom (code: -32000)");
    }
}
