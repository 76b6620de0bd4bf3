//! Domain error taxonomy.

use thiserror::Error;

use crate::cdp::CdpError;

/// Machine-readable error kind reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ElementNotFound,
    NotEditable,
    TabIndexError,
    LastTab,
    StaleContext,
    LaunchError,
    TimedOut,
    ScriptError,
    InvalidRequest,
    NavigationError,
    ActionFailed,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ElementNotFound => "ElementNotFound",
            ErrorKind::NotEditable => "NotEditable",
            ErrorKind::TabIndexError => "TabIndexError",
            ErrorKind::LastTab => "LastTab",
            ErrorKind::StaleContext => "StaleContext",
            ErrorKind::LaunchError => "LaunchError",
            ErrorKind::TimedOut => "TimedOut",
            ErrorKind::ScriptError => "ScriptError",
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::NavigationError => "NavigationError",
            ErrorKind::ActionFailed => "ActionFailed",
            ErrorKind::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browser operation errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("No element matches selector: {0}")]
    ElementNotFound(String),

    #[error("Element is not editable: {0}")]
    NotEditable(String),

    #[error("Tab index {index} out of range ({count} tabs open)")]
    TabIndex { index: usize, count: usize },

    #[error("Cannot close the last remaining tab")]
    LastTab,

    #[error("Stale context: {0}")]
    StaleContext(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("No Chrome or Chromium binary found. Set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Timed out: {0}")]
    TimedOut(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cdp(CdpError),
}

impl BrowserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrowserError::ElementNotFound(_) => ErrorKind::ElementNotFound,
            BrowserError::NotEditable(_) => ErrorKind::NotEditable,
            BrowserError::TabIndex { .. } => ErrorKind::TabIndexError,
            BrowserError::LastTab => ErrorKind::LastTab,
            BrowserError::StaleContext(_) => ErrorKind::StaleContext,
            BrowserError::LaunchFailed(_) | BrowserError::ChromeNotFound => ErrorKind::LaunchError,
            BrowserError::TimedOut(_) => ErrorKind::TimedOut,
            BrowserError::Script(_) => ErrorKind::ScriptError,
            BrowserError::InvalidSelector(_) | BrowserError::InvalidInput(_) => {
                ErrorKind::InvalidRequest
            }
            BrowserError::Navigation(_) => ErrorKind::NavigationError,
            BrowserError::ActionFailed(_) => ErrorKind::ActionFailed,
            BrowserError::Io(_) | BrowserError::Cdp(_) => ErrorKind::Internal,
        }
    }
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        if e.is_context_lost() {
            return BrowserError::StaleContext(e.to_string());
        }
        match e {
            CdpError::ConnectionFailed(msg) | CdpError::ChromeNotAvailable(msg) => {
                BrowserError::LaunchFailed(msg)
            }
            CdpError::SessionClosed => {
                BrowserError::StaleContext("browser session closed".to_string())
            }
            CdpError::NavigationFailed(msg) => BrowserError::Navigation(msg),
            CdpError::JavaScript(msg) => BrowserError::Script(msg),
            CdpError::Timeout(msg) => BrowserError::TimedOut(msg),
            other => BrowserError::Cdp(other),
        }
    }
}
