//! Page-level actions: scroll, script evaluation and screenshots.

use std::path::Path;
use std::sync::LazyLock;

use base64::Engine;
use serde::{Deserialize, Serialize};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::BrowserError;
use crate::session::Session;

static RETURN_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\breturn\b").expect("Invalid regex"));

/// Window scroll offset after a scroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

/// A stored screenshot.
#[derive(Debug, Clone, Serialize)]
pub struct Screenshot {
    pub path: String,
    pub base64: String,
    pub format: &'static str,
    pub bytes: usize,
}

/// Scroll the viewport. Offsets past the page bounds are clamped by the page.
pub async fn scroll(
    session: &mut Session,
    delta_x: f64,
    delta_y: f64,
) -> Result<ScrollPosition, BrowserError> {
    let page = session.current_page().await?;
    page.scroll_by(delta_x, delta_y).await?;
    let value = page
        .evaluate("({ x: window.scrollX, y: window.scrollY })")
        .await?;
    scroll_position(value)
}

fn scroll_position(value: Value) -> Result<ScrollPosition, BrowserError> {
    serde_json::from_value(value)
        .map_err(|e| BrowserError::ActionFailed(format!("unexpected scroll position: {}", e)))
}

/// Scripts with a `return` statement run as an async function body,
/// anything else is evaluated as an expression.
pub fn wrap_script(script: &str) -> String {
    if RETURN_STATEMENT.is_match(script) {
        format!("(async function() {{\n{}\n}})()", script)
    } else {
        script.to_string()
    }
}

/// Run a script in the page and return its JSON value.
pub async fn evaluate(session: &mut Session, script: &str) -> Result<Value, BrowserError> {
    if script.trim().is_empty() {
        return Err(BrowserError::InvalidInput("script must not be empty".to_string()));
    }
    let page = session.current_page().await?;
    let value = page.evaluate(&wrap_script(script)).await?;
    debug!("Evaluated script ({} chars)", script.len());
    Ok(value)
}

/// Capture a PNG of the active tab and store it at `path`, replacing any previous one.
pub async fn screenshot(
    session: &mut Session,
    path: &Path,
    full_page: bool,
) -> Result<Screenshot, BrowserError> {
    let page = session.current_page().await?;
    let data = page.screenshot(full_page).await?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&data)
        .map_err(|e| BrowserError::ActionFailed(format!("invalid screenshot data: {}", e)))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &bytes).await?;
    info!("Saved screenshot ({} bytes) to {}", bytes.len(), path.display());

    Ok(Screenshot {
        path: path.display().to_string(),
        base64: data,
        format: "png",
        bytes: bytes.len(),
    })
}
