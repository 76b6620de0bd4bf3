//! Core session struct and CDP command dispatch.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::cdp::client::Transport;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::{ScreenshotFormat, Viewport};

/// A flattened session attached to a single page target.
pub struct PageSession {
    pub(super) target_id: String,
    pub(super) session_id: String,
    /// Socket shared with the owning client.
    pub(super) transport: Arc<Transport>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, transport: Arc<Transport>) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Enable the domains the session relies on.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Capture a PNG, optionally of the whole scrollable page. Returns base64 data.
    pub async fn screenshot(&self, full_page: bool) -> Result<String, CdpError> {
        let mut params = json!({
            "format": ScreenshotFormat::Png,
            "captureBeyondViewport": full_page,
        });

        if full_page {
            let metrics = self.call("Page.getLayoutMetrics", None).await?;
            let size = if metrics["cssContentSize"].is_object() {
                &metrics["cssContentSize"]
            } else {
                &metrics["contentSize"]
            };
            let width = size["width"].as_f64().unwrap_or(0.0);
            let height = size["height"].as_f64().unwrap_or(0.0);
            if width > 0.0 && height > 0.0 {
                let clip = Viewport {
                    x: 0.0,
                    y: 0.0,
                    width: width.ceil(),
                    height: height.ceil(),
                    scale: 1.0,
                };
                params["clip"] = serde_json::to_value(clip)?;
            }
        }

        let result = self.call("Page.captureScreenshot", Some(params)).await?;

        result["data"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))
    }
}
