//! Navigation operations for CDP page session.

use std::time::{Duration, Instant};

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const LOAD_POLL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Navigate to URL and wait for the new document to become interactive.
    pub async fn navigate(&self, url: &str) -> Result<(), CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(|e| e.as_str()) {
            return Err(CdpError::NavigationFailed(format!("{}: {}", url, error)));
        }

        // Same-document navigations carry no loaderId.
        let loader_id = result["loaderId"].as_str().map(str::to_string);
        self.wait_for_load(loader_id.as_deref()).await?;

        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Wait until the main frame has committed `loader_id` (when given) and
    /// its document is at least interactive.
    ///
    /// Context-lost errors are expected while the old document is torn down
    /// and are retried.
    pub async fn wait_for_load(&self, loader_id: Option<&str>) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            let committed = match loader_id {
                Some(expected) => self.loader_id().await? == expected,
                None => true,
            };

            if committed {
                match self.evaluate("document.readyState").await {
                    Ok(state) => {
                        if matches!(state.as_str(), Some("complete") | Some("interactive")) {
                            return Ok(());
                        }
                    }
                    Err(e) if e.is_context_lost() => {}
                    Err(e) => return Err(e),
                }
            }

            if start.elapsed() > LOAD_TIMEOUT {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(LOAD_POLL).await;
        }
    }

    /// Reload page.
    pub async fn reload(&self) -> Result<(), CdpError> {
        let before = self.loader_id().await?;
        self.call("Page.reload", None).await?;
        self.wait_for_new_document(&before).await
    }

    /// Go back one history entry. No-op at the start of history.
    pub async fn go_back(&self) -> Result<(), CdpError> {
        self.step_history(-1).await
    }

    /// Go forward one history entry. No-op at the end of history.
    pub async fn go_forward(&self) -> Result<(), CdpError> {
        self.step_history(1).await
    }

    async fn step_history(&self, delta: i64) -> Result<(), CdpError> {
        let history = self.call("Page.getNavigationHistory", None).await?;
        let current_index = history["currentIndex"].as_i64().unwrap_or(0);
        let target = current_index + delta;

        let Some(entries) = history["entries"].as_array() else {
            return Ok(());
        };
        if target < 0 {
            return Ok(());
        }
        let Some(entry) = entries.get(target as usize) else {
            return Ok(());
        };

        let before = self.loader_id().await?;
        let entry_id = entry["id"].as_i64().unwrap_or(0);
        self.call(
            "Page.navigateToHistoryEntry",
            Some(json!({"entryId": entry_id})),
        )
        .await?;
        self.wait_for_new_document(&before).await
    }

    /// Wait for a document other than `previous` to load. Back/forward cache
    /// restores and same-document entries keep the loader, so a short grace
    /// period falls back to a plain readiness check.
    async fn wait_for_new_document(&self, previous: &str) -> Result<(), CdpError> {
        let grace = Instant::now();
        while grace.elapsed() < Duration::from_secs(2) {
            match self.loader_id().await {
                Ok(current) if current != previous => break,
                Ok(_) => {}
                Err(e) if e.is_context_lost() => {}
                Err(e) => return Err(e),
            }
            tokio::time::sleep(LOAD_POLL).await;
        }
        self.wait_for_load(None).await
    }

    /// Loader id of the main frame's current document.
    pub async fn loader_id(&self) -> Result<String, CdpError> {
        let tree = self.call("Page.getFrameTree", None).await?;
        tree["frameTree"]["frame"]["loaderId"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CdpError::InvalidResponse("Missing loaderId".to_string()))
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Get page title.
    pub async fn get_title(&self) -> Result<String, CdpError> {
        let result = self.evaluate("document.title").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}
