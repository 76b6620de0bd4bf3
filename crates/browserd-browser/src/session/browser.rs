//! The live browser session.

use std::sync::Arc;
use std::time::Duration;

use browserd_config::BrowserConfig;
use tokio::process::Child;
use tracing::{debug, info, warn};

use crate::cdp::{CdpClient, PageSession};
use crate::error::BrowserError;
use crate::selector::{ElementHandle, PageContext};

use super::launch;

/// One open tab. The page session is attached on first use.
pub(super) struct Tab {
    pub(super) target_id: String,
    pub(super) page: Option<Arc<PageSession>>,
}

impl Tab {
    pub(super) fn new(target_id: String) -> Self {
        Self {
            target_id,
            page: None,
        }
    }
}

/// The single owned browser process, its CDP connection and tab set.
pub struct Session {
    pub(super) client: CdpClient,
    /// Process handle, absent when an already running browser was adopted.
    pub(super) chrome: Option<Child>,
    pub(super) tabs: Vec<Tab>,
    pub(super) active: usize,
    pub(super) generation: u64,
    pub(super) proxy: Option<String>,
}

impl Session {
    /// Start the browser (or adopt one already listening on the debug port),
    /// connect, and load the tab set.
    pub(crate) async fn launch(
        config: &BrowserConfig,
        proxy: Option<String>,
        generation: u64,
    ) -> Result<Self, BrowserError> {
        let endpoint = config.endpoint();

        let chrome = if launch::is_endpoint_up(&endpoint).await {
            warn!(
                "A browser is already listening on port {}, adopting it; launch flags are not applied",
                config.debug_port
            );
            None
        } else {
            let mut child = launch::spawn(config, proxy.as_deref())?;
            if let Err(e) = launch::wait_until_ready(&endpoint, &mut child, config.launch_timeout()).await {
                let _ = child.kill().await;
                return Err(e);
            }
            Some(child)
        };

        let client = match CdpClient::connect(&endpoint).await {
            Ok(client) => client,
            Err(e) => {
                if let Some(mut child) = chrome {
                    let _ = child.kill().await;
                }
                return Err(BrowserError::LaunchFailed(e.to_string()));
            }
        };

        let mut session = Self {
            client,
            chrome,
            tabs: Vec::new(),
            active: 0,
            generation,
            proxy,
        };

        if let Err(e) = session.sync_tabs().await {
            session.close().await;
            return Err(BrowserError::LaunchFailed(e.to_string()));
        }

        info!(
            "Browser session {} ready at {} with {} tab(s)",
            generation,
            endpoint,
            session.tabs.len()
        );
        Ok(session)
    }

    /// Launch counter this session was created under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Proxy the browser was started with.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn client(&self) -> &CdpClient {
        &self.client
    }

    /// Index of the active tab.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// False once the CDP socket dropped or the process exited.
    pub(crate) fn is_alive(&mut self) -> bool {
        if self.client.is_closed() {
            return false;
        }
        match self.chrome.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => true,
        }
    }

    /// Page session of the active tab, attaching on first use.
    pub async fn current_page(&mut self) -> Result<Arc<PageSession>, BrowserError> {
        if self.tabs.is_empty() {
            self.sync_tabs().await?;
        }
        let index = self.active.min(self.tabs.len().saturating_sub(1));
        let Some(tab) = self.tabs.get(index) else {
            return Err(BrowserError::StaleContext("no open tab".to_string()));
        };
        if let Some(page) = &tab.page {
            return Ok(page.clone());
        }
        let target_id = tab.target_id.clone();

        debug!("Attaching to tab {}", target_id);
        let page = match self.client.attach_page(&target_id).await {
            Ok(page) => Arc::new(page),
            Err(e) => {
                // The tab may have been closed from the page itself.
                self.sync_tabs().await?;
                return Err(BrowserError::StaleContext(format!("active tab unavailable: {}", e)));
            }
        };
        if let Some(tab) = self.tabs.get_mut(index) {
            tab.page = Some(page.clone());
        }
        Ok(page)
    }

    /// Identity of the document currently shown in the active tab.
    pub async fn page_context(&mut self) -> Result<PageContext, BrowserError> {
        let page = self.current_page().await?;
        let loader_id = page.loader_id().await?;
        Ok(PageContext {
            generation: self.generation,
            target_id: page.target_id().to_string(),
            loader_id,
        })
    }

    /// Fail with `StaleContext` unless the handle belongs to the current document.
    pub async fn validate(&mut self, handle: &ElementHandle) -> Result<(), BrowserError> {
        self.page_context().await?.check(handle)
    }

    /// Close the connection, and the browser when this session started it.
    /// An adopted browser keeps running.
    pub(crate) async fn close(mut self) {
        if let Some(mut child) = self.chrome.take() {
            let _ = tokio::time::timeout(
                Duration::from_secs(2),
                self.client.call("Browser.close", None),
            )
            .await;

            match tokio::time::timeout(Duration::from_secs(3), child.wait()).await {
                Ok(_) => {}
                Err(_) => {
                    warn!("Browser did not exit after Browser.close, killing it");
                    let _ = child.kill().await;
                }
            }
        }
        info!("Browser session {} closed", self.generation);
    }
}

#[cfg(test)]
#[path = "browser_tests.rs"]
mod tests;
