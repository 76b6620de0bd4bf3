//! Session Manager: the lock-guarded owner of the single session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use browserd_config::BrowserConfig;
use serde::Serialize;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tracing::{error, info, warn};

use crate::error::BrowserError;

use super::browser::Session;

/// Exclusive access to the live session for one operation.
pub type SessionGuard<'a> = MappedMutexGuard<'a, Session>;

const STATUS_LOCK_WAIT: Duration = Duration::from_secs(2);
const STATUS_QUERY_WAIT: Duration = Duration::from_secs(2);

/// Coarse lifecycle state reported by `/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    Running,
    /// Another operation holds the session.
    Busy,
    Error,
}

/// Health snapshot that never launches the browser.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub browser: SessionState,
    /// Configured proxy or `"direct"`.
    pub proxy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabs: Option<usize>,
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Owns the one browser session. Every operation acquires the same lock.
pub struct SessionManager {
    config: BrowserConfig,
    inner: Mutex<Option<Session>>,
    generation: AtomicU64,
    last_error: parking_lot::Mutex<Option<String>>,
}

impl SessionManager {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(None),
            generation: AtomicU64::new(0),
            last_error: parking_lot::Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Proxy every launch uses; fixed for the manager's lifetime.
    pub fn proxy(&self) -> Option<&str> {
        self.config.proxy()
    }

    /// Number of launches so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Lock the session, launching it on first use. A session that died
    /// outside a requested restart is relaunched once.
    pub async fn acquire(&self) -> Result<SessionGuard<'_>, BrowserError> {
        let mut slot = self.inner.lock().await;
        self.ensure_live(&mut slot).await?;
        MutexGuard::try_map(slot, Option::as_mut)
            .map_err(|_| BrowserError::LaunchFailed("browser session unavailable".to_string()))
    }

    async fn ensure_live(&self, slot: &mut Option<Session>) -> Result<(), BrowserError> {
        if let Some(session) = slot.as_mut() {
            if session.is_alive() {
                return Ok(());
            }
            warn!(
                "Browser session {} died unexpectedly, relaunching",
                session.generation()
            );
            if let Some(dead) = slot.take() {
                dead.close().await;
            }
        }

        *slot = Some(self.launch().await?);
        Ok(())
    }

    async fn launch(&self) -> Result<Session, BrowserError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        match Session::launch(&self.config, self.proxy().map(str::to_string), generation).await {
            Ok(session) => {
                *self.last_error.lock() = None;
                Ok(session)
            }
            Err(e) => {
                error!("Browser launch failed: {}", e);
                *self.last_error.lock() = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Launch the browser if it is not running.
    pub async fn start(&self) -> Result<u64, BrowserError> {
        let session = self.acquire().await?;
        Ok(session.generation())
    }

    /// Tear down and relaunch with the same proxy. Handles issued before
    /// become stale because the generation changes.
    pub async fn restart(&self) -> Result<u64, BrowserError> {
        let mut slot = self.inner.lock().await;
        if let Some(old) = slot.take() {
            info!("Restarting browser session {}", old.generation());
            old.close().await;
        }

        let session = self.launch().await?;
        let generation = session.generation();
        *slot = Some(session);
        Ok(generation)
    }

    /// Close the browser, used on server stop.
    pub async fn shutdown(&self) {
        let mut slot = self.inner.lock().await;
        if let Some(session) = slot.take() {
            session.close().await;
        }
    }

    /// Report health without launching and without waiting on long operations.
    pub async fn status(&self) -> SessionStatus {
        let mut status = SessionStatus {
            browser: SessionState::NotStarted,
            proxy: self.proxy().unwrap_or("direct").to_string(),
            url: None,
            title: None,
            tabs: None,
            generation: self.generation(),
            error: self.last_error.lock().clone(),
        };

        let Ok(mut slot) = tokio::time::timeout(STATUS_LOCK_WAIT, self.inner.lock()).await else {
            status.browser = SessionState::Busy;
            return status;
        };

        let Some(session) = slot.as_mut() else {
            if status.error.is_some() {
                status.browser = SessionState::Error;
            }
            return status;
        };

        if !session.is_alive() {
            status.browser = SessionState::Error;
            status.error = Some("browser process is not responding".to_string());
            return status;
        }

        status.browser = SessionState::Running;
        status.tabs = Some(session.tabs.len());
        let page_info = tokio::time::timeout(STATUS_QUERY_WAIT, async {
            let page = session.current_page().await?;
            let url = page.get_url().await?;
            let title = page.get_title().await?;
            Ok::<_, BrowserError>((url, title))
        })
        .await;
        match page_info {
            Ok(Ok((url, title))) => {
                status.url = Some(url);
                status.title = Some(title);
            }
            Ok(Err(e)) => status.error = Some(e.to_string()),
            Err(_) => status.browser = SessionState::Busy,
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn unreachable_config() -> BrowserConfig {
        BrowserConfig {
            chrome_path: Some(PathBuf::from("/nonexistent/chrome-binary")),
            debug_port: 9,
            data_dir: std::env::temp_dir().join("browserd-manager-test"),
            launch_timeout_secs: 1,
            ..BrowserConfig::default()
        }
    }

    #[tokio::test]
    async fn test_status_not_started() {
        let manager = SessionManager::new(unreachable_config());
        let status = manager.status().await;
        assert_eq!(status.browser, SessionState::NotStarted);
        assert_eq!(status.proxy, "direct");
        assert_eq!(status.generation, 0);
        assert!(status.url.is_none());
    }

    #[tokio::test]
    async fn test_status_reports_proxy() {
        let mut config = unreachable_config();
        config.proxy = Some("socks5://127.0.0.1:18870".to_string());
        let manager = SessionManager::new(config);
        assert_eq!(manager.status().await.proxy, "socks5://127.0.0.1:18870");
    }

    #[tokio::test]
    async fn test_launch_failure_is_reported() {
        let manager = SessionManager::new(unreachable_config());
        let err = manager.start().await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::LaunchError);

        let status = manager.status().await;
        assert_eq!(status.browser, SessionState::Error);
        assert!(status.error.is_some());
        assert_eq!(status.generation, 1);
    }

    #[tokio::test]
    async fn test_restart_bumps_generation_even_on_failure() {
        let manager = SessionManager::new(unreachable_config());
        assert!(manager.restart().await.is_err());
        assert!(manager.restart().await.is_err());
        assert_eq!(manager.generation(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_without_session() {
        let manager = SessionManager::new(unreachable_config());
        manager.shutdown().await;
        assert_eq!(manager.status().await.browser, SessionState::NotStarted);
    }
}
