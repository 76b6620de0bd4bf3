//! Application state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use browserd_browser::{SessionManager, WaitEngine};
use browserd_config::Config;

/// State shared across handlers.
pub struct AppState {
    config: Config,
    manager: Arc<SessionManager>,
    waits: WaitEngine,
    started_at: DateTime<Utc>,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let manager = Arc::new(SessionManager::new(config.browser.clone()));
        Self::with_manager(config, manager)
    }

    pub fn with_manager(config: Config, manager: Arc<SessionManager>) -> Self {
        Self {
            waits: WaitEngine::new(&config.wait),
            config,
            manager,
            started_at: Utc::now(),
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    pub fn waits(&self) -> &WaitEngine {
        &self.waits
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn record_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}
