//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub wait: WaitConfig,

    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    18850
}

/// Browser process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Explicit Chrome/Chromium binary. Empty means auto-detect.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Remote debugging port the browser is launched with.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Root directory for the user profile, screenshots and logs.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Outbound proxy, e.g. `socks5://127.0.0.1:18870`.
    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub headless: bool,

    #[serde(default = "default_launch_timeout")]
    pub launch_timeout_secs: u64,

    /// Additional command line switches appended at launch.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            debug_port: default_debug_port(),
            data_dir: default_data_dir(),
            proxy: None,
            headless: false,
            launch_timeout_secs: default_launch_timeout(),
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    /// Persistent user-data directory so cookies and logins survive restarts.
    pub fn user_data_dir(&self) -> PathBuf {
        self.data_dir.join("user-data")
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Fixed location the latest screenshot is written to.
    pub fn screenshot_path(&self) -> PathBuf {
        self.data_dir.join("screenshot.png")
    }

    /// CDP HTTP endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }

    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs)
    }

    /// Configured browser binary with empty paths treated as unset.
    pub fn chrome_path(&self) -> Option<&std::path::Path> {
        self.chrome_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Proxy with empty strings treated as unset.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

fn default_debug_port() -> u16 {
    18860
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".browserd")
}

fn default_launch_timeout() -> u64 {
    15
}

/// Wait engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Server-enforced ceiling for every caller supplied timeout.
    #[serde(default = "default_max_timeout")]
    pub max_timeout_secs: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_timeout_secs: default_max_timeout(),
        }
    }
}

impl WaitConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_timeout(&self) -> Duration {
        Duration::from_secs(self.max_timeout_secs)
    }
}

fn default_poll_interval() -> u64 {
    300
}

fn default_max_timeout() -> u64 {
    300
}

/// Snapshot and page text limits, in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_length")]
    pub default_max_length: usize,

    #[serde(default = "default_text_length")]
    pub text_max_length: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            default_max_length: default_snapshot_length(),
            text_max_length: default_text_length(),
        }
    }
}

fn default_snapshot_length() -> usize {
    80_000
}

fn default_text_length() -> usize {
    50_000
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
