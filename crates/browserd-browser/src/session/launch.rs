//! Browser discovery, command line and process start.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use browserd_config::BrowserConfig;
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::cdp::CdpClient;
use crate::error::BrowserError;

const READY_POLL: Duration = Duration::from_millis(200);

/// Find a Chrome/Chromium executable in well-known locations.
pub fn find_chrome() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    let paths: &[&str] = &[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    ];

    #[cfg(target_os = "linux")]
    let paths: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        "/opt/google/chrome/chrome",
    ];

    #[cfg(target_os = "windows")]
    let paths: &[&str] = &[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let paths: &[&str] = &[];

    paths.iter().map(PathBuf::from).find(|p| p.exists())
}

/// Command line for a launch. The proxy is passed separately because it is
/// fixed for the lifetime of the manager.
pub fn launch_args(config: &BrowserConfig, proxy: Option<&str>) -> Vec<String> {
    let mut args = vec![
        format!("--remote-debugging-port={}", config.debug_port),
        format!("--user-data-dir={}", config.user_data_dir().display()),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--start-maximized".to_string(),
    ];

    if config.headless {
        args.push("--headless=new".to_string());
    }

    if let Some(proxy) = proxy {
        args.push(format!("--proxy-server={}", proxy));
    }

    args.extend(config.extra_args.iter().cloned());
    args
}

/// Whether something answers on the debugging endpoint.
pub(super) async fn is_endpoint_up(endpoint: &str) -> bool {
    CdpClient::version(endpoint).await.is_ok()
}

/// Spawn the browser process.
pub(super) fn spawn(config: &BrowserConfig, proxy: Option<&str>) -> Result<Child, BrowserError> {
    let chrome_path = match config.chrome_path() {
        Some(path) => path.to_path_buf(),
        None => find_chrome().ok_or(BrowserError::ChromeNotFound)?,
    };

    let profile_dir = config.user_data_dir();
    if let Err(e) = std::fs::create_dir_all(&profile_dir) {
        warn!("Failed to create profile directory: {}", e);
    }

    info!(
        "Launching {} with profile at {} (proxy: {})",
        chrome_path.display(),
        profile_dir.display(),
        proxy.unwrap_or("direct")
    );

    let child = Command::new(&chrome_path)
        .args(launch_args(config, proxy))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| BrowserError::LaunchFailed(format!("{}: {}", chrome_path.display(), e)))?;

    info!("Browser launched with PID: {:?}", child.id());
    Ok(child)
}

/// Poll the debugging endpoint until it answers, the process exits, or
/// `timeout` elapses.
pub(super) async fn wait_until_ready(
    endpoint: &str,
    child: &mut Child,
    timeout: Duration,
) -> Result<(), BrowserError> {
    tokio::time::timeout(timeout, poll_ready(endpoint, child))
        .await
        .map_err(|_| {
            BrowserError::LaunchFailed(format!(
                "debugging endpoint {} not ready within {}s",
                endpoint,
                timeout.as_secs()
            ))
        })?
}

async fn poll_ready(endpoint: &str, child: &mut Child) -> Result<(), BrowserError> {
    loop {
        if is_endpoint_up(endpoint).await {
            return Ok(());
        }
        if let Ok(Some(status)) = child.try_wait() {
            return Err(BrowserError::LaunchFailed(format!(
                "browser exited during startup ({})",
                status
            )));
        }
        tokio::time::sleep(READY_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BrowserConfig {
        BrowserConfig {
            data_dir: PathBuf::from("/tmp/browserd-test"),
            ..BrowserConfig::default()
        }
    }

    #[test]
    fn test_launch_args_defaults() {
        let args = launch_args(&config(), None);
        assert!(args.contains(&"--remote-debugging-port=18860".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/browserd-test/user-data".to_string()));
        assert!(args.contains(&"--disable-blink-features=AutomationControlled".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--proxy-server")));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
    }

    #[test]
    fn test_launch_args_proxy_headless_extra() {
        let mut cfg = config();
        cfg.headless = true;
        cfg.extra_args = vec!["--lang=en-US".to_string()];
        let args = launch_args(&cfg, Some("socks5://127.0.0.1:18870"));
        assert!(args.contains(&"--proxy-server=socks5://127.0.0.1:18870".to_string()));
        assert!(args.contains(&"--headless=new".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--lang=en-US"));
    }

    #[test]
    fn test_find_chrome() {
        if let Some(path) = find_chrome() {
            assert!(path.exists());
        }
    }

    #[tokio::test]
    async fn test_spawn_missing_binary() {
        let mut cfg = config();
        cfg.chrome_path = Some(PathBuf::from("/nonexistent/chrome-binary"));
        let err = spawn(&cfg, None).unwrap_err();
        assert!(matches!(err, BrowserError::LaunchFailed(_)));
    }

    #[tokio::test]
    async fn test_endpoint_down() {
        assert!(!is_endpoint_up("http://127.0.0.1:9").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_wait_until_ready_gives_up_on_silent_endpoint() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        let mut child = Command::new("sleep")
            .arg("30")
            .kill_on_drop(true)
            .spawn()
            .unwrap();

        let started = std::time::Instant::now();
        let err = wait_until_ready(&endpoint, &mut child, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::LaunchFailed(_)));
        assert!(started.elapsed() < Duration::from_secs(4));

        server.abort();
    }
}
