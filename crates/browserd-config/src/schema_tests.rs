use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 18850);
    assert_eq!(config.browser.debug_port, 18860);
    assert!(config.browser.proxy().is_none());
    assert!(!config.browser.headless);
}

#[test]
fn test_server_addr() {
    let server = ServerConfig {
        host: "0.0.0.0".to_string(),
        port: 9000,
    };
    assert_eq!(server.addr(), "0.0.0.0:9000");
}

#[test]
fn test_browser_paths_derive_from_data_dir() {
    let browser = BrowserConfig {
        data_dir: PathBuf::from("/tmp/browserd-test"),
        ..Default::default()
    };
    assert_eq!(browser.user_data_dir(), PathBuf::from("/tmp/browserd-test/user-data"));
    assert_eq!(browser.log_dir(), PathBuf::from("/tmp/browserd-test/logs"));
    assert_eq!(
        browser.screenshot_path(),
        PathBuf::from("/tmp/browserd-test/screenshot.png")
    );
}

#[test]
fn test_default_data_dir_under_home() {
    let browser = BrowserConfig::default();
    assert!(browser.data_dir.ends_with(".browserd"));
}

#[test]
fn test_endpoint_uses_debug_port() {
    let browser = BrowserConfig {
        debug_port: 9333,
        ..Default::default()
    };
    assert_eq!(browser.endpoint(), "http://127.0.0.1:9333");
}

#[test]
fn test_blank_proxy_is_unset() {
    let mut browser = BrowserConfig::default();
    browser.proxy = Some("   ".to_string());
    assert!(browser.proxy().is_none());

    browser.proxy = Some("socks5://127.0.0.1:18870".to_string());
    assert_eq!(browser.proxy(), Some("socks5://127.0.0.1:18870"));
}

#[test]
fn test_blank_chrome_path_is_unset() {
    let mut browser = BrowserConfig::default();
    browser.chrome_path = Some(PathBuf::new());
    assert!(browser.chrome_path().is_none());
}

#[test]
fn test_wait_config_durations() {
    let wait = WaitConfig::default();
    assert_eq!(wait.poll_interval(), Duration::from_millis(300));
    assert_eq!(wait.max_timeout(), Duration::from_secs(300));
}

#[test]
fn test_snapshot_config_default() {
    let snapshot = SnapshotConfig::default();
    assert_eq!(snapshot.default_max_length, 80_000);
    assert_eq!(snapshot.text_max_length, 50_000);
}
