use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_invalid_port() {
    let mut config = Config::default();
    config.server.port = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "server.port"));
}

#[test]
fn test_validate_port_clash() {
    let mut config = Config::default();
    config.browser.debug_port = config.server.port;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "browser.debug_port"));
}

#[test]
fn test_validate_public_host_warning() {
    let mut config = Config::default();
    config.server.host = "0.0.0.0".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "server.host"));
}

#[test]
fn test_validate_proxy_urls() {
    let mut config = Config::default();
    config.browser.proxy = Some("socks5://127.0.0.1:18870".to_string());
    assert!(ConfigValidator::validate(&config).is_valid());

    config.browser.proxy = Some("not a url".to_string());
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "browser.proxy"));

    config.browser.proxy = Some("ftp://127.0.0.1:21".to_string());
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "browser.proxy"));
}

#[test]
fn test_validate_zero_poll_interval() {
    let mut config = Config::default();
    config.wait.poll_interval_ms = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "wait.poll_interval_ms"));
}

#[test]
fn test_validate_high_max_timeout_warning() {
    let mut config = Config::default();
    config.wait.max_timeout_secs = 7_200;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "wait.max_timeout_secs"));
}

#[test]
fn test_validate_zero_lengths() {
    let mut config = Config::default();
    config.snapshot.default_max_length = 0;
    config.snapshot.text_max_length = 0;

    let result = ConfigValidator::validate(&config);
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_validate_missing_chrome_path_warning() {
    let mut config = Config::default();
    config.browser.chrome_path = Some("/nonexistent/chrome".into());

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "browser.chrome_path"));
}
