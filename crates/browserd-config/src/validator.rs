//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_wait(config, &mut result);
        Self::validate_snapshot(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        } else if !matches!(config.server.host.as_str(), "127.0.0.1" | "localhost" | "::1") {
            result.add_warning(ValidationWarning::new(
                "server.host",
                "Binding to a non-loopback address exposes the browser to the network",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        if browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Debug port cannot be 0",
            ));
        }

        if browser.debug_port == config.server.port {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Debug port must differ from server.port",
            ));
        }

        if browser.launch_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.launch_timeout_secs",
                "launch_timeout_secs must be greater than 0",
            ));
        }

        if let Some(proxy) = browser.proxy() {
            match url::Url::parse(proxy) {
                Ok(parsed) => {
                    let schemes = ["http", "https", "socks4", "socks5"];
                    if !schemes.contains(&parsed.scheme()) {
                        result.add_error(ValidationError::new(
                            "browser.proxy",
                            format!(
                                "Unsupported proxy scheme '{}', valid values: {:?}",
                                parsed.scheme(),
                                schemes
                            ),
                        ));
                    }
                }
                Err(e) => {
                    result.add_error(ValidationError::new(
                        "browser.proxy",
                        format!("Invalid proxy URL: {}", e),
                    ));
                }
            }
        }

        if let Some(path) = browser.chrome_path() {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Browser binary does not exist: {}", path.display()),
                ));
            }
        }
    }

    fn validate_wait(config: &Config, result: &mut ValidationResult) {
        if config.wait.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "wait.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        } else if config.wait.poll_interval_ms > 5_000 {
            result.add_warning(ValidationWarning::new(
                "wait.poll_interval_ms",
                "poll_interval_ms above 5s makes waits overshoot their timeout noticeably",
            ));
        }

        if config.wait.max_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "wait.max_timeout_secs",
                "max_timeout_secs must be greater than 0",
            ));
        } else if config.wait.max_timeout_secs > 3_600 {
            result.add_warning(ValidationWarning::new(
                "wait.max_timeout_secs",
                "max_timeout_secs is very high (>1h), a single request can hold a worker that long",
            ));
        }
    }

    fn validate_snapshot(config: &Config, result: &mut ValidationResult) {
        if config.snapshot.default_max_length == 0 {
            result.add_error(ValidationError::new(
                "snapshot.default_max_length",
                "default_max_length must be greater than 0",
            ));
        }

        if config.snapshot.text_max_length == 0 {
            result.add_error(ValidationError::new(
                "snapshot.text_max_length",
                "text_max_length must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
