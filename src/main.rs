//! browserd - REST control server for a single stealth Chrome session.
//!
//! Main entry point for the browserd CLI and server.

mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use browserd_api::{ApiServer, AppState};
use browserd_config::{Config, ConfigError, ConfigLoader, ConfigValidator, ValidationResult};

use crate::cli::{Cli, Commands};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "browserd.toml";

/// Initialize tracing with console and file output.
///
/// Log files are written to `<data_dir>/logs/` with daily rotation.
fn init_tracing(log_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("browserd")
        .filename_suffix("log")
        .max_log_files(30)
        .build(log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the process lifetime.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// An explicit path must exist; the default file is optional.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => ConfigLoader::load(path),
        None => ConfigLoader::load_or_default(Some(Path::new(DEFAULT_CONFIG_FILE))),
    }
}

fn print_validation(result: &ValidationResult) {
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        eprintln!("error: {}: {}", error.path, error.message);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    cli.overrides.apply(&mut config);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::CheckConfig => {
            let result = ConfigValidator::validate(&config);
            print_validation(&result);
            if !result.is_valid() {
                std::process::exit(1);
            }
            println!("Configuration OK ({} warning(s))", result.warnings.len());
            Ok(())
        }
    }
}

/// Bind, launch the browser in the background, serve until a signal, then
/// close the browser.
async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&config.browser.log_dir())?;

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for e in &validation.errors {
            error!("Config {}: {}", e.path, e.message);
        }
        return Err("invalid configuration".into());
    }

    info!(
        "Starting browserd {} (proxy: {}, headless: {})",
        env!("CARGO_PKG_VERSION"),
        config.browser.proxy().unwrap_or("direct"),
        config.browser.headless
    );

    let state = Arc::new(AppState::new(config));
    let server = ApiServer::new(state.clone());
    let listener = server.bind().await?;

    let manager = state.manager().clone();
    tokio::spawn(async move {
        match manager.start().await {
            Ok(generation) => info!("Browser ready (generation {})", generation),
            Err(e) => warn!("Browser launch failed, the next request will retry: {}", e),
        }
    });

    let result = server.serve(listener, shutdown_signal()).await;

    info!("Closing browser");
    state.manager().shutdown().await;
    info!("browserd stopped");

    result.map_err(Into::into)
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_explicit_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/browserd.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_config_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 19999\n[wait]\npoll_interval_ms = 100").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 19999);
        assert_eq!(config.wait.poll_interval_ms, 100);
    }
}
