//! CLI definitions for browserd.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use browserd_config::{Config, ConfigLoader};

/// browserd CLI.
#[derive(Parser)]
#[command(name = "browserd")]
#[command(about = "Local REST control server for a single stealth Chrome session")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ./browserd.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum Commands {
    /// Run the server in foreground (default)
    Run,

    /// Validate the effective configuration and exit
    CheckConfig,
}

/// Command line values that take precedence over the config file.
#[derive(Args, Debug, Default)]
pub(crate) struct Overrides {
    /// Server host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Outbound proxy for the browser, e.g. socks5://127.0.0.1:18870
    #[arg(long, env = "BROWSER_PROXY", global = true)]
    pub proxy: Option<String>,

    /// Launch the browser without a window
    #[arg(long, global = true)]
    pub headless: bool,

    /// Root directory for the browser profile, screenshots and logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(proxy) = &self.proxy {
            config.browser.proxy = Some(proxy.clone());
        }
        if self.headless {
            config.browser.headless = true;
        }
        if let Some(dir) = &self.data_dir {
            config.browser.data_dir = PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["browserd"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "browserd",
            "run",
            "--host",
            "0.0.0.0",
            "--port",
            "19000",
            "--proxy",
            "socks5://127.0.0.1:18870",
            "--headless",
            "--data-dir",
            "/tmp/browserd-cli",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Run));

        let mut config = Config::default();
        cli.overrides.apply(&mut config);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 19000);
        assert_eq!(config.browser.proxy(), Some("socks5://127.0.0.1:18870"));
        assert!(config.browser.headless);
        assert_eq!(config.browser.data_dir, PathBuf::from("/tmp/browserd-cli"));
    }

    #[test]
    fn test_check_config_with_path() {
        let cli = Cli::try_parse_from(["browserd", "--config", "custom.toml", "check-config"]).unwrap();
        assert_eq!(cli.command, Some(Commands::CheckConfig));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_no_overrides_keep_file_values() {
        let mut config = Config::default();
        config.server.port = 20000;
        config.browser.headless = true;
        Overrides::default().apply(&mut config);
        assert_eq!(config.server.port, 20000);
        assert!(config.browser.headless);
    }
}
