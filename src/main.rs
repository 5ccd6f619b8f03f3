//! # Perch - Stacking Wayland Compositor
//!
//! Command-line entry point: parses options, bootstraps the session,
//! loads configuration and runs the compositor event loop.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{error, info, warn};
use std::path::PathBuf;

use perch::config::PerchConfig;
use perch::logging::{self, Verbosity};
use perch::server::Server;
use perch::session;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PERCH_GIT_COMMIT"),
    ", built ",
    env!("PERCH_BUILD_DATE"),
    " for ",
    env!("PERCH_TARGET"),
    ")"
);

#[derive(Parser)]
#[command(name = "perch")]
#[command(about = "A stacking Wayland compositor with interactive move and resize")]
#[command(version, long_version = LONG_VERSION, disable_version_flag = true)]
struct Cli {
    /// Specify config file (with path)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Specify config directory
    #[arg(short = 'C', long)]
    config_dir: Option<PathBuf>,

    /// Enable full logging, including debug information
    #[arg(short, long)]
    debug: bool,

    /// Run command on startup
    #[arg(short, long)]
    startup: Option<String>,

    /// Enable more verbose logging
    #[arg(short = 'V', long)]
    verbose: bool,

    /// Show version number and quit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(Verbosity::from_flags(cli.debug, cli.verbose));

    info!("🚀 Starting Perch {}", perch::VERSION);

    let config_dir = session::config_dir(cli.config_dir.as_deref())?;
    info!("📁 Using config dir {}", config_dir.display());
    session::prepare_session(&config_dir);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| session::config_file(&config_dir));
    let config = match PerchConfig::load(&config_path) {
        Ok(config) => {
            info!("✅ Configuration loaded from: {}", config_path.display());
            config
        }
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            info!("📝 Using default configuration");
            PerchConfig::default()
        }
    };

    if let Err(e) = session::runtime_dir() {
        error!("❌ {}", e);
        std::process::exit(1);
    }

    let server = Server::new(config)
        .context("Failed to initialize compositor")?
        .with_config_path(config_path);

    if let Err(e) = session::spawn_autostart(&config_dir) {
        warn!("⚠️ {:#}", e);
    }
    let startup = cli
        .startup
        .or_else(|| server.config().general.startup_command.clone());
    if let Some(command) = startup {
        if let Err(e) = session::spawn_startup_command(&command) {
            warn!("⚠️ {:#}", e);
        }
    }

    // Input backends push events through this channel; the sender must
    // outlive the loop or it stops immediately.
    let (input_tx, input_rx) = tokio::sync::mpsc::unbounded_channel();
    let result = server.run(input_rx).await;
    drop(input_tx);

    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["perch"]).unwrap();
        assert!(!cli.debug);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(cli.config_dir.is_none());
        assert!(cli.startup.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "perch", "-d", "-V", "-c", "/tmp/perch.toml", "-C", "/etc/perch", "-s", "foot -T 'my term'",
        ])
        .unwrap();
        assert!(cli.debug);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/perch.toml")));
        assert_eq!(cli.config_dir, Some(PathBuf::from("/etc/perch")));
        assert_eq!(cli.startup.as_deref(), Some("foot -T 'my term'"));
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::try_parse_from(["perch", "--verbose", "--startup", "true"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.debug);
        assert_eq!(cli.startup.as_deref(), Some("true"));
    }

    #[test]
    fn test_lowercase_v_shows_version() {
        let err = Cli::try_parse_from(["perch", "-v"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);

        let err = Cli::try_parse_from(["perch", "--version"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["perch", "-h"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_positional_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["perch", "junk"]).is_err());
        assert!(Cli::try_parse_from(["perch", "-d", "foot"]).is_err());
    }
}
