//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pr_workspace::config::Config;
use pr_workspace::defaults::default_config_path;

use crate::commands;

/// Pull Request Workspace - Check out pull requests with rotating GitHub App tokens
#[derive(Parser, Debug)]
#[command(name = "pr-workspace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH", env = "PR_WORKSPACE_CONFIG")]
    config: Option<PathBuf>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check out a pull request into its workspace directory
    Clone(commands::clone::CloneArgs),

    /// Write the current installation token to ~/.git-credentials
    Credentials(commands::credentials::CredentialsArgs),

    /// Delete the workspaces of a pull request
    Delete(commands::delete::DeleteArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        // RUST_LOG takes precedence over --log-level.
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .format_timestamp(None)
        .try_init();

        let config = load_config(self.config)?;

        match self.command {
            Commands::Clone(args) => commands::clone::execute(args, config),
            Commands::Credentials(args) => commands::credentials::execute(args, config),
            Commands::Delete(args) => commands::delete::execute(args, config),
        }
    }
}

/// Reads the explicit config file, the default one if present, or defaults.
fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => match default_config_path().filter(|path| path.exists()) {
            Some(path) => Config::from_file(&path)
                .with_context(|| format!("loading configuration from {}", path.display())),
            None => Ok(Config::default()),
        },
    }
}
