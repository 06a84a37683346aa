//! # Credentials Command Implementation
//!
//! Writes the current installation token to `~/.git-credentials` without
//! cloning anything. Useful to prime git before running other tools.

use anyhow::{anyhow, Result};
use clap::Args;

use pr_workspace::config::Config;
use pr_workspace::credentials::{configure_git_helper, credentials_path, write_git_credentials};
use pr_workspace::models::ACCESS_TOKEN_USERNAME;
use pr_workspace::process::SystemCommandRunner;

/// Write git credentials for the configured host
#[derive(Args, Debug)]
pub struct CredentialsArgs {
    /// Host the credential is for, overriding the configuration
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Username stored with the token
    #[arg(long, default_value = ACCESS_TOKEN_USERNAME)]
    pub username: String,

    /// Replace an existing entry for the host
    #[arg(long)]
    pub overwrite: bool,

    /// Also configure git's credential helper
    #[arg(long)]
    pub configure_helper: bool,
}

/// Execute the credentials command
pub fn execute(args: CredentialsArgs, config: Config) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.github_hostname.clone());
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("getting home dir to write ~/.git-credentials file"))?;

    let token = config
        .token
        .provider()?
        .get_token()
        .map_err(|e| anyhow!("getting github token: {}", e))?;

    write_git_credentials(&args.username, &token, &host, &home, args.overwrite)?;
    if args.configure_helper || config.configure_git_helper {
        configure_git_helper(&SystemCommandRunner, &args.username, &host, &home)?;
    }

    println!("{}", credentials_path(&home).display());
    Ok(())
}
