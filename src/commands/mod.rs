//! # CLI Command Implementations
//!
//! Each subcommand of the `pr-workspace` command-line tool lives in its own
//! file and exposes:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` together with the
//!   loaded configuration and calls into the `pr_workspace` library.

pub mod clone;
pub mod credentials;
pub mod delete;

use anyhow::Result;
use pr_workspace::models::Repository;

/// Builds a repository from `--repo` and an optional explicit clone URL.
///
/// Without a clone URL the repository is assumed to live on `hostname` and
/// gets the empty-auth marker so a token can be injected later.
pub(crate) fn repository(
    full_name: &str,
    clone_url: Option<&str>,
    hostname: &str,
) -> Result<Repository> {
    let repo = match clone_url {
        Some(url) => Repository::new(full_name, url, hostname)?,
        None => Repository::github(hostname, full_name)?,
    };
    Ok(repo)
}
