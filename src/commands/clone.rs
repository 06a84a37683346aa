//! # Clone Command Implementation
//!
//! Checks out a pull request into
//! `<data_dir>/repos/<owner>/<name>/<pr>/<workspace>` after refreshing the
//! installation token, then prints the workspace path.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use pr_workspace::config::Config;
use pr_workspace::models::{CloneStrategy, PullRequest};
use pr_workspace::workspace::Cloner;

use super::repository;

/// Check out a pull request
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Base repository as `owner/name`
    #[arg(long, value_name = "OWNER/NAME")]
    pub repo: String,

    /// Pull request number
    #[arg(long, value_name = "NUMBER")]
    pub pr: u64,

    /// Target branch of the pull request
    #[arg(long, value_name = "BRANCH")]
    pub base_branch: String,

    /// Source branch of the pull request
    #[arg(long, value_name = "BRANCH")]
    pub head_branch: String,

    /// Head repository as `owner/name`, for pull requests from forks
    #[arg(long, value_name = "OWNER/NAME")]
    pub head_repo: Option<String>,

    /// Head commit SHA. An existing checkout at this commit is reused.
    #[arg(long, value_name = "SHA")]
    pub head_commit: Option<String>,

    /// Workspace name within the pull request
    #[arg(long, default_value = "default")]
    pub workspace: String,

    /// Checkout strategy, overriding the configuration (merge or branch)
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<CloneStrategy>,

    /// Root directory for workspaces, overriding the configuration
    #[arg(long, value_name = "DIR", env = "PR_WORKSPACE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Clone URL of the base repository instead of the GitHub default
    #[arg(long, value_name = "URL")]
    pub clone_url: Option<String>,

    /// Clone URL of the head repository instead of the GitHub default
    #[arg(long, value_name = "URL")]
    pub head_clone_url: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the clone command
pub fn execute(args: CloneArgs, mut config: Config) -> Result<()> {
    if let Some(data_dir) = args.data_dir {
        config.data_dir = Some(data_dir);
    }
    if let Some(strategy) = args.strategy {
        config.checkout_strategy = strategy;
    }

    let hostname = config.github_hostname.clone();
    let base_repo = repository(&args.repo, args.clone_url.as_deref(), &hostname)?;
    let head_repo = match (&args.head_repo, &args.head_clone_url) {
        (None, None) => base_repo.clone(),
        (name, url) => repository(
            name.as_deref().unwrap_or(&args.repo),
            url.as_deref(),
            &hostname,
        )?,
    };

    let pr = PullRequest {
        num: args.pr,
        base_repo,
        head_branch: args.head_branch,
        base_branch: args.base_branch,
        head_commit: args.head_commit,
    };

    info!(
        "checking out pull request #{} of {} ({} strategy)",
        pr.num, pr.base_repo.full_name, config.checkout_strategy
    );
    let cloner = config.cloner()?;
    let workspace = cloner
        .clone_workspace(&head_repo, &pr, &args.workspace)
        .with_context(|| format!("checking out pull request #{}", pr.num))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&workspace)?);
    } else {
        println!("{}", workspace.path.display());
    }
    Ok(())
}
