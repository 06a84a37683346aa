//! # Delete Command Implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pr_workspace::config::Config;

use super::repository;

/// Delete pull request workspaces
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Base repository as `owner/name`
    #[arg(long, value_name = "OWNER/NAME")]
    pub repo: String,

    /// Pull request number
    #[arg(long, value_name = "NUMBER")]
    pub pr: u64,

    /// Only delete this workspace instead of all of them
    #[arg(long)]
    pub workspace: Option<String>,

    /// Root directory for workspaces, overriding the configuration
    #[arg(long, value_name = "DIR", env = "PR_WORKSPACE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Execute the delete command
pub fn execute(args: DeleteArgs, mut config: Config) -> Result<()> {
    if let Some(data_dir) = args.data_dir {
        config.data_dir = Some(data_dir);
    }
    let repo = repository(&args.repo, None, &config.github_hostname)?;
    let provisioner = config.provisioner();

    match args.workspace {
        Some(workspace) => provisioner.delete_for_workspace(&repo, args.pr, &workspace)?,
        None => provisioner.delete(&repo, args.pr)?,
    }
    Ok(())
}
