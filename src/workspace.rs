//! # Pull Request Workspaces
//!
//! This module provides the [`WorkspaceProvisioner`], which materializes the
//! source tree of a pull request on disk by driving the system `git` binary.
//!
//! ## Layout
//!
//! Each pull request gets its own directory per workspace name:
//!
//! ```text
//! <data_dir>/repos/<owner>/<name>/<pr number>/<workspace>
//! ```
//!
//! ## Strategies
//!
//! - **`MergeSimulated`**: clone the base branch, add the head repository as
//!   a remote named `head`, fetch `pull/<num>/head` and merge it with
//!   `--no-ff`. The forced merge commit means `HEAD^2` always names the pull
//!   request's head tip, whether or not the merge could have fast-forwarded.
//! - **`FastCheckout`**: a depth 1, single-branch clone of the head branch.
//!
//! ## Sanitization
//!
//! Clone URLs usually carry a live installation token. Every command string,
//! every chunk of process output and every error message is passed through a
//! [`Sanitizer`] before it is logged or wrapped into an [`Error::Clone`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{validate_path_component, CloneStrategy, PullRequest, Repository};
use crate::process::{CommandRunner, SystemCommandRunner};
use crate::sanitize::Sanitizer;

/// Message of the merge commit created by the merge strategy.
pub const MERGE_COMMIT_MESSAGE: &str = "pr-workspace-merge";

/// Name of the remote pointing at the head repository.
pub const HEAD_REMOTE: &str = "head";

/// A checked-out pull request workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClonedWorkspace {
    /// Directory holding the working tree.
    pub path: PathBuf,
    /// False when an existing checkout was already at the right commit.
    pub freshly_cloned: bool,
}

/// Capability to produce a working tree for a pull request.
///
/// Implemented by [`WorkspaceProvisioner`] and decorated by
/// [`TokenRotatingCloner`](crate::rotating::TokenRotatingCloner).
pub trait Cloner: Send + Sync {
    /// Ensures `workspace` of `pr` is checked out and returns its location.
    fn clone_workspace(
        &self,
        head_repo: &Repository,
        pr: &PullRequest,
        workspace: &str,
    ) -> Result<ClonedWorkspace>;
}

impl<C: Cloner + ?Sized> Cloner for Box<C> {
    fn clone_workspace(
        &self,
        head_repo: &Repository,
        pr: &PullRequest,
        workspace: &str,
    ) -> Result<ClonedWorkspace> {
        (**self).clone_workspace(head_repo, pr, workspace)
    }
}

/// Author and committer identity handed to git for the merge commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for GitIdentity {
    fn default() -> Self {
        Self {
            name: "pr-workspace".to_string(),
            email: "pr-workspace@localhost".to_string(),
        }
    }
}

impl GitIdentity {
    /// Environment variables `git merge` needs to create a commit.
    pub fn env(&self) -> Vec<(String, String)> {
        vec![
            ("EMAIL".to_string(), self.email.clone()),
            ("GIT_AUTHOR_NAME".to_string(), self.name.clone()),
            ("GIT_COMMITTER_NAME".to_string(), self.name.clone()),
        ]
    }
}

/// Builds pull request working trees under a data directory.
pub struct WorkspaceProvisioner {
    data_dir: PathBuf,
    strategy: CloneStrategy,
    identity: GitIdentity,
    merge_depth: Option<u32>,
    testing_override_head_clone_url: Option<String>,
    testing_override_base_clone_url: Option<String>,
    runner: Box<dyn CommandRunner>,
}

impl WorkspaceProvisioner {
    /// Creates a provisioner that runs the system `git`.
    pub fn new(data_dir: impl Into<PathBuf>, strategy: CloneStrategy) -> Self {
        Self {
            data_dir: data_dir.into(),
            strategy,
            identity: GitIdentity::default(),
            merge_depth: None,
            testing_override_head_clone_url: None,
            testing_override_base_clone_url: None,
            runner: Box::new(SystemCommandRunner),
        }
    }

    /// Replaces the process runner.
    pub fn with_runner(mut self, runner: Box<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_identity(mut self, identity: GitIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Limits the history of the base branch clone in the merge strategy.
    ///
    /// The merge needs the merge base locally, so a depth that does not reach
    /// it makes the merge fail.
    pub fn with_merge_depth(mut self, depth: Option<u32>) -> Self {
        self.merge_depth = depth;
        self
    }

    /// Clones the head from `url` instead of the head repository's clone URL.
    pub fn with_head_clone_url_override(mut self, url: Option<String>) -> Self {
        self.testing_override_head_clone_url = url;
        self
    }

    /// Clones the base from `url` instead of the base repository's clone URL.
    pub fn with_base_clone_url_override(mut self, url: Option<String>) -> Self {
        self.testing_override_base_clone_url = url;
        self
    }

    pub fn strategy(&self) -> CloneStrategy {
        self.strategy
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding every workspace of `pr`.
    ///
    /// Owner and name are checked again here since `Repository` fields are
    /// public and may not have gone through `Repository::new`.
    fn pull_dir(&self, repo: &Repository, pr_num: u64) -> Result<PathBuf> {
        validate_path_component("repository owner", &repo.owner)?;
        validate_path_component("repository name", &repo.name)?;
        Ok(self
            .data_dir
            .join("repos")
            .join(&repo.owner)
            .join(&repo.name)
            .join(pr_num.to_string()))
    }

    /// Directory of a single workspace of pull request `pr_num`.
    ///
    /// Fails when `workspace` or the repository's owner or name is not a
    /// single path component, so the result always lies below the data dir.
    pub fn working_dir(&self, repo: &Repository, pr_num: u64, workspace: &str) -> Result<PathBuf> {
        validate_path_component("workspace name", workspace)?;
        Ok(self.pull_dir(repo, pr_num)?.join(workspace))
    }

    /// Removes every workspace of pull request `pr_num`.
    pub fn delete(&self, repo: &Repository, pr_num: u64) -> Result<()> {
        let dir = self.pull_dir(repo, pr_num)?;
        info!("deleting workspaces of pull request #{} in {}", pr_num, dir.display());
        remove_dir_if_exists(&dir)
    }

    /// Removes a single workspace of pull request `pr_num`.
    pub fn delete_for_workspace(
        &self,
        repo: &Repository,
        pr_num: u64,
        workspace: &str,
    ) -> Result<()> {
        let dir = self.working_dir(repo, pr_num, workspace)?;
        info!("deleting workspace {}", dir.display());
        remove_dir_if_exists(&dir)
    }

    /// Sanitizer covering every URL this provisioner may hand to git.
    fn sanitizer(&self, head_repo: &Repository, pr: &PullRequest) -> Sanitizer {
        let mut sanitizer = Sanitizer::for_repos(&pr.base_repo, head_repo);
        for url in [
            &self.testing_override_head_clone_url,
            &self.testing_override_base_clone_url,
        ]
        .into_iter()
        .flatten()
        {
            sanitizer = sanitizer.with_clone_url(url);
        }
        sanitizer
    }

    /// The git commands that build `target_dir`, in execution order.
    pub fn commands(
        &self,
        target_dir: &Path,
        head_repo: &Repository,
        pr: &PullRequest,
    ) -> Vec<Vec<String>> {
        let head_clone_url = self
            .testing_override_head_clone_url
            .clone()
            .unwrap_or_else(|| head_repo.clone_url.clone());
        let base_clone_url = self
            .testing_override_base_clone_url
            .clone()
            .unwrap_or_else(|| pr.base_repo.clone_url.clone());
        let target = target_dir.display().to_string();
        let pull_ref = format!("pull/{}/head:", pr.num);

        match self.strategy {
            CloneStrategy::MergeSimulated => {
                let mut clone = vec![
                    "git".to_string(),
                    "clone".to_string(),
                    "--branch".to_string(),
                    pr.base_branch.clone(),
                    "--single-branch".to_string(),
                ];
                if let Some(depth) = self.merge_depth {
                    clone.push(format!("--depth={}", depth));
                }
                clone.push(base_clone_url);
                clone.push(target);
                vec![
                    clone,
                    to_argv(&["git", "remote", "add", HEAD_REMOTE, head_clone_url.as_str()]),
                    to_argv(&["git", "fetch", HEAD_REMOTE, pull_ref.as_str()]),
                    to_argv(&[
                        "git",
                        "merge",
                        "-q",
                        "--no-ff",
                        "-m",
                        MERGE_COMMIT_MESSAGE,
                        "FETCH_HEAD",
                    ]),
                ]
            }
            CloneStrategy::FastCheckout => vec![to_argv(&[
                "git",
                "clone",
                "--branch",
                pr.head_branch.as_str(),
                "--depth=1",
                "--single-branch",
                head_clone_url.as_str(),
                target.as_str(),
            ])],
        }
    }

    /// Deletes and rebuilds `target_dir` from scratch.
    ///
    /// Runs the strategy's command sequence in order and stops at the first
    /// failure. The returned error, and every log line, is sanitized. The
    /// output carried by errors and logs is the command's stdout followed by
    /// its stderr, not an interleaved transcript.
    pub fn force_clone(
        &self,
        target_dir: &Path,
        head_repo: &Repository,
        pr: &PullRequest,
    ) -> Result<()> {
        // Commands run inside the directory, so a relative path would nest.
        let target_dir = &std::path::absolute(target_dir)
            .map_err(|e| Error::io(format!("resolving {}", target_dir.display()), e))?;
        remove_dir_if_exists(target_dir)?;

        info!("creating dir {}", target_dir.display());
        create_private_dir(target_dir)
            .map_err(|e| Error::io(format!("creating new workspace {}", target_dir.display()), e))?;

        let sanitizer = self.sanitizer(head_repo, pr);
        let env = self.identity.env();

        for argv in self.commands(target_dir, head_repo, pr) {
            let command = sanitizer.sanitize(&argv.join(" "));
            let output = self.runner.run(&argv, target_dir, &env).map_err(|e| Error::Clone {
                command: command.clone(),
                output: String::new(),
                message: sanitizer.sanitize(&e.to_string()),
            })?;
            let sanitized_output = sanitizer.sanitize(&output.combined);
            if !output.success {
                return Err(Error::Clone {
                    command,
                    output: sanitized_output.trim_end().to_string(),
                    message: sanitizer.sanitize(&output.status_message()),
                });
            }
            debug!(
                "ran: {}. Output: {}",
                command,
                sanitized_output.trim_end_matches('\n')
            );
        }
        Ok(())
    }

    /// Commit the existing checkout in `dir` was built from, if any.
    ///
    /// For merge checkouts this is the second parent of the merge commit.
    fn checked_out_head(&self, dir: &Path) -> Option<String> {
        if !dir.join(".git").exists() {
            return None;
        }
        let rev = match self.strategy {
            CloneStrategy::MergeSimulated => "HEAD^2",
            CloneStrategy::FastCheckout => "HEAD",
        };
        let output = self
            .runner
            .run(&to_argv(&["git", "rev-parse", rev]), dir, &[])
            .ok()?;
        if !output.success {
            debug!("git rev-parse {} failed in {}", rev, dir.display());
            return None;
        }
        Some(output.combined.trim().to_string())
    }
}

impl Cloner for WorkspaceProvisioner {
    fn clone_workspace(
        &self,
        head_repo: &Repository,
        pr: &PullRequest,
        workspace: &str,
    ) -> Result<ClonedWorkspace> {
        let path = self.working_dir(&pr.base_repo, pr.num, workspace)?;

        if let Some(expected) = pr.head_commit.as_deref() {
            match self.checked_out_head(&path) {
                Some(current) if current == expected => {
                    info!(
                        "repo is at correct commit {} so will not re-clone",
                        expected
                    );
                    return Ok(ClonedWorkspace {
                        path,
                        freshly_cloned: false,
                    });
                }
                Some(current) => debug!(
                    "repo was already cloned but is at {} instead of {}, re-cloning",
                    current, expected
                ),
                None => {}
            }
        }

        info!(
            "cloning pull request #{} of {} into {}",
            pr.num,
            pr.base_repo.full_name,
            path.display()
        );
        self.force_clone(&path, head_repo, pr)?;
        Ok(ClonedWorkspace {
            path,
            freshly_cloned: true,
        })
    }
}

fn to_argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(
            format!("deleting dir {}", dir.display()),
            e,
        )),
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
