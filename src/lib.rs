//! # Pull Request Workspace Library
//!
//! This library materializes the source tree of a pull request on disk so
//! that automation can run infrastructure-as-code commands against it. It is
//! designed to be used by the `pr-workspace` command-line tool but can also
//! be embedded in a pull request automation controller.
//!
//! ## Quick Example
//!
//! ```no_run
//! use pr_workspace::models::{CloneStrategy, PullRequest, Repository};
//! use pr_workspace::provider::EnvTokenProvider;
//! use pr_workspace::rotating::TokenRotatingCloner;
//! use pr_workspace::workspace::{Cloner, WorkspaceProvisioner};
//!
//! let base = Repository::github("github.com", "owner/infra").unwrap();
//! let pr = PullRequest {
//!     num: 42,
//!     base_repo: base.clone(),
//!     head_branch: "feature".to_string(),
//!     base_branch: "main".to_string(),
//!     head_commit: None,
//! };
//!
//! let provisioner = WorkspaceProvisioner::new("/var/lib/pr-workspace", CloneStrategy::MergeSimulated);
//! let cloner = TokenRotatingCloner::new(
//!     provisioner,
//!     Box::new(EnvTokenProvider::new("GITHUB_TOKEN")),
//!     "github.com",
//! );
//!
//! let workspace = cloner.clone_workspace(&base, &pr, "default").unwrap();
//! println!("checked out into {}", workspace.path.display());
//! ```
//!
//! ## Core Concepts
//!
//! - **Models (`models`)**: repository and pull request descriptors, and the
//!   `"://:"` marker convention for injecting credentials into clone URLs.
//! - **Sanitization (`sanitize`)**: strips secrets from every command string,
//!   process output and error message before it is logged or returned.
//! - **Credential store (`credentials`)**: maintains `~/.git-credentials`.
//! - **Providers (`provider`)**: where installation tokens come from.
//! - **Workspaces (`workspace`)**: the `Cloner` trait and the
//!   `WorkspaceProvisioner` that rebuilds a pull request's tree with git.
//! - **Token rotation (`rotating`)**: a `Cloner` decorator that refreshes the
//!   token before every clone.
//!
//! ## Execution Flow
//!
//! 1.  **Token**: fetch a fresh installation token from the provider.
//! 2.  **Credential file**: write it to `~/.git-credentials` for the host.
//! 3.  **Rewrite**: derive authenticated copies of the base and head
//!     repositories.
//! 4.  **Provision**: delete and recreate the workspace directory, then run
//!     the clone (and, for merge checkouts, remote/fetch/merge) commands.
//!
//! All git commands run synchronously and in order. Nothing is retried.

pub mod config;
pub mod credentials;
pub mod defaults;
pub mod error;
pub mod models;
pub mod process;
pub mod provider;
pub mod rotating;
pub mod sanitize;
pub mod workspace;

#[cfg(test)]
mod sanitize_proptest;
