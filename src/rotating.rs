//! # Token Rotation
//!
//! GitHub App installation tokens expire quickly, so a token fetched once at
//! startup cannot be used for every clone. [`TokenRotatingCloner`] wraps any
//! other [`Cloner`] and, before every clone:
//!
//! 1. asks its [`CredentialProvider`] for a fresh token,
//! 2. writes it to `~/.git-credentials` for the configured GitHub host,
//!    replacing the previous entry,
//! 3. derives authenticated copies of the base and head repositories, and
//! 4. delegates to the wrapped cloner with those copies.
//!
//! The caller's repository values are never modified. Authenticated copies
//! exist only for the duration of one call.

use std::path::PathBuf;

use log::info;

use crate::credentials::{configure_git_helper, write_git_credentials};
use crate::error::{Error, Result};
use crate::models::{Credential, PullRequest, Repository};
use crate::process::CommandRunner;
use crate::provider::CredentialProvider;
use crate::workspace::{ClonedWorkspace, Cloner};

type HomeResolver = Box<dyn Fn() -> Option<PathBuf> + Send + Sync>;

/// Cloner decorator that refreshes the installation token on every call.
pub struct TokenRotatingCloner<C> {
    inner: C,
    provider: Box<dyn CredentialProvider>,
    github_hostname: String,
    home_dir: HomeResolver,
    git_helper: Option<Box<dyn CommandRunner>>,
}

impl<C: Cloner> TokenRotatingCloner<C> {
    /// Wraps `inner`, writing credentials for `github_hostname` into the
    /// current user's home directory.
    pub fn new(
        inner: C,
        provider: Box<dyn CredentialProvider>,
        github_hostname: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            provider,
            github_hostname: github_hostname.into(),
            home_dir: Box::new(dirs::home_dir),
            git_helper: None,
        }
    }

    /// Writes the credential file under `home` instead of the user's home.
    pub fn with_home_dir(self, home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        self.with_home_resolver(move || Some(home.clone()))
    }

    /// Replaces how the home directory is resolved.
    pub fn with_home_resolver(
        mut self,
        resolver: impl Fn() -> Option<PathBuf> + Send + Sync + 'static,
    ) -> Self {
        self.home_dir = Box::new(resolver);
        self
    }

    /// Also configures git's credential helper through `runner` on every
    /// clone.
    pub fn with_git_helper(mut self, runner: Box<dyn CommandRunner>) -> Self {
        self.git_helper = Some(runner);
        self
    }

    /// The wrapped cloner.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn fetch_credential(&self) -> Result<Credential> {
        self.provider
            .get_token()
            .map(Credential::installation)
            .map_err(|source| Error::Credential {
                message: "getting github token".to_string(),
                source,
            })
    }
}

impl<C: Cloner> Cloner for TokenRotatingCloner<C> {
    fn clone_workspace(
        &self,
        head_repo: &Repository,
        pr: &PullRequest,
        workspace: &str,
    ) -> Result<ClonedWorkspace> {
        info!("refreshing git tokens for GitHub App");

        let credential = self.fetch_credential()?;

        let home = (self.home_dir)().ok_or_else(|| Error::Config {
            message: "getting home dir to write ~/.git-credentials file".to_string(),
        })?;

        write_git_credentials(
            &credential.username,
            &credential.token,
            &self.github_hostname,
            &home,
            true,
        )?;
        if let Some(runner) = &self.git_helper {
            configure_git_helper(
                runner.as_ref(),
                &credential.username,
                &self.github_hostname,
                &home,
            )?;
        }

        let head_repo = head_repo.with_token(&credential.token);
        let pr = PullRequest {
            base_repo: pr.base_repo.with_token(&credential.token),
            ..pr.clone()
        };

        self.inner.clone_workspace(&head_repo, &pr, workspace)
    }
}
