//! # Configuration
//!
//! This module defines the YAML configuration file read by the
//! `pr-workspace` binary and the helpers that turn it into ready-to-use
//! components.
//!
//! ## Format
//!
//! Every field is optional:
//!
//! ```yaml
//! data_dir: /var/lib/pr-workspace
//! github_hostname: github.com
//! checkout_strategy: merge      # merge | branch
//! merge_depth: 100
//! configure_git_helper: true
//! identity:
//!   name: pr-workspace
//!   email: pr-workspace@localhost
//! token:
//!   env: GITHUB_TOKEN           # or `file: /run/secrets/github-token`
//! ```
//!
//! The checkout strategy is a property of the configured provisioner rather
//! than something chosen per clone.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::{default_data_dir, DEFAULT_GITHUB_HOSTNAME, DEFAULT_TOKEN_ENV};
use crate::error::{Error, Result};
use crate::models::CloneStrategy;
use crate::process::SystemCommandRunner;
use crate::provider::{CredentialProvider, EnvTokenProvider, FileTokenProvider};
use crate::rotating::TokenRotatingCloner;
use crate::workspace::{GitIdentity, WorkspaceProvisioner};

/// Where the installation token is read from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSource {
    /// Environment variable holding the token.
    #[serde(default)]
    pub env: Option<String>,
    /// File holding the token, re-read before every clone.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl TokenSource {
    /// Builds the provider for this source.
    ///
    /// With neither field set the token is read from `$GITHUB_TOKEN`.
    pub fn provider(&self) -> Result<Box<dyn CredentialProvider>> {
        match (&self.env, &self.file) {
            (Some(_), Some(_)) => Err(Error::ConfigParse {
                message: "token source sets both 'env' and 'file'".to_string(),
                hint: Some("choose one of 'token.env' or 'token.file'".to_string()),
            }),
            (Some(var), None) => Ok(Box::new(EnvTokenProvider::new(var))),
            (None, Some(path)) => Ok(Box::new(FileTokenProvider::new(path))),
            (None, None) => Ok(Box::new(EnvTokenProvider::new(DEFAULT_TOKEN_ENV))),
        }
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the workspace tree. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Host the installation token is valid for.
    pub github_hostname: String,
    pub checkout_strategy: CloneStrategy,
    /// History depth of the base branch clone for merge checkouts.
    pub merge_depth: Option<u32>,
    /// Run `git config --global` to enable the credential store.
    pub configure_git_helper: bool,
    /// Identity used for merge commits.
    pub identity: GitIdentity,
    pub token: TokenSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            github_hostname: DEFAULT_GITHUB_HOSTNAME.to_string(),
            checkout_strategy: CloneStrategy::default(),
            merge_depth: None,
            configure_git_helper: false,
            identity: GitIdentity::default(),
            token: TokenSource::default(),
        }
    }
}

impl Config {
    /// Parses a YAML configuration.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: Some(
                "known keys are data_dir, github_hostname, checkout_strategy, merge_depth, \
                 configure_git_helper, identity, token"
                    .to_string(),
            ),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading config file {}", path.display()), e))?;
        Self::parse(&contents)
    }

    fn validate(&self) -> Result<()> {
        url::Host::parse(&self.github_hostname).map_err(|e| Error::ConfigParse {
            message: format!("invalid github_hostname {:?}: {}", self.github_hostname, e),
            hint: Some("use a bare host name such as 'github.com'".to_string()),
        })?;
        if self.merge_depth == Some(0) {
            return Err(Error::ConfigParse {
                message: "merge_depth must be at least 1".to_string(),
                hint: Some("remove merge_depth to clone the full base history".to_string()),
            });
        }
        Ok(())
    }

    /// The configured data directory, or the platform default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Builds the provisioner described by this configuration.
    pub fn provisioner(&self) -> WorkspaceProvisioner {
        WorkspaceProvisioner::new(self.data_dir(), self.checkout_strategy)
            .with_identity(self.identity.clone())
            .with_merge_depth(self.merge_depth)
    }

    /// Builds the provisioner wrapped in token rotation.
    pub fn cloner(&self) -> Result<TokenRotatingCloner<WorkspaceProvisioner>> {
        let cloner = TokenRotatingCloner::new(
            self.provisioner(),
            self.token.provider()?,
            self.github_hostname.clone(),
        );
        Ok(if self.configure_git_helper {
            cloner.with_git_helper(Box::new(SystemCommandRunner))
        } else {
            cloner
        })
    }
}
