//! Repository and pull request descriptors.
//!
//! Values in this module are read-only inputs to a single clone operation.
//! Authenticating a repository produces a new value through
//! [`Repository::with_token`]; the original is never mutated, so a value
//! carrying a short-lived token cannot leak into a later operation.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sanitize::redact_clone_url;

/// Empty-auth marker that callers place in a clone URL where credentials
/// are to be injected, as in `https://:@github.com/owner/repo.git`.
pub const UNAUTHENTICATED_MARKER: &str = "://:";

/// Username GitHub expects alongside an installation token.
pub const ACCESS_TOKEN_USERNAME: &str = "x-access-token";

/// A hosted git repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// `owner/name`
    pub full_name: String,
    pub owner: String,
    pub name: String,
    /// URL used by git. May contain the empty-auth marker or a live secret.
    pub clone_url: String,
    /// Display form of `clone_url` that never contains a secret.
    pub sanitized_clone_url: String,
    /// Hostname of the VCS server, e.g. `github.com`.
    pub hostname: String,
}

impl Repository {
    /// Builds a repository from its clone URL.
    ///
    /// `full_name` must be of the form `owner/name`. The sanitized URL is
    /// derived by redacting any password in the URL's userinfo.
    pub fn new(
        full_name: impl Into<String>,
        clone_url: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Result<Self, Error> {
        let full_name = full_name.into();
        let (owner, name) = match full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                (owner.to_string(), name.to_string())
            }
            _ => {
                return Err(Error::ConfigParse {
                    message: format!("invalid repository name {:?}", full_name),
                    hint: Some("repository names look like 'owner/name'".to_string()),
                })
            }
        };
        validate_path_component("repository owner", &owner)?;
        validate_path_component("repository name", &name)?;
        let clone_url = clone_url.into();
        Ok(Self {
            sanitized_clone_url: redact_clone_url(&clone_url),
            full_name,
            owner,
            name,
            clone_url,
            hostname: hostname.into(),
        })
    }

    /// Builds a repository whose clone URL carries the empty-auth marker for
    /// `https://<hostname>/<full_name>.git`.
    pub fn github(hostname: &str, full_name: &str) -> Result<Self, Error> {
        let clone_url = format!("https://:@{}/{}.git", hostname, full_name);
        Self::new(full_name, clone_url, hostname)
    }

    /// Returns a copy of this repository with `token` injected into its clone
    /// URL.
    ///
    /// Only the first occurrence of [`UNAUTHENTICATED_MARKER`] is replaced;
    /// without the marker the URL is returned unchanged. The sanitized URL is
    /// derived from this repository's own sanitized URL and never contains
    /// the token.
    pub fn with_token(&self, token: &str) -> Repository {
        let auth = format!("://{}:{}", ACCESS_TOKEN_USERNAME, token);
        let display_auth = format!("://{}:", ACCESS_TOKEN_USERNAME);
        Repository {
            clone_url: self.clone_url.replacen(UNAUTHENTICATED_MARKER, &auth, 1),
            sanitized_clone_url: self
                .sanitized_clone_url
                .replacen(UNAUTHENTICATED_MARKER, &display_auth, 1),
            ..self.clone()
        }
    }
}

/// Checks that `value` names exactly one directory below its parent.
///
/// Rejects empty names, `.`, `..`, anything containing `/` or `\\`, and
/// absolute paths.
pub fn validate_path_component(kind: &str, value: &str) -> Result<(), Error> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || Path::new(value).is_absolute();
    if invalid {
        return Err(Error::ConfigParse {
            message: format!("invalid {} {:?}", kind, value),
            hint: Some(format!(
                "a {} must be a single path component without '/', '\\' or '..'",
                kind
            )),
        });
    }
    Ok(())
}

/// A pull request against a base repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub num: u64,
    pub base_repo: Repository,
    /// Source branch of the pull request.
    pub head_branch: String,
    /// Target branch of the pull request.
    pub base_branch: String,
    /// Head commit SHA, when known. Enables reuse of an up-to-date checkout.
    #[serde(default)]
    pub head_commit: Option<String>,
}

/// Short-lived credential issued by a [`CredentialProvider`](crate::provider::CredentialProvider).
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub token: String,
}

impl Credential {
    /// Credential for a GitHub App installation token.
    pub fn installation(token: impl Into<String>) -> Self {
        Self {
            username: ACCESS_TOKEN_USERNAME.to_string(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// How a pull request's working tree is reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CloneStrategy {
    /// Clone the base branch and merge the pull request head into it with a
    /// forced merge commit, so `HEAD^2` is always the head tip.
    #[serde(rename = "merge")]
    MergeSimulated,
    /// Shallow clone of the head branch.
    #[default]
    #[serde(rename = "branch")]
    FastCheckout,
}

impl FromStr for CloneStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merge" => Ok(CloneStrategy::MergeSimulated),
            "branch" => Ok(CloneStrategy::FastCheckout),
            other => Err(Error::ConfigParse {
                message: format!("unknown checkout strategy {:?}", other),
                hint: Some("use 'merge' or 'branch'".to_string()),
            }),
        }
    }
}

impl fmt::Display for CloneStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloneStrategy::MergeSimulated => f.write_str("merge"),
            CloneStrategy::FastCheckout => f.write_str("branch"),
        }
    }
}
