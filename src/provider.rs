//! Sources of short-lived installation tokens.
//!
//! Token issuance and refresh happen outside this crate. Providers here only
//! read the current token each time they are asked, so an external refresher
//! can rotate it between clones.

use std::env;
use std::fs;
use std::path::PathBuf;

use crate::error::BoxError;

/// Trait for token retrieval - allows stubbing in tests
pub trait CredentialProvider: Send + Sync {
    /// Returns a token valid for at least the duration of one clone.
    fn get_token(&self) -> Result<String, BoxError>;
}

/// Always returns the same token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialProvider for StaticTokenProvider {
    fn get_token(&self) -> Result<String, BoxError> {
        Ok(self.token.clone())
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvTokenProvider {
    fn get_token(&self) -> Result<String, BoxError> {
        let token = env::var(&self.var)
            .map_err(|e| format!("reading token from ${}: {}", self.var, e))?;
        let token = token.trim();
        if token.is_empty() {
            return Err(format!("${} is empty", self.var).into());
        }
        Ok(token.to_string())
    }
}

/// Reads the token from a file on every call.
#[derive(Debug, Clone)]
pub struct FileTokenProvider {
    path: PathBuf,
}

impl FileTokenProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialProvider for FileTokenProvider {
    fn get_token(&self) -> Result<String, BoxError> {
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| format!("reading token file {}: {}", self.path.display(), e))?;
        let token = contents.trim();
        if token.is_empty() {
            return Err(format!("token file {} is empty", self.path.display()).into());
        }
        Ok(token.to_string())
    }
}
