//! # Error Handling
//!
//! This module defines the error type shared by every part of the
//! `pr-workspace` library. It uses `thiserror` to derive `Display` and
//! `std::error::Error` for a single `Error` enum.
//!
//! ## Error Kinds
//!
//! - **`Credential`**: the credential provider could not produce a token.
//! - **`Config`**: the environment is missing something required, such as a
//!   resolvable home directory.
//! - **`ConfigParse`**: the YAML configuration file could not be parsed.
//! - **`Io`**: a directory or credential-file operation failed.
//! - **`Clone`**: an external `git` command failed.
//!
//! Every string carried by `Clone` has already been passed through the
//! sanitizer by the time the error is constructed, so the rendered message is
//! safe to log or return to users.

use thiserror::Error;

/// Boxed error returned by pluggable collaborators such as credential providers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for pr-workspace operations
#[derive(Error, Debug)]
pub enum Error {
    /// The credential provider failed to produce a token.
    #[error("Credential error: {message}: {source}")]
    Credential {
        message: String,
        #[source]
        source: BoxError,
    },

    /// A required piece of host configuration could not be resolved.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The configuration file could not be parsed.
    ///
    /// Includes an optional hint about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A filesystem operation failed.
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// An external git command failed.
    ///
    /// `command`, `output` and `message` are sanitized independently.
    #[error("running {command}: {output}: {message}")]
    Clone {
        command: String,
        output: String,
        message: String,
    },

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Wraps an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
