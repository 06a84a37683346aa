//! Default values for pr-workspace configuration.
//!
//! This module provides centralized default values used by the configuration
//! loader and the CLI, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// GitHub host credentials are written for when none is configured.
pub const DEFAULT_GITHUB_HOSTNAME: &str = "github.com";

/// Environment variable the installation token is read from by default.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Returns the default data directory holding cloned workspaces.
///
/// Uses the platform-appropriate data directory:
/// - Linux: `~/.local/share/pr-workspace` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/pr-workspace`
/// - Windows: `{FOLDERID_RoamingAppData}\pr-workspace`
///
/// Falls back to `.pr-workspace` in the current directory if the platform
/// data directory cannot be determined.
///
/// This can be overridden by `data_dir` in the configuration file, the
/// `--data-dir` CLI flag or the `PR_WORKSPACE_DATA_DIR` environment variable.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".pr-workspace"))
        .join("pr-workspace")
}

/// Returns the configuration file read when `--config` is not given.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pr-workspace").join("config.yaml"))
}
