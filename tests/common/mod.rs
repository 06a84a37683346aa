//! Shared test utilities for integration and E2E tests.
//!
//! [`GitFixture`] builds a local "remote" repository that looks like a GitHub
//! repository with one open pull request: a `main` branch, a `feature`
//! branch, and `refs/pull/1/head` pointing at the feature tip.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = GitFixture::new();
//! let url = fixture.clone_url();
//! ```

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use assert_fs::prelude::*;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git, GitFixture, FIXTURE_TOKEN, PR_NUMBER};
}

/// Pull request number the fixture publishes under `refs/pull/<n>/head`.
pub const PR_NUMBER: u64 = 1;

/// Token handed to the CLI in end-to-end tests.
pub const FIXTURE_TOKEN: &str = "ghs_fixtureToken0123456789";

/// Runs git in `dir` and returns trimmed stdout, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=fixture",
            "-c",
            "user.email=fixture@example.com",
            "-c",
            "init.defaultBranch=main",
        ])
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A temporary directory holding a fixture upstream repository, plus room
/// for workspaces and a fake home directory.
pub struct GitFixture {
    temp_dir: assert_fs::TempDir,
    /// Tip of `main` when the fixture was built.
    pub base_commit: String,
    /// Tip of `feature`, also published as `refs/pull/1/head`.
    pub head_commit: String,
}

impl GitFixture {
    /// Creates the upstream repository with `main` moved past the point
    /// where `feature` branched off.
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Creates the upstream repository with `main` still at the commit
    /// `feature` branched from, so merging the pull request could
    /// fast-forward.
    pub fn at_fork_point() -> Self {
        Self::build(false)
    }

    fn build(diverge_main: bool) -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir.child("home").create_dir_all().unwrap();
        let upstream = temp_dir.child("upstream");
        upstream.create_dir_all().unwrap();
        let dir = upstream.path();

        git(dir, &["init", "-q"]);
        upstream.child("main.tf").write_str("# base\n").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-q", "-m", "initial"]);

        git(dir, &["checkout", "-q", "-b", "feature"]);
        upstream.child("feature.tf").write_str("# feature\n").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-q", "-m", "add feature"]);
        let head_commit = git(dir, &["rev-parse", "HEAD"]);

        git(dir, &["checkout", "-q", "main"]);
        if diverge_main {
            upstream.child("other.tf").write_str("# other\n").unwrap();
            git(dir, &["add", "."]);
            git(dir, &["commit", "-q", "-m", "diverge main"]);
        }
        let base_commit = git(dir, &["rev-parse", "HEAD"]);

        let pull_ref = format!("refs/pull/{}/head", PR_NUMBER);
        git(dir, &["update-ref", pull_ref.as_str(), head_commit.as_str()]);

        Self {
            temp_dir,
            base_commit,
            head_commit,
        }
    }

    /// Root of the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the upstream repository.
    pub fn upstream(&self) -> PathBuf {
        self.path().join("upstream")
    }

    /// `file://` URL of the upstream repository. Shallow clones need the
    /// URL form rather than a plain path.
    pub fn clone_url(&self) -> String {
        format!("file://{}", self.upstream().display())
    }

    /// Directory used as `HOME` by end-to-end tests.
    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    /// Directory workspaces are created under.
    pub fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    /// Adds a commit to `feature` and moves the pull request ref to it.
    pub fn push_to_feature(&self, file: &str) -> String {
        let dir = self.upstream();
        git(&dir, &["checkout", "-q", "feature"]);
        std::fs::write(dir.join(file), "# pushed\n").unwrap();
        git(&dir, &["add", "."]);
        git(&dir, &["commit", "-q", "-m", "push"]);
        let commit = git(&dir, &["rev-parse", "HEAD"]);
        let pull_ref = format!("refs/pull/{}/head", PR_NUMBER);
        git(&dir, &["update-ref", pull_ref.as_str(), commit.as_str()]);
        git(&dir, &["checkout", "-q", "main"]);
        commit
    }

    /// A `pr-workspace` command with `HOME`, data dir and token pointed at
    /// this fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pr-workspace");
        cmd.current_dir(self.path())
            .env("HOME", self.home())
            .env("GITHUB_TOKEN", FIXTURE_TOKEN)
            .env("PR_WORKSPACE_DATA_DIR", self.data_dir())
            .env_remove("PR_WORKSPACE_CONFIG")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for GitFixture {
    fn default() -> Self {
        Self::new()
    }
}
