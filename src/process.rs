//! External process execution.
//!
//! Git is driven through the system `git` binary, which picks up whatever
//! credential helpers and configuration the host provides. The
//! [`CommandRunner`] trait keeps that behind a seam so command sequences can
//! be exercised in tests without spawning real processes.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Result of running a command to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// All of stdout, then all of stderr. Lines of the two streams are not
    /// interleaved in the order the process wrote them.
    pub combined: String,
}

impl CommandOutput {
    /// Human-readable description of a failed exit, e.g. `exit status: 128`.
    pub fn status_message(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Trait for process execution - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Runs `argv` in `dir` with `env` added to the inherited environment.
    ///
    /// An `Err` means the process could not be spawned at all; a process that
    /// ran and exited non-zero is reported through `CommandOutput::success`.
    fn run(&self, argv: &[String], dir: &Path, env: &[(String, String)]) -> io::Result<CommandOutput>;
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, argv: &[String], dir: &Path, env: &[(String, String)]) -> io::Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(dir)
            // Never block on an interactive credential prompt.
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        for (key, value) in env {
            cmd.env(key, value);
        }

        let output = cmd.output()?;
        // Streams are captured separately; stderr is appended after stdout.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            combined,
        })
    }
}
