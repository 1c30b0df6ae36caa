//! Subprocess execution
//!
//! Git and the Python venv tooling are external programs. They run through
//! [`CommandRunner`] so the callers can be tested without spawning anything.

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::{SyncError, SyncResult};

/// A program invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    /// Short reason for a failed run: stderr when present, else the exit code
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs a program to completion. A program that cannot be spawned is an
/// error; a non-zero exit is reported in [`CommandOutput`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: Invocation) -> SyncResult<CommandOutput>;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Default, Clone)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: Invocation) -> SyncResult<CommandOutput> {
        debug!("Running: {}", invocation);

        let mut command = tokio::process::Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .await
            .map_err(|e| {
                SyncError::command(format!("failed to spawn: {}", e), &invocation.program)
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let inv =
            Invocation::new("git", ["pull", "--ff-only", "origin"]).current_dir("/tmp/zbx_tpl");
        assert_eq!(inv.to_string(), "git pull --ff-only origin");
        assert_eq!(inv.cwd, Some(PathBuf::from("/tmp/zbx_tpl")));
    }

    #[test]
    fn test_failure_reason() {
        assert_eq!(
            CommandOutput::failed(128, "fatal: not a git repository\n").failure_reason(),
            "fatal: not a git repository"
        );
        assert_eq!(CommandOutput::failed(2, "").failure_reason(), "exit status 2");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = TokioCommandRunner::new();
        let result = runner
            .run(Invocation::new("monsync-definitely-not-a-program", Vec::<String>::new()))
            .await;

        match result {
            Err(SyncError::Command { program, .. }) => {
                assert_eq!(program, "monsync-definitely-not-a-program")
            }
            other => panic!("Expected Command error, got {:?}", other),
        }
    }
}
