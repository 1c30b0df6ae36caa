//! Git checkout management

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::process::{CommandRunner, Invocation};
use crate::{SyncError, SyncResult};

/// Clones or updates local checkouts with the `git` binary
pub struct GitSync {
    runner: Arc<dyn CommandRunner>,
    git: String,
}

impl GitSync {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            git: "git".to_string(),
        }
    }

    /// Pull `origin` into `local_dir` if it exists, otherwise clone `url` there.
    ///
    /// Pulls are fast-forward only; a diverged checkout is an error.
    pub async fn clone_or_pull(&self, url: &str, local_dir: &Path) -> SyncResult<PathBuf> {
        let invocation = if local_dir.exists() {
            info!("Pulling {} into {}", url, local_dir.display());
            Invocation::new(&self.git, ["pull", "--ff-only", "origin"]).current_dir(local_dir)
        } else {
            info!("Cloning {} into {}", url, local_dir.display());
            Invocation::new(
                &self.git,
                ["clone".to_string(), url.to_string(), local_dir.display().to_string()],
            )
        };

        let output = self
            .runner
            .run(invocation)
            .await
            .map_err(|e| SyncError::git(e.to_string(), Some(url.to_string())))?;

        if !output.success {
            return Err(SyncError::git(output.failure_reason(), Some(url.to_string())));
        }

        Ok(local_dir.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{CommandOutput, MockCommandRunner};
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_clone_then_pull() {
        let tmp = tempfile::tempdir().unwrap();
        let checkout = tmp.path().join("zbx_tpl");
        let seen: Arc<Mutex<Vec<Invocation>>> = Arc::new(Mutex::new(Vec::new()));

        let mut runner = MockCommandRunner::new();
        let log = seen.clone();
        runner.expect_run().times(2).returning(move |inv| {
            if inv.args[0] == "clone" {
                std::fs::create_dir_all(&inv.args[2]).unwrap();
            }
            log.lock().unwrap().push(inv);
            Ok(CommandOutput::succeeded())
        });

        let git = GitSync::new(Arc::new(runner));
        let url = "https://git.example.com/zbx-templates.git";

        let first = git.clone_or_pull(url, &checkout).await.unwrap();
        let second = git.clone_or_pull(url, &checkout).await.unwrap();
        assert_eq!(first, checkout);
        assert_eq!(second, checkout);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].args, vec!["clone", url, checkout.to_str().unwrap()]);
        assert_eq!(seen[1].args, vec!["pull", "--ff-only", "origin"]);
        assert_eq!(seen[1].cwd.as_deref(), Some(checkout.as_path()));
    }

    #[tokio::test]
    async fn test_failed_pull_is_git_error() {
        let tmp = tempfile::tempdir().unwrap();

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_| Ok(CommandOutput::failed(128, "fatal: not a git repository")));

        let git = GitSync::new(Arc::new(runner));
        let err = git
            .clone_or_pull("https://git.example.com/scripts.git", tmp.path())
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert!(err.user_message().contains("not a git repository"));
    }
}
