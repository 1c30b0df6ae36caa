//! Python virtual environment provisioning for the external scripts

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::process::{CommandRunner, Invocation};
use crate::{SyncError, SyncResult};

pub const VENV_DIR: &str = "venv";
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

const VENV_MISSING_HINT: &str =
    "python3-venv is not installed. Please run: sudo apt install python3-venv";

/// What a provisioning run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionReport {
    pub created: bool,
    pub installed_requirements: bool,
}

pub struct EnvironmentProvisioner {
    runner: Arc<dyn CommandRunner>,
    python: String,
    scripts_dir: PathBuf,
}

impl EnvironmentProvisioner {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        python: impl Into<String>,
        scripts_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            python: python.into(),
            scripts_dir: scripts_dir.into(),
        }
    }

    pub fn venv_dir(&self) -> PathBuf {
        self.scripts_dir.join(VENV_DIR)
    }

    pub fn requirements_file(&self) -> PathBuf {
        self.scripts_dir.join(REQUIREMENTS_FILE)
    }

    pub fn pip(&self) -> PathBuf {
        self.venv_dir().join("bin").join("pip")
    }

    /// Ensure the venv exists, upgrade pip, and install requirements if present.
    ///
    /// Safe to repeat: an existing venv is reused, pip steps run every time.
    pub async fn provision(&self) -> SyncResult<ProvisionReport> {
        self.ensure_venv_tool().await?;

        let venv_dir = self.venv_dir();
        let created = if venv_dir.exists() {
            info!("Virtual environment already exists at {}", venv_dir.display());
            false
        } else {
            info!("Creating virtual environment at {}", venv_dir.display());
            self.run_checked(Invocation::new(
                &self.python,
                ["-m".to_string(), "venv".to_string(), path_arg(&venv_dir)],
            ))
            .await?;
            true
        };

        let pip = path_arg(&self.pip());
        self.run_checked(Invocation::new(&pip, ["install", "--upgrade", "pip"]))
            .await?;

        let requirements = self.requirements_file();
        let installed_requirements = if requirements.exists() {
            info!("Installing dependencies from {}", requirements.display());
            self.run_checked(Invocation::new(
                &pip,
                ["install".to_string(), "-r".to_string(), path_arg(&requirements)],
            ))
            .await?;
            true
        } else {
            warn!("No requirements.txt found at {}", requirements.display());
            false
        };

        Ok(ProvisionReport {
            created,
            installed_requirements,
        })
    }

    async fn ensure_venv_tool(&self) -> SyncResult<()> {
        let check = Invocation::new(&self.python, ["-c", "import venv"]);
        match self.runner.run(check).await {
            Ok(output) if output.success => Ok(()),
            Ok(output) => Err(SyncError::venv_unavailable(format!(
                "{} ({})",
                VENV_MISSING_HINT,
                output.failure_reason()
            ))),
            Err(e) => Err(SyncError::venv_unavailable(format!("{} ({})", VENV_MISSING_HINT, e))),
        }
    }

    async fn run_checked(&self, invocation: Invocation) -> SyncResult<()> {
        let program = invocation.program.clone();
        let description = invocation.to_string();
        let output = self.runner.run(invocation).await?;
        if !output.success {
            return Err(SyncError::command(
                format!("`{}`: {}", description, output.failure_reason()),
                program,
            ));
        }
        Ok(())
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}
