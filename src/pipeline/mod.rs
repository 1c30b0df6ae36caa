//! The sync run: every step in order, each awaited before the next starts.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::client::HttpTransport;
use crate::config::SyncConfig;
use crate::git::GitSync;
use crate::grafana::{GrafanaClient, UploadReport};
use crate::process::CommandRunner;
use crate::scripts::{regular_files, CopiedScript, ScriptCopier};
use crate::venv::{EnvironmentProvisioner, ProvisionReport};
use crate::zabbix::{ImportOutcome, ZabbixClient};
use crate::SyncResult;

/// Checkout sub-directories inside the working directory
pub const TEMPLATES_CHECKOUT: &str = "zbx_tpl";
pub const SCRIPTS_CHECKOUT: &str = "zbx_scr";
pub const DASHBOARDS_CHECKOUT: &str = "graf_dash";

pub const SUCCESS_BANNER: &str = "Auto-update completed successfully.";

/// Everything a completed run touched
#[derive(Debug)]
pub struct SyncReport {
    pub work_dir: PathBuf,
    pub templates: Vec<(String, ImportOutcome)>,
    pub scripts: Vec<CopiedScript>,
    pub environment: ProvisionReport,
    pub dashboards: Vec<(String, SyncResult<UploadReport>)>,
}

pub struct SyncPipeline {
    config: SyncConfig,
    transport: Arc<dyn HttpTransport>,
    runner: Arc<dyn CommandRunner>,
}

impl SyncPipeline {
    pub fn new(
        config: SyncConfig,
        transport: Arc<dyn HttpTransport>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            transport,
            runner,
        }
    }

    /// [`run`](Self::run), then write the success banner to `out`. Nothing is
    /// written when a step fails fatally.
    pub async fn run_and_announce<W: Write>(&self, out: &mut W) -> SyncResult<SyncReport> {
        let report = self.run().await?;
        writeln!(out, "✓ {}", SUCCESS_BANNER)?;
        Ok(report)
    }

    /// Run all steps. The first fatal error stops the run; per-item failures
    /// are recorded in the report.
    pub async fn run(&self) -> SyncResult<SyncReport> {
        let work_dir = self.resolve_work_dir().await?;
        info!("Working directory: {}", work_dir.display());

        info!("Cloning git repositories...");
        let git = GitSync::new(self.runner.clone());
        let repos = &self.config.git_repos;
        let templates_dir = git
            .clone_or_pull(&repos.zabbix_templates, &work_dir.join(TEMPLATES_CHECKOUT))
            .await?;
        let scripts_dir = git
            .clone_or_pull(&repos.zabbix_scripts, &work_dir.join(SCRIPTS_CHECKOUT))
            .await?;
        let dashboards_dir = git
            .clone_or_pull(&repos.grafana_dashboards, &work_dir.join(DASHBOARDS_CHECKOUT))
            .await?;

        info!("Logging in to Zabbix...");
        let zabbix = ZabbixClient::new(self.transport.clone(), &self.config.zabbix.url);
        let token = zabbix
            .login(&self.config.zabbix.user, &self.config.zabbix.password)
            .await?;

        info!("Importing Zabbix templates...");
        let templates = self.import_templates(&zabbix, &token, &templates_dir).await?;

        info!("Copying all files from Zabbix script repo...");
        let scripts = ScriptCopier::new(self.config.externalscript_dir())
            .copy_all(&scripts_dir)
            .await?;

        info!("Setting up virtual environment...");
        let environment = EnvironmentProvisioner::new(
            self.runner.clone(),
            &self.config.python,
            self.config.externalscript_dir(),
        )
        .provision()
        .await?;

        info!("Uploading Grafana dashboards...");
        let grafana = GrafanaClient::new(
            self.transport.clone(),
            self.config.grafana_base_url(),
            &self.config.grafana.api_key,
        );
        let dashboards = grafana.upload_dir(&dashboards_dir).await?;

        Ok(SyncReport {
            work_dir,
            templates,
            scripts,
            environment,
            dashboards,
        })
    }

    async fn import_templates(
        &self,
        zabbix: &ZabbixClient,
        token: &str,
        dir: &Path,
    ) -> SyncResult<Vec<(String, ImportOutcome)>> {
        let mut outcomes = Vec::new();
        for path in regular_files(dir).await? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let outcome = zabbix.import_template(token, &path).await;
            outcomes.push((name, outcome));
        }
        Ok(outcomes)
    }

    /// Configured `work_dir`, or a new temp dir that is left on disk after the run
    async fn resolve_work_dir(&self) -> SyncResult<PathBuf> {
        match &self.config.work_dir {
            Some(dir) => {
                tokio::fs::create_dir_all(dir).await?;
                Ok(dir.clone())
            }
            None => {
                let dir = tempfile::Builder::new().prefix("monsync-").tempdir()?;
                Ok(dir.keep())
            }
        }
    }
}
