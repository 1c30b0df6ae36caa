//! CLI command implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::client::ReqwestTransport;
use crate::pipeline::SyncPipeline;
use crate::process::TokioCommandRunner;
use crate::SyncResult;

use super::utils::load_sync_config;

/// Load configuration and run one sync against the real services
pub async fn sync(
    config_path: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    strict: bool,
) -> SyncResult<()> {
    info!("Loading configuration...");
    let config = load_sync_config(config_path, work_dir, strict)?;

    let transport = ReqwestTransport::new(config.http_timeout_secs.map(Duration::from_secs))?;
    let pipeline = SyncPipeline::new(
        config,
        Arc::new(transport),
        Arc::new(TokioCommandRunner::new()),
    );

    let report = pipeline.run_and_announce(&mut std::io::stdout()).await?;
    debug!(
        "Processed {} templates, {} scripts, {} dashboards",
        report.templates.len(),
        report.scripts.len(),
        report.dashboards.len()
    );

    Ok(())
}
