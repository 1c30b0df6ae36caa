//! CLI utility functions.

use std::path::PathBuf;
use tracing::info;

use crate::config::{ConfigurationValidator, SyncConfig};
use crate::{SyncError, SyncResult};

/// Pick the config file: explicit path if given, else the first default
/// location that exists.
pub fn resolve_config_path(
    explicit: Option<PathBuf>,
    candidates: &[PathBuf],
) -> SyncResult<PathBuf> {
    if let Some(path) = explicit {
        info!("Using config file: {}", path.display());
        if !path.exists() {
            return Err(SyncError::configuration("config file not found", Some(path)));
        }
        return Ok(path);
    }

    candidates
        .iter()
        .find(|path| path.exists())
        .cloned()
        .ok_or_else(|| {
            let searched: Vec<String> =
                candidates.iter().map(|p| p.display().to_string()).collect();
            SyncError::configuration(
                format!("no config file found (searched: {})", searched.join(", ")),
                None,
            )
        })
}

/// Load configuration with precedence: CLI flags > environment > file
pub fn load_sync_config(
    config_path: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    strict: bool,
) -> SyncResult<SyncConfig> {
    let path = resolve_config_path(config_path, &SyncConfig::default_locations())?;
    let mut config = SyncConfig::from_file(&path)?;

    config.apply_env_overrides();
    if let Some(dir) = work_dir {
        info!("Using work dir from command line: {}", dir.display());
        config.work_dir = Some(dir);
    }

    ConfigurationValidator::new(strict).validate_config(&config)?;
    Ok(config)
}
