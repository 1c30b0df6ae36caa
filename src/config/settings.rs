use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use validator::Validate;

use crate::{ResultExt, SyncError, SyncResult};

/// File name looked up in the current directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "auto_update_config.json";

/// Run configuration, loaded once and read-only afterwards
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SyncConfig {
    #[validate(nested)]
    pub zabbix: ZabbixConfig,

    #[validate(nested)]
    pub grafana: GrafanaConfig,

    #[validate(length(min = 1, message = "externalscript_path must not be empty"))]
    pub externalscript_path: String,

    #[validate(nested)]
    pub git_repos: GitRepos,

    /// Checkout directory reused across runs; a fresh temp dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,

    #[serde(default = "default_python")]
    pub python: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ZabbixConfig {
    /// Full JSON-RPC endpoint, e.g. `https://zabbix.example.com/api_jsonrpc.php`
    #[validate(url(message = "zabbix.url is not a valid URL"))]
    pub url: String,

    #[validate(length(min = 1, message = "zabbix.user must not be empty"))]
    pub user: String,

    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GrafanaConfig {
    #[validate(url(message = "grafana.url is not a valid URL"))]
    pub url: String,

    #[validate(length(min = 1, message = "grafana.api_key must not be empty"))]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GitRepos {
    #[validate(length(min = 1))]
    pub zabbix_templates: String,

    #[validate(length(min = 1))]
    pub zabbix_scripts: String,

    #[validate(length(min = 1))]
    pub grafana_dashboards: String,
}

fn default_python() -> String {
    "python3".to_string()
}

impl SyncConfig {
    /// Load from a file. `.toml` files are parsed as TOML, everything else as JSON.
    pub fn from_file(path: &Path) -> SyncResult<Self> {
        if !path.exists() {
            return Err(SyncError::configuration(
                "config file not found",
                Some(path.to_path_buf()),
            ));
        }

        let content = std::fs::read_to_string(path).with_config_context(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let config = if is_toml {
            Self::from_toml_str(&content).with_config_context(path)?
        } else {
            Self::from_json_str(&content).with_config_context(path)?
        };

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Candidate locations when no explicit path is given, in lookup order
    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            locations.push(dir.join("monsync").join("config.json"));
        }
        locations
    }

    /// Apply `MONSYNC_*` environment overrides on top of file values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup, keyed by env var name
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 6] = [
            ("MONSYNC_ZABBIX_URL", &mut self.zabbix.url),
            ("MONSYNC_ZABBIX_USER", &mut self.zabbix.user),
            ("MONSYNC_ZABBIX_PASSWORD", &mut self.zabbix.password),
            ("MONSYNC_GRAFANA_URL", &mut self.grafana.url),
            ("MONSYNC_GRAFANA_API_KEY", &mut self.grafana.api_key),
            ("MONSYNC_EXTERNALSCRIPT_PATH", &mut self.externalscript_path),
        ];

        for (key, field) in fields {
            if let Some(value) = lookup(key) {
                debug!("Overriding configuration from {}", key);
                *field = value;
            }
        }

        if let Some(value) = lookup("MONSYNC_WORK_DIR") {
            debug!("Overriding configuration from MONSYNC_WORK_DIR");
            self.work_dir = Some(PathBuf::from(value));
        }
    }

    pub fn externalscript_dir(&self) -> PathBuf {
        PathBuf::from(&self.externalscript_path)
    }

    /// Grafana base URL without a trailing slash
    pub fn grafana_base_url(&self) -> &str {
        self.grafana.url.trim_end_matches('/')
    }
}
