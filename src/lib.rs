//! Monsync
//!
//! Pulls Zabbix templates, external scripts and Grafana dashboards from git
//! and pushes them into live Zabbix and Grafana instances.

use std::path::PathBuf;

pub mod cli;
pub mod client;
pub mod config;
pub mod git;
pub mod grafana;
pub mod jsonrpc;
pub mod pipeline;
pub mod process;
pub mod scripts;
pub mod venv;
pub mod zabbix;

/// Application-wide error types with context preservation
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Configuration error: {message}")]
    Configuration { message: String, path: Option<PathBuf> },

    #[error("Zabbix login failed: {message}")]
    ZabbixLogin { message: String, payload: Option<String> },

    #[error("Git error: {message}")]
    Git { message: String, repo: Option<String> },

    #[error("Virtual environment tool unavailable: {message}")]
    VenvUnavailable { message: String },

    #[error("Command failed: {message}")]
    Command { message: String, program: String },

    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl SyncError {
    /// Create a configuration error with optional file path
    pub fn configuration(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Configuration {
            message: message.into(),
            path,
        }
    }

    /// Create a login error, keeping the raw server payload when there is one
    pub fn zabbix_login(message: impl Into<String>, payload: Option<String>) -> Self {
        Self::ZabbixLogin {
            message: message.into(),
            payload,
        }
    }

    /// Create a git error with optional repository location
    pub fn git(message: impl Into<String>, repo: Option<String>) -> Self {
        Self::Git {
            message: message.into(),
            repo,
        }
    }

    pub fn venv_unavailable(message: impl Into<String>) -> Self {
        Self::VenvUnavailable {
            message: message.into(),
        }
    }

    pub fn command(message: impl Into<String>, program: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
            program: program.into(),
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::Configuration { .. } => 2,
            SyncError::ZabbixLogin { .. } => 3,
            SyncError::Git { .. } => 4,
            SyncError::VenvUnavailable { .. } => 5,
            SyncError::Command { .. } => 1,
            SyncError::Http { .. } => 1,
            SyncError::Io { .. } => 1,
            SyncError::Serialization { .. } => 1,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Configuration { message, path } => {
                if let Some(p) = path {
                    format!("Configuration issue ({}): {}", p.display(), message)
                } else {
                    format!("Configuration issue: {}", message)
                }
            }
            SyncError::ZabbixLogin { message, payload } => {
                if let Some(body) = payload {
                    format!("Zabbix login failed: {} ({})", message, body)
                } else {
                    format!("Zabbix login failed: {}", message)
                }
            }
            SyncError::Git { message, repo } => {
                if let Some(r) = repo {
                    format!("Git error ({}): {}", r, message)
                } else {
                    format!("Git error: {}", message)
                }
            }
            SyncError::VenvUnavailable { message } => message.clone(),
            SyncError::Command { message, program } => {
                format!("Command `{}` failed: {}", program, message)
            }
            SyncError::Http { source } => {
                format!("Communication error: {}", source)
            }
            SyncError::Io { source } => {
                format!("File system error: {}", source)
            }
            SyncError::Serialization { source } => {
                format!("Data format error: {}", source)
            }
        }
    }
}

/// Convenience type alias for Results
pub type SyncResult<T> = Result<T, SyncError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn with_config_context(self, path: &std::path::Path) -> SyncResult<T>;
    fn with_repo_context(self, repo: &str) -> SyncResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_config_context(self, path: &std::path::Path) -> SyncResult<T> {
        self.map_err(|e| SyncError::configuration(e.to_string(), Some(path.to_path_buf())))
    }

    fn with_repo_context(self, repo: &str) -> SyncResult<T> {
        self.map_err(|e| SyncError::git(e.to_string(), Some(repo.to_string())))
    }
}
