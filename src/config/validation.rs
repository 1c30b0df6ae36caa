//! Configuration validation for monsync

use std::path::Path;
use tracing::{error, info, warn};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::config::settings::SyncConfig;
use crate::{SyncError, SyncResult};

/// Configuration validator collecting errors and warnings before a run
pub struct ConfigurationValidator {
    /// Whether to perform strict validation (fails on warnings)
    strict_mode: bool,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl ConfigurationValidator {
    pub fn new(strict_mode: bool) -> Self {
        Self {
            strict_mode,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Validate complete configuration
    pub fn validate_config(&mut self, config: &SyncConfig) -> SyncResult<()> {
        info!("Validating configuration");

        if let Err(errors) = config.validate() {
            collect_field_errors("", &errors, &mut self.errors);
        }

        self.validate_endpoints(config);
        self.validate_paths(config);
        self.validate_runtime(config);

        self.print_validation_summary();

        if !self.errors.is_empty() {
            return Err(SyncError::configuration(
                format!(
                    "validation failed with {} errors: {}",
                    self.errors.len(),
                    self.errors.join("; ")
                ),
                None,
            ));
        }

        if self.strict_mode && !self.warnings.is_empty() {
            return Err(SyncError::configuration(
                format!(
                    "validation failed in strict mode with {} warnings",
                    self.warnings.len()
                ),
                None,
            ));
        }

        Ok(())
    }

    fn validate_endpoints(&mut self, config: &SyncConfig) {
        let endpoints = [
            ("zabbix.url", &config.zabbix.url),
            ("grafana.url", &config.grafana.url),
        ];
        for (name, url) in endpoints {
            if url.starts_with("http://") {
                self.warnings.push(format!(
                    "{} uses plain http; credentials will be sent unencrypted",
                    name
                ));
            }
        }

        if config.zabbix.password.is_empty() {
            self.warnings.push("zabbix.password is empty".to_string());
        }
    }

    fn validate_paths(&mut self, config: &SyncConfig) {
        if !config.externalscript_path.is_empty()
            && Path::new(&config.externalscript_path).is_relative()
        {
            self.warnings.push(format!(
                "externalscript_path is relative ({}); it resolves against the current directory",
                config.externalscript_path
            ));
        }

        if let Some(work_dir) = &config.work_dir {
            if work_dir.exists() && !work_dir.is_dir() {
                self.errors.push(format!("work_dir is not a directory: {}", work_dir.display()));
            }
        }
    }

    fn validate_runtime(&mut self, config: &SyncConfig) {
        if config.python.trim().is_empty() {
            self.errors.push("python must name an interpreter".to_string());
        }

        if config.http_timeout_secs == Some(0) {
            self.warnings.push("http_timeout_secs is 0; every request will time out".to_string());
        }
    }

    fn print_validation_summary(&self) {
        for warning in &self.warnings {
            warn!("Configuration warning: {}", warning);
        }
        for err in &self.errors {
            error!("Configuration error: {}", err);
        }
        if self.errors.is_empty() && self.warnings.is_empty() {
            info!("Configuration validation passed");
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Flatten nested `validator` errors into `section.field: message` strings
fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for e in field_errors {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed `{}` check", e.code));
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}
