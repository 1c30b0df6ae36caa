//! Zabbix JSON-RPC API client.
//!
//! Wraps `user.login` and `configuration.import` on top of an
//! [`HttpTransport`].

pub mod import;

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::client::{HttpRequest, HttpTransport};
use crate::jsonrpc::{methods, JsonRpcRequest, JsonRpcResponse};
use crate::{SyncError, SyncResult};

pub use import::{import_params, ImportRule, ImportRules, TemplateFormat};

const LOGIN_REQUEST_ID: u64 = 1;
const IMPORT_REQUEST_ID: u64 = 2;

/// Result of importing one template file
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported,
    /// Extension is not one of xml/json/yaml/yml; nothing was sent
    Skipped,
    /// Server error detail, or the local reason the request never completed
    Failed(String),
    /// Reply body that was not JSON-RPC
    InvalidResponse(String),
}

/// Client for one Zabbix API endpoint
pub struct ZabbixClient {
    transport: Arc<dyn HttpTransport>,
    url: String,
}

impl ZabbixClient {
    /// * `url` - full endpoint, e.g. `https://zabbix.example.com/api_jsonrpc.php`.
    pub fn new(transport: Arc<dyn HttpTransport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Authenticate and return the session token.
    ///
    /// Every failure is a [`SyncError::ZabbixLogin`]: the run cannot continue
    /// without a token.
    pub async fn login(&self, user: &str, password: &str) -> SyncResult<String> {
        let rpc = JsonRpcRequest::new(
            methods::USER_LOGIN,
            serde_json::json!({
                "username": user,
                "password": password,
            }),
            LOGIN_REQUEST_ID,
        );

        let reply = self
            .transport
            .send(HttpRequest::post(&self.url, rpc.to_value()))
            .await
            .map_err(|e| SyncError::zabbix_login(e.to_string(), None))?;

        if !reply.is_success() {
            return Err(SyncError::zabbix_login(
                format!("HTTP status {}", reply.status),
                Some(reply.body),
            ));
        }

        let response: JsonRpcResponse = match serde_json::from_str(&reply.body) {
            Ok(response) => response,
            Err(e) => {
                return Err(SyncError::zabbix_login(
                    format!("unparsable reply: {}", e),
                    Some(reply.body),
                ))
            }
        };

        match response.result_str() {
            Some(token) => {
                info!("Zabbix login successful");
                debug!("Zabbix auth token: {}", token);
                Ok(token.to_string())
            }
            None => Err(SyncError::zabbix_login("reply has no result", Some(reply.body))),
        }
    }

    /// Import one template file. Never fails the run: every problem is an
    /// [`ImportOutcome`] and is logged here.
    pub async fn import_template(&self, token: &str, path: &Path) -> ImportOutcome {
        let name = file_name(path);

        let Some(format) = TemplateFormat::from_path(path) else {
            warn!("Unsupported template format: {}", path.display());
            return ImportOutcome::Skipped;
        };

        let source = match tokio::fs::read_to_string(path).await {
            Ok(source) => source,
            Err(e) => {
                error!("Failed to read template {}: {}", name, e);
                return ImportOutcome::Failed(e.to_string());
            }
        };

        let rpc = JsonRpcRequest::new(
            methods::CONFIGURATION_IMPORT,
            import_params(format, &source),
            IMPORT_REQUEST_ID,
        );
        let request = HttpRequest::post(&self.url, rpc.to_value()).with_bearer(token);

        let reply = match self.transport.send(request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Import request for {} failed: {}", name, e);
                return ImportOutcome::Failed(e.to_string());
            }
        };

        match serde_json::from_str::<JsonRpcResponse>(&reply.body) {
            Ok(response) => match response.error {
                Some(err) => {
                    let detail = err.detail();
                    error!("Import failed for {}: {}", name, detail);
                    ImportOutcome::Failed(detail)
                }
                None => {
                    info!("Successfully imported {} ({})", name, format.as_str());
                    ImportOutcome::Imported
                }
            },
            Err(_) => {
                error!("Invalid response format for {}: {}", name, reply.body);
                ImportOutcome::InvalidResponse(reply.body)
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
