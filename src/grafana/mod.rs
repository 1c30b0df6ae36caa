//! Grafana dashboard upload

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use crate::client::{HttpRequest, HttpTransport};
use crate::SyncResult;

pub const DASHBOARDS_ENDPOINT: &str = "/api/dashboards/db";

/// Status and body of a dashboard upload, exactly as Grafana returned them
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub status: u16,
    pub body: String,
}

pub struct GrafanaClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: String,
}

impl GrafanaClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, DASHBOARDS_ENDPOINT)
    }

    /// Upload one dashboard definition, overwriting any existing one with the same uid.
    ///
    /// Whatever status Grafana answers with is logged and returned; an error
    /// means the file could not be read or the request never completed.
    pub async fn upload_dashboard(&self, path: &Path) -> SyncResult<UploadReport> {
        let content = tokio::fs::read_to_string(path).await?;
        let dashboard: Value = serde_json::from_str(&content)?;

        let payload = serde_json::json!({
            "dashboard": dashboard,
            "overwrite": true,
        });
        let request = HttpRequest::post(self.endpoint(), payload).with_bearer(&self.api_key);
        let reply = self.transport.send(request).await?;

        info!(
            "Dashboard upload result for {}: {} {}",
            path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            reply.status,
            reply.body
        );

        Ok(UploadReport {
            status: reply.status,
            body: reply.body,
        })
    }

    /// Upload every `.json` file in `dir`, sorted by name. Per-file failures
    /// are logged and skipped.
    pub async fn upload_dir(
        &self,
        dir: &Path,
    ) -> SyncResult<Vec<(String, SyncResult<UploadReport>)>> {
        let mut results = Vec::new();
        for path in crate::scripts::regular_files(dir).await? {
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            if !is_json {
                continue;
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let result = self.upload_dashboard(&path).await;
            if let Err(e) = &result {
                error!("Dashboard upload failed for {}: {}", name, e.user_message());
            }
            results.push((name, result));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HttpReply, MockHttpTransport};

    #[tokio::test]
    async fn test_upload_wraps_dashboard_with_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("node-exporter.json");
        std::fs::write(&path, r#"{"uid":"node","title":"Node Exporter"}"#).unwrap();

        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.url == "https://grafana.example.com/api/dashboards/db"
                    && req.bearer.as_deref() == Some("glsa_abc")
                    && req.body["overwrite"] == true
                    && req.body["dashboard"]["uid"] == "node"
            })
            .times(1)
            .returning(|_| {
                Ok(HttpReply::new(
                    200,
                    r#"{"status":"success","uid":"node","version":3}"#,
                ))
            });

        let grafana =
            GrafanaClient::new(Arc::new(transport), "https://grafana.example.com/", "glsa_abc");
        let report = grafana.upload_dashboard(&path).await.unwrap();

        assert_eq!(report.status, 200);
        assert!(report.body.contains("\"version\":3"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported_not_raised() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("d.json");
        std::fs::write(&path, "{}").unwrap();

        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(HttpReply::new(401, r#"{"message":"invalid API key"}"#)));

        let grafana = GrafanaClient::new(Arc::new(transport), "https://grafana.example.com", "bad");
        let report = grafana.upload_dashboard(&path).await.unwrap();

        assert_eq!(report.status, 401);
        assert_eq!(report.body, r#"{"message":"invalid API key"}"#);
    }

    #[tokio::test]
    async fn test_upload_dir_only_sends_json_and_survives_bad_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.json"), "{not json").unwrap();
        std::fs::write(tmp.path().join("b.json"), r#"{"uid":"b"}"#).unwrap();
        std::fs::write(tmp.path().join("README.md"), "# dashboards").unwrap();

        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.body["dashboard"]["uid"] == "b")
            .times(1)
            .returning(|_| Ok(HttpReply::new(200, "{}")));

        let grafana = GrafanaClient::new(Arc::new(transport), "https://grafana.example.com", "k");
        let results = grafana.upload_dir(tmp.path()).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "a.json");
        assert!(results[0].1.is_err());
        assert_eq!(results[1].1.as_ref().unwrap().status, 200);
    }
}
