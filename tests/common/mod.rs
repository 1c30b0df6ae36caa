#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use monsync::client::{HttpReply, HttpRequest, HttpTransport};
use monsync::config::SyncConfig;
use monsync::process::{CommandOutput, CommandRunner, Invocation};
use monsync::SyncResult;

pub const ZABBIX_URL: &str = "https://zbx.test/api_jsonrpc.php";
pub const GRAFANA_URL: &str = "https://grafana.test";
pub const TEMPLATES_REPO: &str = "https://git.test/zbx-templates.git";
pub const SCRIPTS_REPO: &str = "https://git.test/zbx-scripts.git";
pub const DASHBOARDS_REPO: &str = "https://git.test/dashboards.git";

/// Config pointing at the fake services, with checkouts and scripts under `root`
pub fn test_config(root: &Path) -> SyncConfig {
    let json = serde_json::json!({
        "zabbix": {"url": ZABBIX_URL, "user": "Admin", "password": "zabbix"},
        "grafana": {"url": GRAFANA_URL, "api_key": "glsa_test"},
        "externalscript_path": root.join("externalscripts"),
        "git_repos": {
            "zabbix_templates": TEMPLATES_REPO,
            "zabbix_scripts": SCRIPTS_REPO,
            "grafana_dashboards": DASHBOARDS_REPO
        },
        "work_dir": root.join("work"),
    });
    serde_json::from_value(json).expect("test config is valid")
}

/// HTTP fake answering Zabbix and Grafana calls and recording every request
pub struct FakeTransport {
    pub requests: Mutex<Vec<HttpRequest>>,
    pub login_reply: HttpReply,
    pub import_reply: HttpReply,
    pub dashboard_reply: HttpReply,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            login_reply: HttpReply::new(200, r#"{"jsonrpc":"2.0","result":"token-abc","id":1}"#),
            import_reply: HttpReply::new(200, r#"{"jsonrpc":"2.0","result":true,"id":2}"#),
            dashboard_reply: HttpReply::new(200, r#"{"status":"success"}"#),
        }
    }
}

impl FakeTransport {
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| match r.body.get("method").and_then(|m| m.as_str()) {
                Some(method) => method.to_string(),
                None => r.url.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> SyncResult<HttpReply> {
        let reply = match request.body.get("method").and_then(|m| m.as_str()) {
            Some("user.login") => self.login_reply.clone(),
            Some("configuration.import") => self.import_reply.clone(),
            _ => self.dashboard_reply.clone(),
        };
        self.requests.lock().unwrap().push(request);
        Ok(reply)
    }
}

/// Command fake: `git clone` copies a fixture tree, everything else succeeds.
pub struct FakeRunner {
    pub fixtures: HashMap<String, PathBuf>,
    pub invocations: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn new(fixtures: HashMap<String, PathBuf>) -> Self {
        Self {
            fixtures,
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, invocation: Invocation) -> SyncResult<CommandOutput> {
        let args: Vec<&str> = invocation.args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["clone", url, dest] => {
                let Some(fixture) = self.fixtures.get(*url) else {
                    let stderr = format!("fatal: repository '{}' not found", url);
                    return Ok(CommandOutput::failed(128, stderr));
                };
                copy_tree(fixture, Path::new(dest))?;
            }
            ["-m", "venv", dest] => std::fs::create_dir_all(dest)?,
            _ => {}
        }
        self.invocations.lock().unwrap().push(invocation);
        Ok(CommandOutput::succeeded())
    }
}

pub fn copy_tree(from: &Path, to: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Write `files` (name, content) into a fresh directory under `root`
pub fn fixture_repo(root: &Path, name: &str, files: &[(&str, &str)]) -> Result<PathBuf> {
    let dir = root.join("fixtures").join(name);
    std::fs::create_dir_all(dir.join(".git"))?;
    for (file, content) in files {
        std::fs::write(dir.join(file), content)?;
    }
    Ok(dir)
}

/// Whether a usable `git` binary is on PATH
pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
