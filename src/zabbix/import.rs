//! `configuration.import` request building

use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Template file formats understood by `configuration.import`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateFormat {
    Xml,
    Json,
    Yaml,
}

impl TemplateFormat {
    /// Format from a file extension, case-insensitive. `yml` maps to YAML.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xml" => Some(Self::Xml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Create-or-update switch for one object kind
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRule {
    pub create_missing: bool,
    pub update_existing: bool,
}

impl ImportRule {
    pub const CREATE_OR_UPDATE: Self = Self {
        create_missing: true,
        update_existing: true,
    };
}

/// Rules sent with every import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRules {
    pub templates: ImportRule,
    pub items: ImportRule,
    pub triggers: ImportRule,
    pub discovery_rules: ImportRule,
    pub graphs: ImportRule,
    pub value_maps: ImportRule,
    #[serde(rename = "httptests")]
    pub http_tests: ImportRule,
}

impl Default for ImportRules {
    fn default() -> Self {
        let rule = ImportRule::CREATE_OR_UPDATE;
        Self {
            templates: rule,
            items: rule,
            triggers: rule,
            discovery_rules: rule,
            graphs: rule,
            value_maps: rule,
            http_tests: rule,
        }
    }
}

/// `params` object for `configuration.import`
pub fn import_params(format: TemplateFormat, source: &str) -> Value {
    serde_json::json!({
        "format": format,
        "rules": ImportRules::default(),
        "source": source,
    })
}
