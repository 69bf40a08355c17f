// ABOUTME: Configuration types and parsing for cutover.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and template generation.

mod env_value;

pub use env_value::EnvValue;

use crate::error::{Error, Result};
use crate::types::AppName;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "cutover.yml";
pub const CONFIG_FILENAME_ALT: &str = "cutover.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".cutover/config.yml";

/// Deployments endpoint of the hosted APM service. Overridable per config
/// so tests and on-premise installations can point elsewhere.
pub const DEFAULT_APM_ENDPOINT: &str = "https://api.newrelic.com/deployments.xml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_app_name")]
    pub name: AppName,

    /// Base URL of the control-plane API, e.g. `https://paas.example.com`.
    pub host: String,

    /// Control-plane auth token, literal or `{env: VAR}`.
    pub token: EnvValue,

    /// Units left on the outgoing slot after a swap.
    #[serde(default)]
    pub keep_units: u32,

    /// Lifecycle hook commands keyed by hook name. Any name is a valid
    /// key; the orchestrator looks up the names it knows about and an
    /// absent entry means "nothing to run".
    #[serde(default)]
    pub hooks: HashMap<String, String>,

    #[serde(default)]
    pub apm: Option<ApmConfig>,

    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApmConfig {
    pub api_key: String,
    pub app_id: String,

    #[serde(default = "default_apm_endpoint")]
    pub endpoint: String,
}

fn default_apm_endpoint() -> String {
    DEFAULT_APM_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    pub endpoint: String,

    /// Pre-encoded form fields appended before the revision tag,
    /// e.g. `key1=value1&key2=value2`.
    #[serde(default)]
    pub payload_extras: String,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Hook command configured under the given name, if any.
    pub fn hook(&self, name: &str) -> Option<&str> {
        self.hooks.get(name).map(String::as_str)
    }

    pub fn template() -> Self {
        Config {
            name: AppName::new("my-app").unwrap(),
            host: "https://paas.example.com".to_string(),
            token: EnvValue::FromEnv {
                var: "PAAS_TOKEN".to_string(),
                default: None,
            },
            keep_units: 0,
            hooks: HashMap::new(),
            apm: None,
            webhook: None,
        }
    }
}

pub fn init_config(dir: &Path, name: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(n) = name {
        config.name = AppName::new(n).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"name: {}
host: {}
token:
  env: PAAS_TOKEN
keep_units: {}
hooks:
  before_pre: ./scripts/smoke-test.sh
  after_swap: ./scripts/announce.sh
"#,
        config.name, config.host, config.keep_units
    )
}

// Custom deserializers

fn deserialize_app_name<'de, D>(deserializer: D) -> std::result::Result<AppName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    AppName::new(&s).map_err(serde::de::Error::custom)
}
