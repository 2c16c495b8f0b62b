//! Client configuration.
//!
//! Values come from `ClientConfig::new` or from `COMPUTE_`-prefixed
//! environment variables:
//!
//! | variable               | field          |
//! |------------------------|----------------|
//! | `COMPUTE_URL`          | `url`          |
//! | `COMPUTE_LEGACY_URL`   | `legacy_url`   |
//! | `COMPUTE_BEARER_TOKEN` | `bearer_token` |
//!
//! Nested keys use `__`, e.g. `COMPUTE_HEADERS__X_CORRELATION_ID`.

use std::collections::{BTreeMap, HashMap};

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Base URL of the current API.
pub const DEFAULT_SERVICE_URL: &str = "https://api.au-syd.codeengine.cloud.ibm.com/v2";

/// Base URL of the deprecated API that still serves kubeconfig retrieval.
pub const DEFAULT_LEGACY_URL: &str = "https://api.us-south.codeengine.cloud.ibm.com/api/v1";

const ENV_PREFIX: &str = "COMPUTE";
const ENV_PREFIX_SEPARATOR: &str = "_";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_legacy_url")]
    pub legacy_url: String,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub bearer_token: Option<SecretString>,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_URL)
    }
}

impl ClientConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            legacy_url: DEFAULT_LEGACY_URL.to_string(),
            bearer_token: None,
            headers: BTreeMap::new(),
        }
        .normalized()
    }

    pub fn with_legacy_url(mut self, legacy_url: &str) -> Self {
        self.legacy_url = legacy_url.to_string();
        self.normalized()
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(None)
    }

    /// Load configuration from an explicit variable map instead of the
    /// process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self, config::ConfigError> {
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_PREFIX_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .source(vars);

        let settings = config::Config::builder().add_source(environment).build()?;
        let config: ClientConfig = settings.try_deserialize()?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.url = self.url.trim_end_matches('/').to_string();
        self.legacy_url = self.legacy_url.trim_end_matches('/').to_string();
        self.headers = std::mem::take(&mut self.headers)
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase().replace('_', "-"), value))
            .collect();
        self
    }
}

fn default_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_legacy_url() -> String {
    DEFAULT_LEGACY_URL.to_string()
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()).map(SecretString::from))
}
