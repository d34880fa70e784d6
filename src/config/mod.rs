//! Configuration management.
//!
//! Settings come from an optional TOML file, then from environment
//! variables prefixed with `NEWS_CLI_` (nested keys separated by `__`, for
//! example `NEWS_CLI_FETCH__FAILURE_POLICY=collect_failures`).
//!
//! ```toml
//! [api]
//! key = "your-api-key"
//! base_url = "https://newsapi.org/v2"
//! timeout_secs = 30
//!
//! [fetch]
//! default_page_size = 20
//! failure_policy = "abort_on_first"
//!
//! [output]
//! color = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::pipeline::FailurePolicy;
use crate::sources::DEFAULT_BASE_URL;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "NEWS_CLI";

/// Conventional variable holding the service credential
pub const API_KEY_ENV: &str = "NEWS_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote service settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Page fetching settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Console output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Service credential
    #[serde(default)]
    pub key: Option<String>,

    /// Service root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Page fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Page size used when the command line does not give one
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Behaviour when a page of a multi-page fetch fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl FetchConfig {
    /// Configured page size clamped to what the service accepts
    pub fn page_size(&self) -> i64 {
        self.default_page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Console output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Colour output when writing to a terminal
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// The credential, if one was configured
    pub fn api_key(&self) -> Option<&str> {
        self.api
            .key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("news-cli").join("config.toml"))
}

/// Load configuration.
///
/// An explicit `path` must exist; the default location is optional.
/// `NEWS_API_KEY` fills in the credential when neither the file nor a
/// prefixed variable set one.
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    } else if let Some(default) = default_config_path() {
        builder = builder.add_source(config::File::from(default).required(false));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut config: Config = settings.try_deserialize()?;
    if config.api_key().is_none() {
        config.api.key = std::env::var(API_KEY_ENV).ok();
    }
    Ok(config)
}
