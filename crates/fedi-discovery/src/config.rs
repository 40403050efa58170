//! Discovery configuration loading from file and environment variables.

use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Top-level discovery configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryConfig {
    /// Outbound HTTP settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the default [`HttpFetcher`](crate::HttpFetcher).
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Value of the `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirects followed per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Largest accepted response body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "fedi_discovery=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("fedi-discovery/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> usize {
    4
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur while loading configuration or setting up the
/// components it describes.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to build the HTTP client.
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The built-in entity schemas could not be registered.
    #[error("failed to build entity schemas: {0}")]
    Schema(#[from] fedi_entities::SchemaError),

    /// A global tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `FEDI_DISCOVERY_TIMEOUT_SECS` overrides `http.timeout_secs`
/// - `FEDI_DISCOVERY_USER_AGENT` overrides `http.user_agent`
/// - `FEDI_DISCOVERY_MAX_REDIRECTS` overrides `http.max_redirects`
/// - `FEDI_DISCOVERY_MAX_BODY_BYTES` overrides `http.max_body_bytes`
/// - `FEDI_DISCOVERY_LOG_LEVEL` overrides `logging.level`
/// - `FEDI_DISCOVERY_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<DiscoveryConfig, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                DiscoveryConfig::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => DiscoveryConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies the `FEDI_DISCOVERY_*` overrides using `lookup` to read variables.
/// Unparseable numeric values are ignored.
pub fn apply_env_overrides(config: &mut DiscoveryConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(timeout) = lookup("FEDI_DISCOVERY_TIMEOUT_SECS") {
        if let Ok(parsed) = timeout.parse() {
            config.http.timeout_secs = parsed;
        }
    }
    if let Some(user_agent) = lookup("FEDI_DISCOVERY_USER_AGENT") {
        config.http.user_agent = user_agent;
    }
    if let Some(redirects) = lookup("FEDI_DISCOVERY_MAX_REDIRECTS") {
        if let Ok(parsed) = redirects.parse() {
            config.http.max_redirects = parsed;
        }
    }
    if let Some(limit) = lookup("FEDI_DISCOVERY_MAX_BODY_BYTES") {
        if let Ok(parsed) = limit.parse() {
            config.http.max_body_bytes = parsed;
        }
    }
    if let Some(level) = lookup("FEDI_DISCOVERY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("FEDI_DISCOVERY_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}

/// Installs a global `tracing` subscriber for the given settings.
///
/// # Errors
///
/// Returns `ConfigError::Logging` if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };
    result.map_err(|e| ConfigError::Logging(e.to_string()))
}
