/// Service configuration loader - parses service.toml and API keys
///
/// Tunables (port, timeouts, endpoints, risk strategy) live in
/// `service.toml` so they can change without recompiling. Credentials never
/// go in that file; they come from the environment, optionally seeded from
/// a `.env` file.
///
/// Every field has a default, so an empty or missing `service.toml` yields
/// a working configuration pointed at the public API endpoints.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::risk::ActiveDisasterPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "service.toml";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Missing required environment variable {0}")]
    MissingKey(&'static str),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

// ---------------------------------------------------------------------------
// service.toml
// ---------------------------------------------------------------------------

/// Root of `service.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub risk: RiskConfig,
    pub llm: LlmConfig,
    pub endpoints: EndpointConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { port: 8080 }
    }
}

/// Outbound HTTP and fan-out tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout applied by the reqwest client.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Worker threads shared by all in-flight collaborator calls.
    pub pool_size: usize,
    /// Upper bound on signal collection for one plan. Geocoding and weather
    /// run back to back, so this should exceed twice `timeout_secs`.
    pub deadline_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: 10,
            user_agent: concat!("readyplan_service/", env!("CARGO_PKG_VERSION")).to_string(),
            pool_size: 8,
            deadline_secs: 25,
        }
    }
}

/// Which strategy produces the risk assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSourceKind {
    Threshold,
    #[default]
    Narrative,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub source: RiskSourceKind,
    pub active_disasters: ActiveDisasterPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub geocoding_url: String,
    pub weather_url: String,
    pub knowledge_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig {
            geocoding_url: "https://api.opencagedata.com/geocode/v1/json".to_string(),
            weather_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            knowledge_url: "https://api.wolframalpha.com/v1/result".to_string(),
        }
    }
}

impl ServiceConfig {
    /// The narrative strategy needs a generative-model key; without one the
    /// threshold classifier is used regardless of `[risk] source`.
    pub fn effective_risk_source(&self, keys: &ApiKeys) -> RiskSourceKind {
        match self.risk.source {
            RiskSourceKind::Narrative if keys.openai.is_none() => {
                warn!("OPENAI_API_KEY not set; using threshold risk classification");
                RiskSourceKind::Threshold
            }
            kind => kind,
        }
    }
}

/// Parses `service.toml` contents.
pub fn parse_config(contents: &str) -> Result<ServiceConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Loads configuration from `path`.
///
/// A missing file is not an error: the service logs a warning and runs
/// with defaults. A file that exists but cannot be read or parsed is.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    if !path.exists() {
        warn!(path = %path.display(), "Config file not found; using defaults");
        return Ok(ServiceConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Third-party API credentials. Only the geocoder is mandatory; each other
/// missing key disables its collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiKeys {
    pub opencage: String,
    pub openweather: Option<String>,
    pub wolfram: Option<String>,
    pub openai: Option<String>,
}

impl ApiKeys {
    /// Reads keys from the process environment after loading `.env`, if
    /// present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads keys through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(ApiKeys {
            opencage: read("OPENCAGE_API_KEY").ok_or(ConfigError::MissingKey("OPENCAGE_API_KEY"))?,
            openweather: read("OPENWEATHER_API_KEY"),
            wolfram: read("WOLFRAM_APP_ID"),
            openai: read("OPENAI_API_KEY"),
        })
    }
}
