/// Outbound collaborators: geocoding, weather, knowledge engine, LLM.
///
/// Each client lives in its own file with pure URL construction and
/// response parsing (tested against `fixtures`) plus a thin blocking
/// `reqwest` call. The traits here are the seams the aggregator and the
/// narrative risk source depend on, so tests can swap in fakes.

pub mod geocoding;
pub mod knowledge;
pub mod llm;
pub mod weather;

#[cfg(test)]
pub(crate) mod fixtures;

use std::time::Duration;
use thiserror::Error;

use crate::config::HttpConfig;
use crate::model::{Coordinates, LocationProfile, WeatherConditions};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure talking to a third-party service. Never surfaced to callers of
/// the plan endpoint; the aggregator turns these into absent values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    /// No credentials were configured for this service.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    /// Non-2xx HTTP response.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,
    /// Connection or protocol failure before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The response body could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),
    /// The service responded but had no answer for the question.
    #[error("No answer available")]
    NoAnswer,
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout
        } else if let Some(status) = e.status() {
            SourceError::Http(status.as_u16())
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Free-text location → normalized profile. `Ok(None)` means the service
/// answered but found no match.
pub trait Geocoder: Send + Sync {
    fn resolve(&self, query: &str) -> Result<Option<LocationProfile>, SourceError>;
}

pub trait WeatherSource: Send + Sync {
    fn current(&self, coordinates: Coordinates) -> Result<WeatherConditions, SourceError>;
}

/// Natural-language question → loosely structured text answer.
pub trait KnowledgeSource: Send + Sync {
    fn query(&self, question: &str) -> Result<String, SourceError>;
}

/// Prompt → model reply. With `json_output` the service is asked to
/// constrain its reply to a JSON object; the reply is still untrusted.
pub trait TextGenerator: Send + Sync {
    fn complete(&self, system: &str, prompt: &str, json_output: bool) -> Result<String, SourceError>;
}

/// Stand-in for an optional collaborator whose API key is missing.
pub struct Unconfigured(pub &'static str);

impl WeatherSource for Unconfigured {
    fn current(&self, _coordinates: Coordinates) -> Result<WeatherConditions, SourceError> {
        Err(SourceError::NotConfigured(self.0))
    }
}

impl KnowledgeSource for Unconfigured {
    fn query(&self, _question: &str) -> Result<String, SourceError> {
        Err(SourceError::NotConfigured(self.0))
    }
}

impl TextGenerator for Unconfigured {
    fn complete(&self, _system: &str, _prompt: &str, _json_output: bool) -> Result<String, SourceError> {
        Err(SourceError::NotConfigured(self.0))
    }
}

// ---------------------------------------------------------------------------
// Shared HTTP client
// ---------------------------------------------------------------------------

/// Blocking client shared by every collaborator, with the per-call timeout
/// from `[http]`.
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::blocking::Client, SourceError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(SourceError::from)
}

/// Reads a successful response body as text, mapping non-2xx to `Http`.
fn read_body(response: reqwest::blocking::Response) -> Result<String, SourceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http(status.as_u16()));
    }
    Ok(response.text()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_sources_report_their_name() {
        let weather = Unconfigured("weather");
        let result = weather.current(Coordinates { lat: 0.0, lng: 0.0 });
        assert_eq!(result, Err(SourceError::NotConfigured("weather")));

        let knowledge = Unconfigured("knowledge engine");
        assert!(knowledge.query("elevation of Denver").is_err());
    }

    #[test]
    fn test_http_client_builds_from_default_config() {
        assert!(build_http_client(&HttpConfig::default()).is_ok());
    }
}
