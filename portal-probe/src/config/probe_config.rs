use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::error::ConfigError;

pub const DEFAULT_HTTP_URL: &str = "http://connectivitycheck.gstatic.com/generate_204";
pub const DEFAULT_HTTPS_URL: &str = "https://fonts.googleapis.com/generate_204";

/// Configuration of a [`NetworkMonitor`](crate::NetworkMonitor).
/// Every field is optional in YAML and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Plain HTTP connectivity-check endpoint. Must start with `http:`.
    pub http_url: String,

    /// HTTPS connectivity-check endpoint. Must start with `https:`.
    pub https_url: String,

    /// How long the race waits for a conclusive primary probe.
    /// Defaults to 3000.
    pub probe_timeout_millis: u64,

    /// Connect and read timeout of every single probe.
    /// Defaults to 10000.
    pub socket_timeout_millis: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            http_url: DEFAULT_HTTP_URL.to_string(),
            https_url: DEFAULT_HTTPS_URL.to_string(),
            probe_timeout_millis: 3_000,
            socket_timeout_millis: 10_000,
        }
    }
}

/// A [`MonitorConfig`] that passed validation.
#[derive(Debug, Clone)]
pub(crate) struct ValidConfig {
    pub http_url: Url,
    pub https_url: Url,
    pub probe_timeout: Duration,
    pub socket_timeout: Duration,
}

impl MonitorConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub(crate) fn validate(&self) -> Result<ValidConfig, ConfigError> {
        Ok(ValidConfig {
            http_url: parse_probe_url("http_url", "http", &self.http_url)?,
            https_url: parse_probe_url("https_url", "https", &self.https_url)?,
            probe_timeout: non_zero_millis("probe_timeout_millis", self.probe_timeout_millis)?,
            socket_timeout: non_zero_millis("socket_timeout_millis", self.socket_timeout_millis)?,
        })
    }
}

pub(crate) fn parse_probe_url(
    field: &'static str,
    scheme: &'static str,
    raw: &str,
) -> Result<Url, ConfigError> {
    if !raw.starts_with(&format!("{scheme}:")) {
        return Err(ConfigError::WrongProtocol {
            field,
            scheme,
            url: raw.to_string(),
        });
    }
    Url::parse(raw).map_err(|source| ConfigError::MalformedUrl {
        field,
        url: raw.to_string(),
        source,
    })
}

fn non_zero_millis(field: &'static str, millis: u64) -> Result<Duration, ConfigError> {
    match millis {
        0 => Err(ConfigError::ZeroTimeout { field }),
        millis => Ok(Duration::from_millis(millis)),
    }
}
