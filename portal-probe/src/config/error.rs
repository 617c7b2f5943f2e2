use std::path::PathBuf;

use thiserror::Error;

/// A monitor configuration that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must start with \"{scheme}:\", got {url}")]
    WrongProtocol {
        field: &'static str,
        scheme: &'static str,
        url: String,
    },

    #[error("{field} is not a valid url: {url}")]
    MalformedUrl {
        field: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{var} must be a number of milliseconds, got {value}")]
    InvalidOverride { var: &'static str, value: String },

    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config")]
    Yaml(#[from] serde_yaml::Error),
}
