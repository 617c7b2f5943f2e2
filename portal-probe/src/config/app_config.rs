use std::env;
use std::path::Path;

use super::error::ConfigError;
use super::probe_config::MonitorConfig;

pub const CONFIG_FILE_VAR: &str = "CONFIG_FILE";
pub const HTTP_URL_VAR: &str = "PROBE_HTTP_URL";
pub const HTTPS_URL_VAR: &str = "PROBE_HTTPS_URL";
pub const PROBE_TIMEOUT_VAR: &str = "PROBE_TIMEOUT_MILLIS";
pub const SOCKET_TIMEOUT_VAR: &str = "PROBE_SOCKET_TIMEOUT_MILLIS";

/// Load the monitor configuration from a YAML file and environment variables.
/// The file named by `CONFIG_FILE` is optional; without it the defaults are used.
/// `PROBE_HTTP_URL`, `PROBE_HTTPS_URL`, `PROBE_TIMEOUT_MILLIS` and
/// `PROBE_SOCKET_TIMEOUT_MILLIS` override single fields afterwards.
pub fn load_config() -> Result<MonitorConfig, ConfigError> {
    load_config_with(|var| env::var(var).ok())
}

/// [`load_config`] with a custom variable lookup.
pub fn load_config_with<F>(lookup: F) -> Result<MonitorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match lookup(CONFIG_FILE_VAR) {
        Some(path) => load_config_file(path)?,
        None => MonitorConfig::default(),
    };

    let config = apply_overrides(config, &lookup)?;
    log::info!(
        "Probing {} and {} (race timeout {} ms, socket timeout {} ms)",
        config.http_url,
        config.https_url,
        config.probe_timeout_millis,
        config.socket_timeout_millis
    );
    Ok(config)
}

pub fn load_config_file(path: impl AsRef<Path>) -> Result<MonitorConfig, ConfigError> {
    let path = path.as_ref();
    let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    MonitorConfig::from_yaml_str(&yaml)
}

fn apply_overrides<F>(mut config: MonitorConfig, lookup: &F) -> Result<MonitorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(HTTP_URL_VAR) {
        config.http_url = url;
    }
    if let Some(url) = lookup(HTTPS_URL_VAR) {
        config.https_url = url;
    }
    if let Some(value) = lookup(PROBE_TIMEOUT_VAR) {
        config.probe_timeout_millis = parse_millis(PROBE_TIMEOUT_VAR, value)?;
    }
    if let Some(value) = lookup(SOCKET_TIMEOUT_VAR) {
        config.socket_timeout_millis = parse_millis(SOCKET_TIMEOUT_VAR, value)?;
    }
    Ok(config)
}

fn parse_millis(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride { var, value })
}
