pub mod app_config;
pub mod error;
pub mod probe_config;

pub use app_config::{load_config, load_config_file, load_config_with};
pub use error::ConfigError;
pub use probe_config::{DEFAULT_HTTP_URL, DEFAULT_HTTPS_URL, MonitorConfig};
