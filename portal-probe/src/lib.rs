//! Captive portal detection.
//!
//! A [`NetworkMonitor`] races an HTTP and an HTTPS probe against connectivity-check
//! endpoints and reports whether the network offers internet access, sits behind a
//! captive portal (with the sign-in redirect when there is one), or has no
//! connectivity at all.
//!
//! ```no_run
//! # async fn check() -> Result<(), portal_probe::config::ConfigError> {
//! use portal_probe::{NetworkMonitor, ProbeClass};
//!
//! let monitor = NetworkMonitor::with_urls(
//!     "http://connectivitycheck.gstatic.com/generate_204",
//!     "https://www.google.com/generate_204",
//! )?;
//! match monitor.send_probe().await.class() {
//!     ProbeClass::Successful => println!("online"),
//!     ProbeClass::Portal => println!("sign in required"),
//!     ProbeClass::Failed => println!("offline"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http_probe;
pub mod monitor;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{ConfigError, MonitorConfig};
pub use http_probe::prelude::{FAILED_CODE, ProbeClass, ProbeOutcome, SUCCESS_CODE};
pub use monitor::NetworkMonitor;
