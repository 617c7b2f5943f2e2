mod fallback;
mod gate;
mod task;

use std::time::Duration;

use tokio::sync::watch;
use url::Url;

use crate::config::probe_config::{MonitorConfig, ValidConfig, parse_probe_url};
use crate::config::ConfigError;
use crate::http_probe::prelude::*;
use gate::{GateWait, ProbeGate};
use task::ProbeTask;

/// Probed over HTTPS when neither primary probe was conclusive. Hosted apart from
/// the primary HTTPS endpoint so a policy block on one does not take out both.
pub const FALLBACK_HTTPS_URL: &str = "https://g.cn/generate_204";

/// Number of primary probes raced per round.
const PRIMARY_PROBES: usize = 2;

/// Tells internet access, a captive portal and no connectivity apart.
///
/// Holds configuration only; every [`send_probe`](Self::send_probe) call runs its
/// own independent round, so one monitor can be shared across tasks.
#[derive(Debug, Clone)]
pub struct NetworkMonitor {
    http_url: Url,
    https_url: Url,
    fallback_url: Url,
    probe_timeout: Duration,
    socket_timeout: Duration,
}

impl NetworkMonitor {
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigError> {
        let ValidConfig {
            http_url,
            https_url,
            probe_timeout,
            socket_timeout,
        } = config.validate()?;
        Ok(Self {
            http_url,
            https_url,
            fallback_url: parse_probe_url("fallback_url", "https", FALLBACK_HTTPS_URL)?,
            probe_timeout,
            socket_timeout,
        })
    }

    /// Monitor probing the given endpoints with default timeouts.
    pub fn with_urls(http_url: &str, https_url: &str) -> Result<Self, ConfigError> {
        Self::new(MonitorConfig {
            http_url: http_url.to_string(),
            https_url: https_url.to_string(),
            ..Default::default()
        })
    }

    /// Monitor probing the public connectivity-check endpoints.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(MonitorConfig::default())
    }

    pub fn http_url(&self) -> &Url {
        &self.http_url
    }

    pub fn https_url(&self) -> &Url {
        &self.https_url
    }

    /// Run one probing round.
    ///
    /// Races an HTTP and an HTTPS probe for at most the probe timeout and returns the
    /// first conclusive answer, HTTP taking precedence. With nothing conclusive, a
    /// fallback HTTPS endpoint gets a try before settling on the primary HTTPS
    /// probe's eventual outcome. Never fails: undecidable rounds yield the failed
    /// sentinel.
    ///
    /// Both probes are spawned onto the current tokio runtime; a multi-threaded
    /// runtime is what lets them run in parallel rather than interleaved.
    pub async fn send_probe(&self) -> ProbeOutcome {
        let (gate, opened) = ProbeGate::new(PRIMARY_PROBES);
        let https_probe = ProbeTask::spawn(
            self.https_url.clone(),
            ProbeKind::Https,
            self.socket_timeout,
            gate.clone(),
        );
        let http_probe = ProbeTask::spawn(
            self.http_url.clone(),
            ProbeKind::Http,
            self.socket_timeout,
            gate,
        );
        self.settle(http_probe, https_probe, opened).await
    }

    /// Wait for the race to open the gate, then pick the answer.
    async fn settle(
        &self,
        http_probe: ProbeTask,
        https_probe: ProbeTask,
        mut opened: watch::Receiver<usize>,
    ) -> ProbeOutcome {
        match gate::wait(&mut opened, self.probe_timeout).await {
            GateWait::Opened => {}
            GateWait::TimedOut => {
                log::debug!("No conclusive probe within {:?}", self.probe_timeout)
            }
            GateWait::Interrupted => {
                log::warn!("Probe round interrupted before any result");
                return ProbeOutcome::failed();
            }
        }

        let http_outcome = http_probe.outcome();
        let https_outcome = https_probe.outcome();
        if let Some(outcome) = first_conclusive(http_outcome, https_outcome) {
            log::info!("Probe round settled: {}", outcome);
            return outcome;
        }

        let outcome = fallback::resolve(&self.fallback_url, self.socket_timeout, https_probe).await;
        log::info!("Probe round settled after fallback: {}", outcome);
        outcome
    }

    /// [`send_probe`](Self::send_probe) for callers outside of an async context.
    ///
    /// Drives the round on a private multi-threaded runtime. Unlike
    /// [`send_probe`](Self::send_probe), a primary probe still in flight when the
    /// round settles does not run on until its socket timeout: it is cancelled
    /// when that runtime is dropped, and its connection closed with it. Panics if
    /// called from within a tokio runtime.
    pub fn send_probe_blocking(&self) -> ProbeOutcome {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(PRIMARY_PROBES)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                log::error!("Failed to start probe runtime: {}", err);
                return ProbeOutcome::failed();
            }
        };
        runtime.block_on(self.send_probe())
    }

    #[cfg(test)]
    fn with_fallback_url(mut self, fallback_url: Url) -> Self {
        self.fallback_url = fallback_url;
        self
    }
}


/// HTTP first: portals intercept plain HTTP most reliably.
fn first_conclusive(http: ProbeOutcome, https: ProbeOutcome) -> Option<ProbeOutcome> {
    if http.is_conclusive() {
        Some(http)
    } else if https.is_conclusive() {
        Some(https)
    } else {
        None
    }
}
