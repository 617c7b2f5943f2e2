use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use url::Url;

use super::gate::ProbeGate;
use crate::http_probe::prelude::*;

/// A primary probe running on its own task.
///
/// The task writes its outcome exactly once, then signals the gate. Readers only
/// look at the slot after the gate opened or the task was joined.
#[derive(Debug)]
pub(crate) struct ProbeTask {
    slot: Arc<OnceLock<ProbeOutcome>>,
    handle: JoinHandle<()>,
}

impl ProbeTask {
    pub(crate) fn spawn(
        url: Url,
        kind: ProbeKind,
        socket_timeout: Duration,
        gate: ProbeGate,
    ) -> Self {
        Self::spawn_with(
            async move { probe_url(&url, kind, socket_timeout).await },
            gate,
        )
    }

    /// Run `probe` on its own task, reporting to `gate` once it lands.
    pub(crate) fn spawn_with<F>(probe: F, gate: ProbeGate) -> Self
    where
        F: Future<Output = ProbeOutcome> + Send + 'static,
    {
        let slot = Arc::new(OnceLock::new());
        let writer = Arc::clone(&slot);
        let handle = tokio::spawn(async move {
            let outcome = probe.await;
            let conclusive = outcome.is_conclusive();
            let _ = writer.set(outcome);
            if conclusive {
                gate.release();
            }
            gate.count_down();
        });
        Self { slot, handle }
    }

    /// What the probe has produced so far; the failed sentinel while it is still running.
    pub(crate) fn outcome(&self) -> ProbeOutcome {
        self.slot.get().cloned().unwrap_or_else(ProbeOutcome::failed)
    }

    /// Wait for the probe to land and take its outcome.
    pub(crate) async fn join(self) -> ProbeOutcome {
        match self.handle.await {
            Ok(()) => self.slot.get().cloned().unwrap_or_else(ProbeOutcome::failed),
            Err(err) => {
                log::warn!("Probe task did not complete: {}", err);
                ProbeOutcome::failed()
            }
        }
    }
}
