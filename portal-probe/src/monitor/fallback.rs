use std::time::Duration;

use url::Url;

use super::task::ProbeTask;
use crate::http_probe::prelude::*;

/// Second chance when neither primary probe was conclusive in time.
///
/// Probes `fallback_url` over HTTPS; when that is inconclusive too, blocks on the
/// primary HTTPS probe, which may still be running up to its socket timeout, and
/// settles for whatever it produced.
pub(crate) async fn resolve(
    fallback_url: &Url,
    socket_timeout: Duration,
    https_probe: ProbeTask,
) -> ProbeOutcome {
    let outcome = probe_url(fallback_url, ProbeKind::Https, socket_timeout).await;
    if outcome.is_conclusive() {
        log::debug!("Fallback probe {} was conclusive", fallback_url);
        return outcome;
    }

    log::debug!("Fallback probe inconclusive, waiting for the primary HTTPS probe");
    https_probe.join().await
}
