//! Trust-all TLS for probe traffic.
//!
//! Captive portals answer intercepted HTTPS with a self-signed certificate for the
//! sign-in gateway. Rejecting it would turn a portal into a hard failure, so HTTPS
//! probes accept any certificate and any hostname. Nothing but the probe executor
//! may build a client through this module: probe responses are classified, never
//! trusted as payload.

use reqwest::ClientBuilder;

/// Disable certificate chain and hostname validation on a probe client.
pub(super) fn trust_all(builder: ClientBuilder) -> ClientBuilder {
    builder
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
}
