use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, HeaderMap, LOCATION};
use reqwest::{Client, Response, StatusCode, redirect::Policy};
use url::Url;

use super::prelude::*;
use super::{report, trust};

/// Browser-like agent; portals tend to block or special-case unknown ones.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/60.0.3112.32 Safari/537.36";

/// Transport used by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Http,
    /// HTTPS with certificate and hostname checks disabled.
    Https,
}

fn build_client(kind: ProbeKind, socket_timeout: Duration) -> reqwest::Result<Client> {
    let builder = Client::builder()
        .redirect(Policy::none())
        .connect_timeout(socket_timeout)
        .read_timeout(socket_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .pool_max_idle_per_host(0);

    let builder = match kind {
        ProbeKind::Http => builder,
        ProbeKind::Https => trust::trust_all(builder),
    };
    builder.build()
}

/// `Content-Length` as declared by the server, `None` when absent or unparseable.
fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Pull from the body until the first byte or end of data.
async fn body_is_empty(response: &mut Response) -> bool {
    loop {
        match response.chunk().await {
            Ok(None) => return true,
            Ok(Some(chunk)) if chunk.is_empty() => continue,
            Ok(Some(_)) => return false,
            Err(err) => {
                log::debug!("Reading probe body of {} failed: {}", response.url(), report(&err));
                return false;
            }
        }
    }
}

/// Send one probe to `url` and classify the answer.
///
/// Transport errors never escape: they turn into the failed sentinel for `url`.
/// A 200 only counts as connectivity when its body is provably empty, since
/// proxies and portals like to answer the probe path with a page of their own.
pub async fn probe_url(url: &Url, kind: ProbeKind, socket_timeout: Duration) -> ProbeOutcome {
    let client = match build_client(kind, socket_timeout) {
        Ok(client) => client,
        Err(err) => {
            log::error!("Failed to build probe client for {}: {}", url, report(&err));
            return ProbeOutcome::failed_for(url.as_str());
        }
    };

    let mut response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(err) => {
            log::debug!("Probe {} failed: {}", url, report(&err));
            return ProbeOutcome::failed_for(url.as_str());
        }
    };

    let mut status_code = response.status().as_u16();
    let redirect_target = response
        .headers()
        .get(LOCATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    if response.status() == StatusCode::OK {
        let empty = match declared_content_length(response.headers()) {
            Some(length) => length == 0,
            None => body_is_empty(&mut response).await,
        };
        if empty {
            status_code = SUCCESS_CODE;
        }
    }

    let outcome = ProbeOutcome::new(status_code, redirect_target, Some(url.to_string()));
    log::debug!("Probe {:?} {} -> {:?}", kind, url, outcome.class());
    outcome
}
