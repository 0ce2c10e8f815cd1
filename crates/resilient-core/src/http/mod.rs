//! HTTP request helper built on the retry controller.
//!
//! Uses the curl crate (libcurl). A request is one work item: the response
//! (any status) is a result, a curl failure is a [`TransportError`] fault
//! classified by [`ErrorKind`]. Status-based retries go in the result table,
//! e.g. keyed by [`classify_status`].
//!
//! Everything here blocks the calling thread. Called from inside a tokio
//! runtime it fails with `RetryError::Runtime`; use `spawn_blocking` there.

mod classify;
mod error;
mod response;
mod session;

pub use classify::{classify_curl_error, classify_status, ErrorKind, StatusClass};
pub use error::{RequestError, TransportError};
pub use response::Response;
pub use session::{RequestOptions, Session};

use crate::error::ConfigError;
use crate::proxy::ProxyMap;
use crate::retry::{Controller, RetryPolicy};

/// Sends a request on a fresh session, retrying under `policy`.
///
/// Returns `Ok(None)` when the policy's budget runs out.
pub fn send_request(
    url: &str,
    opts: &RequestOptions,
    policy: RetryPolicy<Response, TransportError>,
) -> Result<Option<Response>, RequestError> {
    let mut session = Session::new();
    send_request_with(&Controller::new(), &mut session, url, opts, policy)
}

/// Sends a request on a caller-owned session.
///
/// The URL and any per-request proxy descriptor are validated before the
/// first attempt; a malformed one fails with [`RequestError::Config`]. The
/// per-request proxy is used for this call only and does not replace the
/// session's own.
pub fn send_request_with(
    controller: &Controller,
    session: &mut Session,
    url: &str,
    opts: &RequestOptions,
    policy: RetryPolicy<Response, TransportError>,
) -> Result<Option<Response>, RequestError> {
    let target = url::Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let proxy = match &opts.proxy {
        Some(descriptor) => Some(ProxyMap::parse(descriptor)?),
        None => session.proxy().cloned(),
    };
    let proxy_url = proxy.map(|p| p.for_scheme(target.scheme()).to_string());

    tracing::debug!(
        method = %opts.method,
        url,
        proxied = proxy_url.is_some(),
        "sending request"
    );
    let response = controller.run_blocking(
        || session.perform(url, opts, proxy_url.as_deref()),
        policy,
    )?;
    if let Some(resp) = &response {
        tracing::debug!(url, status = resp.status, "request finished");
    }
    Ok(response)
}
