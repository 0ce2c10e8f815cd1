//! `resilient fetch` – one request under a retry policy.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use resilient_core::config::ResilientConfig;
use resilient_core::http::{
    send_request_with, ErrorKind, RequestOptions, Response, Session, TransportError,
};
use resilient_core::retry::{Action, Controller, FaultActions, ResultActions, RetryPolicy};

use crate::cli::FetchArgs;

/// Statuses retried when `--retry-status` is not given.
pub const DEFAULT_RETRY_STATUSES: [u32; 5] = [429, 500, 502, 503, 504];

pub fn run_fetch(cfg: &ResilientConfig, controller: &Controller, args: &FetchArgs) -> Result<()> {
    let policy = build_policy(cfg, args)?;
    let opts = build_options(args)?;
    let mut session = Session::from_config(&cfg.http_or_default())?;

    let response = send_request_with(controller, &mut session, &args.url, &opts, policy)
        .with_context(|| format!("request to {} failed", args.url))?;
    let Some(response) = response else {
        bail!("gave up on {}: retry budget exhausted", args.url);
    };

    if !response.is_success() {
        tracing::warn!(status = response.status, url = %args.url, "non-success status");
    }
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&response.body)?;
    stdout.flush()?;
    Ok(())
}

/// Config budgets, then command-line overrides. Transport faults other than
/// `ErrorKind::Other` are retried; so are the chosen statuses.
pub(crate) fn build_policy(
    cfg: &ResilientConfig,
    args: &FetchArgs,
) -> Result<RetryPolicy<Response, TransportError>> {
    let mut policy = RetryPolicy::from_config(&cfg.retry_or_default())?;
    if let Some(n) = args.retries {
        policy = policy.max_retries(n);
    }
    if let Some(secs) = args.delay {
        policy = policy.delay(secs_arg("--delay", secs)?);
    }
    if let Some(secs) = args.max_elapsed {
        policy = policy.max_elapsed(secs_arg("--max-elapsed", secs)?);
    }

    let statuses: &[u32] = if args.retry_status.is_empty() {
        &DEFAULT_RETRY_STATUSES
    } else {
        &args.retry_status
    };
    let results = statuses.iter().fold(
        ResultActions::classified(|r: &Response| r.status),
        |table, &code| table.on(code, Action::Retry),
    );
    let faults = FaultActions::new()
        .any(Action::Retry)
        .on(ErrorKind::Other, Action::Accept);

    Ok(policy.results(results).faults(faults))
}

pub(crate) fn build_options(args: &FetchArgs) -> Result<RequestOptions> {
    let mut opts = RequestOptions::get().method(args.method.to_ascii_uppercase());
    for raw in &args.headers {
        let (name, value) = raw
            .split_once(':')
            .with_context(|| format!("header {raw:?} is not in `Name: value` form"))?;
        opts = opts.header(name, value);
    }
    if let Some(data) = &args.data {
        opts = opts.body(data.as_bytes());
    }
    if let Some(proxy) = &args.proxy {
        opts = opts.proxy(proxy.as_str());
    }
    Ok(opts)
}

fn secs_arg(flag: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("{flag} must be a non-negative number of seconds"))
}
