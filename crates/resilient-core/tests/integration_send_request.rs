//! Integration test: the request helper against a local scripted server.
//!
//! Covers status-driven retries, transport-fault retries, proxy routing and
//! the configuration errors that must fail before any request goes out.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use resilient_core::error::ConfigError;
use resilient_core::http::{
    classify_status, send_request, send_request_with, ErrorKind, RequestError, RequestOptions,
    Response, Session, StatusClass, TransportError,
};
use resilient_core::retry::{
    Action, Controller, Event, FaultActions, Observer, ResultActions, RetryError, RetryPolicy,
    Verdict,
};

type HttpPolicy = RetryPolicy<Response, TransportError>;

fn retry_throttled(max_retries: u32) -> HttpPolicy {
    HttpPolicy::new()
        .max_retries(max_retries)
        .delay(Duration::from_millis(5))
        .results(
            ResultActions::classified(|r: &Response| classify_status(r.status))
                .on(StatusClass::Throttled, Action::Retry)
                .on(StatusClass::ServerError, Action::Retry),
        )
}

#[test]
fn retries_throttled_status_until_success() {
    let server = common::scripted_server::start(vec![(503, "busy"), (429, "slow down"), (200, "ok")]);

    let response = send_request(&server.url, &RequestOptions::get(), retry_throttled(5))
        .expect("request")
        .expect("a response");

    assert_eq!(response.status, 200);
    assert_eq!(response.text(), "ok");
    assert_eq!(response.header("content-type"), Some("text/plain"));
    assert_eq!(server.hits(), 3);
}

#[test]
fn exhausted_status_retries_return_none() {
    let server = common::scripted_server::start(vec![(500, "broken")]);

    let outcome = send_request(&server.url, &RequestOptions::get(), retry_throttled(3)).unwrap();

    assert!(outcome.is_none());
    assert_eq!(server.hits(), 3);
}

#[test]
fn status_without_action_is_returned_unchanged() {
    let server = common::scripted_server::start(vec![(404, "missing")]);

    let response = send_request(&server.url, &RequestOptions::get(), retry_throttled(5))
        .unwrap()
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(server.hits(), 1);
}

#[test]
fn result_handler_transforms_response() {
    let server = common::scripted_server::start(vec![(200, "payload")]);
    let policy = HttpPolicy::new().results(
        ResultActions::classified(|r: &Response| r.status).on(
            200,
            Action::handle(|mut r: Response| {
                r.body = r.body.to_ascii_uppercase();
                Verdict::Accept(r)
            }),
        ),
    );

    let response = send_request(&server.url, &RequestOptions::get(), policy)
        .unwrap()
        .unwrap();
    assert_eq!(response.text(), "PAYLOAD");
}

#[test]
fn malformed_proxy_fails_before_any_request() {
    let server = common::scripted_server::start(vec![(200, "ok")]);
    let opts = RequestOptions::get().proxy("1.2.3.4");

    let err = send_request(&server.url, &opts, retry_throttled(5)).unwrap_err();

    assert!(matches!(
        err,
        RequestError::Config(ConfigError::UnsupportedProxy(ref p)) if p == "1.2.3.4"
    ));
    assert_eq!(server.hits(), 0);
}

#[test]
fn invalid_url_is_a_config_error() {
    let err = send_request("not a url", &RequestOptions::get(), retry_throttled(5)).unwrap_err();
    assert!(matches!(err, RequestError::Config(ConfigError::InvalidUrl { .. })));
}

#[test]
fn connection_faults_retry_when_mapped() {
    #[derive(Default)]
    struct Attempts(Mutex<u32>);

    impl Observer for Attempts {
        fn on_event(&self, event: &Event) {
            if let Event::Attempt { .. } = event {
                *self.0.lock().unwrap() += 1;
            }
        }
    }

    let url = common::scripted_server::closed_port_url();
    let attempts = Arc::new(Attempts::default());
    let controller = Controller::with_observer(attempts.clone());
    let policy = HttpPolicy::new()
        .max_retries(3)
        .faults(FaultActions::new().on(ErrorKind::Connection, Action::Retry));

    let outcome = send_request_with(
        &controller,
        &mut Session::new(),
        &url,
        &RequestOptions::get(),
        policy,
    )
    .unwrap();

    assert!(outcome.is_none());
    assert_eq!(*attempts.0.lock().unwrap(), 3);
}

#[test]
fn unmapped_connection_fault_is_unhandled() {
    let url = common::scripted_server::closed_port_url();
    let policy = HttpPolicy::new().faults(FaultActions::new().on(ErrorKind::Timeout, Action::Retry));

    let err = send_request(&url, &RequestOptions::get(), policy).unwrap_err();

    match err {
        RequestError::Retry(RetryError::Unhandled(fault)) => {
            assert_eq!(resilient_core::Classify::kind(&fault), ErrorKind::Connection);
        }
        other => panic!("expected unhandled fault, got {other:?}"),
    }
}

#[test]
fn session_proxy_routes_requests() {
    // The scripted server doubles as a forward proxy: curl sends it the
    // absolute URL of the real target.
    let proxy = common::scripted_server::start(vec![(200, "via proxy")]);
    let mut session = Session::new();
    session.set_proxy(&proxy.addr).unwrap();

    let response = send_request_with(
        &Controller::new(),
        &mut session,
        "http://upstream.invalid/resource",
        &RequestOptions::get(),
        HttpPolicy::new(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(response.text(), "via proxy");
    let requests = proxy.requests();
    assert!(
        requests[0].starts_with("GET http://upstream.invalid/resource"),
        "request line: {:?}",
        requests[0].lines().next()
    );
}

#[test]
fn per_request_proxy_overrides_session_proxy_for_one_call() {
    let session_proxy = common::scripted_server::start(vec![(200, "session")]);
    let request_proxy = common::scripted_server::start(vec![(200, "request")]);
    let mut session = Session::new();
    session.set_proxy(&session_proxy.addr).unwrap();
    let controller = Controller::new();

    let opts = RequestOptions::get().proxy(request_proxy.addr.clone());
    let first = send_request_with(
        &controller,
        &mut session,
        "http://upstream.invalid/",
        &opts,
        HttpPolicy::new(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(first.text(), "request");

    let second = send_request_with(
        &controller,
        &mut session,
        "http://upstream.invalid/",
        &RequestOptions::get(),
        HttpPolicy::new(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(second.text(), "session");
    assert_eq!(session_proxy.hits(), 1);
    assert_eq!(request_proxy.hits(), 1);
}

#[test]
fn method_headers_and_body_reach_the_server() {
    let server = common::scripted_server::start(vec![(201, "created")]);
    let opts = RequestOptions::get()
        .method("POST")
        .header("X-Client", "yes")
        .body("name=widget");

    let response = send_request(&format!("{}submit", server.url), &opts, HttpPolicy::new())
        .unwrap()
        .unwrap();

    assert_eq!(response.status, 201);
    let raw = &server.requests()[0];
    assert!(raw.starts_with("POST /submit "), "request: {raw:?}");
    assert!(raw.contains("X-Client: yes"));
    assert!(raw.ends_with("name=widget"));
}

#[test]
fn policy_without_result_table_needs_no_hashable_response() {
    let server = common::scripted_server::start(vec![(200, "plain")]);
    let policy = HttpPolicy::new()
        .max_retries(2)
        .faults(FaultActions::new().any(Action::Retry));

    let response = send_request(&server.url, &RequestOptions::get(), policy)
        .unwrap()
        .unwrap();
    assert_eq!(response.text(), "plain");
}

#[tokio::test]
async fn request_from_async_context_is_rejected_without_sending() {
    let server = common::scripted_server::start(vec![(200, "ok")]);

    let err = send_request(&server.url, &RequestOptions::get(), HttpPolicy::new()).unwrap_err();

    assert!(matches!(err, RequestError::Retry(RetryError::Runtime(_))));
    assert_eq!(server.hits(), 0);
}
