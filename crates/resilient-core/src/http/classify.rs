//! Classify curl errors and HTTP statuses for retry tables.

/// Category of a transport failure, used as the fault-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Network-level failure (connection refused or reset, DNS, empty reply).
    Connection,
    /// The proxy could not be resolved.
    Proxy,
    /// Anything else (bad option, TLS setup, ...).
    Other,
}

/// Coarse class of an HTTP status, handy as a result-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Success,
    /// Server asked us to slow down (429, 503).
    Throttled,
    ServerError,
    ClientError,
    Other,
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_resolve_proxy() {
        return ErrorKind::Proxy;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify an HTTP status code.
pub fn classify_status(code: u32) -> StatusClass {
    match code {
        200..=299 => StatusClass::Success,
        429 | 503 => StatusClass::Throttled,
        500..=599 => StatusClass::ServerError,
        400..=499 => StatusClass::ClientError,
        _ => StatusClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_status(429), StatusClass::Throttled);
        assert_eq!(classify_status(503), StatusClass::Throttled);
    }

    #[test]
    fn http_5xx_server_error() {
        assert_eq!(classify_status(500), StatusClass::ServerError);
        assert_eq!(classify_status(502), StatusClass::ServerError);
    }

    #[test]
    fn http_2xx_and_4xx() {
        assert_eq!(classify_status(200), StatusClass::Success);
        assert_eq!(classify_status(204), StatusClass::Success);
        assert_eq!(classify_status(404), StatusClass::ClientError);
        assert_eq!(classify_status(301), StatusClass::Other);
    }

    #[test]
    fn curl_errors_by_code() {
        // CURLE_OPERATION_TIMEDOUT
        assert_eq!(classify_curl_error(&curl::Error::new(28)), ErrorKind::Timeout);
        // CURLE_COULDNT_CONNECT, CURLE_COULDNT_RESOLVE_HOST, CURLE_GOT_NOTHING
        assert_eq!(classify_curl_error(&curl::Error::new(7)), ErrorKind::Connection);
        assert_eq!(classify_curl_error(&curl::Error::new(6)), ErrorKind::Connection);
        assert_eq!(classify_curl_error(&curl::Error::new(52)), ErrorKind::Connection);
        // CURLE_COULDNT_RESOLVE_PROXY
        assert_eq!(classify_curl_error(&curl::Error::new(5)), ErrorKind::Proxy);
        // CURLE_URL_MALFORMAT
        assert_eq!(classify_curl_error(&curl::Error::new(3)), ErrorKind::Other);
    }
}
