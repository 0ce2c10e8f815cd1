//! Configuration errors: bad inputs rejected before any attempt is made.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Proxy descriptor is neither `ip:port` nor `ip:port:user:pass`.
    #[error("unsupported proxy {0:?}: expected ip:port or ip:port:login:password")]
    UnsupportedProxy(String),
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// A `[retry]` second count that is negative, NaN or too large.
    #[error("invalid {field} = {value}: expected a non-negative number of seconds")]
    InvalidDuration { field: &'static str, value: f64 },
}
