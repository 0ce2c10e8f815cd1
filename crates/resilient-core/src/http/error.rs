//! Request helper errors.

use thiserror::Error;

use super::classify::{classify_curl_error, ErrorKind};
use crate::error::ConfigError;
use crate::retry::{Classify, RetryError};

/// A request attempt failed before a response arrived.
#[derive(Debug, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(#[from] curl::Error);

impl TransportError {
    pub fn curl_error(&self) -> &curl::Error {
        &self.0
    }
}

impl Classify for TransportError {
    type Kind = ErrorKind;

    fn kind(&self) -> ErrorKind {
        classify_curl_error(&self.0)
    }
}

/// Error returned by [`send_request`](super::send_request).
#[derive(Debug, Error)]
pub enum RequestError {
    /// Rejected before the first attempt.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A transport fault escaped the retry loop.
    #[error(transparent)]
    Retry(#[from] RetryError<TransportError>),
}
