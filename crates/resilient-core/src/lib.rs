pub mod config;
pub mod logging;

pub mod error;
pub mod http;
pub mod proxy;
pub mod retry;

pub use retry::{
    execute, execute_blocking, Action, Classify, Controller, FaultActions, ResultActions,
    RetryError, RetryPolicy, Retrying, Verdict,
};
