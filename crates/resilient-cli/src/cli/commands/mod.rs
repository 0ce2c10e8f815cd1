//! CLI command handlers, one per file.

mod config;
mod fetch;
mod proxy;

pub use config::run_config;
pub use fetch::run_fetch;
pub use proxy::run_proxy;
