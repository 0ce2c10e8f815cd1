//! `resilient config` – where the config lives and what it resolves to.

use anyhow::Result;
use resilient_core::config::{self, ResilientConfig};

/// Print the config path, then the effective configuration with defaults
/// filled in for missing sections.
pub fn run_config(cfg: &ResilientConfig) -> Result<()> {
    let effective = ResilientConfig {
        retry: Some(cfg.retry_or_default()),
        http: Some(cfg.http_or_default()),
    };
    println!("# {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(&effective)?);
    Ok(())
}
