//! Proxy command: expand a descriptor into per-scheme proxy URLs.

use anyhow::Result;
use resilient_core::proxy::ProxyMap;

pub fn run_proxy(descriptor: &str) -> Result<()> {
    let map = ProxyMap::parse(descriptor)?;
    println!("http  {}", map.http);
    println!("https {}", map.https);
    Ok(())
}
