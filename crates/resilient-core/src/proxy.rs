//! Proxy descriptor formatting.
//!
//! Turns `ip:port` or `ip:port:login:password` into the per-scheme proxy URLs
//! a session routes through.

use std::str::FromStr;

use crate::error::ConfigError;

/// Proxy URL per request scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyMap {
    pub http: String,
    pub https: String,
}

impl ProxyMap {
    /// Parse a descriptor. Newlines are ignored, so lines read from a proxy
    /// list can be passed as-is.
    pub fn parse(descriptor: &str) -> Result<Self, ConfigError> {
        let cleaned = descriptor.replace('\n', "");
        let fields: Vec<&str> = cleaned.split(':').collect();
        let url = match fields.as_slice() {
            [ip, port] => format!("http://{}:{}", ip, port),
            [ip, port, login, password] => {
                format!("http://{}:{}@{}:{}/", login, password, ip, port)
            }
            _ => return Err(ConfigError::UnsupportedProxy(descriptor.to_string())),
        };
        Ok(Self {
            http: url.clone(),
            https: url,
        })
    }

    /// Proxy URL for a request scheme; unknown schemes go through the HTTP entry.
    pub fn for_scheme(&self, scheme: &str) -> &str {
        if scheme.eq_ignore_ascii_case("https") {
            &self.https
        } else {
            &self.http
        }
    }
}

impl FromStr for ProxyMap {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
