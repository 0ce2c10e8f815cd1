//! Caller-owned curl handle reused across attempts and requests.

use std::str;
use std::time::Duration;

use super::error::TransportError;
use super::response::{parse_headers, Response};
use crate::config::HttpConfig;
use crate::error::ConfigError;
use crate::proxy::ProxyMap;

/// Per-request settings.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Proxy descriptor for this request only; overrides the session proxy.
    pub proxy: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            headers: Vec::new(),
            body: None,
            proxy: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn proxy(mut self, descriptor: impl Into<String>) -> Self {
        self.proxy = Some(descriptor.into());
        self
    }
}

/// A reusable curl handle with default proxy, timeouts and user agent.
///
/// Options are reset before every request; the handle's connection cache is
/// kept, so repeated attempts against one host can reuse a connection.
#[derive(Debug)]
pub struct Session {
    easy: curl::easy::Easy,
    proxy: Option<ProxyMap>,
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let defaults = HttpConfig::default();
        Self {
            easy: curl::easy::Easy::new(),
            proxy: None,
            connect_timeout: Duration::from_secs(defaults.connect_timeout_secs),
            timeout: Duration::from_secs(defaults.timeout_secs),
            user_agent: None,
        }
    }

    /// Session configured from the `[http]` config section. A malformed proxy
    /// descriptor is rejected here.
    pub fn from_config(cfg: &HttpConfig) -> Result<Self, ConfigError> {
        let mut session = Self::new();
        session.connect_timeout = Duration::from_secs(cfg.connect_timeout_secs);
        session.timeout = Duration::from_secs(cfg.timeout_secs);
        session.user_agent = cfg.user_agent.clone();
        if let Some(descriptor) = &cfg.proxy {
            session.set_proxy(descriptor)?;
        }
        Ok(session)
    }

    /// Route this session's requests through `descriptor`
    /// (`ip:port` or `ip:port:login:password`).
    pub fn set_proxy(&mut self, descriptor: &str) -> Result<&ProxyMap, ConfigError> {
        let map = ProxyMap::parse(descriptor)?;
        Ok(self.proxy.insert(map))
    }

    pub fn clear_proxy(&mut self) {
        self.proxy = None;
    }

    pub fn proxy(&self) -> Option<&ProxyMap> {
        self.proxy.as_ref()
    }

    /// Perform one request. `proxy` is the already-resolved proxy URL, if any.
    pub(crate) fn perform(
        &mut self,
        url: &str,
        opts: &RequestOptions,
        proxy: Option<&str>,
    ) -> Result<Response, TransportError> {
        let easy = &mut self.easy;
        easy.reset();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        if let Some(agent) = &self.user_agent {
            easy.useragent(agent)?;
        }
        if let Some(proxy) = proxy {
            easy.proxy(proxy)?;
        }

        if let Some(body) = &opts.body {
            easy.post_fields_copy(body)?;
        }
        match opts.method.to_ascii_uppercase().as_str() {
            "HEAD" => easy.nobody(true)?,
            "GET" if opts.body.is_none() => easy.get(true)?,
            method => easy.custom_request(method)?,
        }

        if !opts.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in &opts.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }

        let mut body = Vec::new();
        let mut header_lines = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(Response {
            status,
            headers: parse_headers(&header_lines),
            body,
        })
    }
}
