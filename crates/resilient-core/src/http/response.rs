//! Response type and header-line parsing.

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code of the final response (after redirects).
    pub status: u32,
    /// Header fields of the final response, in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Parse collected header lines into fields. A status line starts a new
/// response (redirect hops), so only the last response's fields are kept.
pub(crate) fn parse_headers(lines: &[String]) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.starts_with("HTTP/") {
            fields.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            fields.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    fields
}
