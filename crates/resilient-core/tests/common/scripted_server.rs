//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers each connection with the next scripted `(status, body)` pair; the
//! last entry repeats once the script runs out. Every request's head and body
//! are recorded so tests can check what reached the wire (or that nothing did).

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub struct ScriptedServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub url: String,
    /// Address as `ip:port`, usable as a proxy descriptor.
    pub addr: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedServer {
    /// Raw requests received so far (request line, headers and body).
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(script: Vec<(u16, &'static str)>) -> ScriptedServer {
    assert!(!script.is_empty(), "script needs at least one response");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let index = {
                let mut seen = recorded.lock().unwrap();
                let raw = read_request(&stream).unwrap_or_default();
                seen.push(raw);
                seen.len() - 1
            };
            let (status, body) = script[index.min(script.len() - 1)];
            respond(stream, status, body);
        }
    });
    ScriptedServer {
        url: format!("http://{}/", addr),
        addr: addr.to_string(),
        requests,
    }
}

/// An address nothing listens on: bind, note the port, close.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

fn read_request(mut stream: &TcpStream) -> Option<String> {
    stream.set_read_timeout(Some(Duration::from_secs(2))).ok()?;
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(head_end) = text.find("\r\n\r\n") {
            let body_len = content_length(&text[..head_end]);
            if data.len() >= head_end + 4 + body_len {
                break;
            }
        }
    }
    Some(String::from_utf8_lossy(&data).to_string())
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn respond(mut stream: TcpStream, status: u16, body: &str) {
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let response = format!(
        "HTTP/1.1 {} Scripted\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
