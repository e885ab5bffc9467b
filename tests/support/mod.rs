//! Test utilities: a stub secret store speaking just enough HTTP for the
//! blocking client.
//!
//! The stub binds an ephemeral port and serves one canned JSON response for
//! one expected path (anything else gets a 404).  It also counts requests so
//! key-caching tests can assert the store was only consulted once.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::Value;

pub struct StubStore {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubStore {
    /// Serve `body` with `status` for GETs of `/v1/secret/{secret_path}`.
    pub fn serve(secret_path: &str, status: u16, body: Value) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub store");
        let addr = listener.local_addr().expect("stub store address");
        let expected = format!("/v1/secret/{}", secret_path.trim_start_matches('/'));
        let payload = body.to_string();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = respond(stream, &expected, status, &payload);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    /// Base URL of the stub, without a trailing slash.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests received so far.
    #[allow(dead_code)] // Not every test binary asserts on the counter
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Read one request and write the canned response.
fn respond(
    mut stream: TcpStream,
    expected_path: &str,
    status: u16,
    payload: &str,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    // Drain the headers; the stub does not care about them.
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" {
            break;
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("");
    let (status, body) = if path == expected_path {
        (status, payload)
    } else {
        (404, "{}")
    };
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Error",
    };

    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )?;
    stream.flush()
}
