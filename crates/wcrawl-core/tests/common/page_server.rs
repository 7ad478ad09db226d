//! Minimal HTTP/1.1 server serving small HTML pages for integration tests.
//!
//! Every path gets a deterministic page that mentions the path. `/missing`
//! answers 404 with a body, and any path starting with `/stall` sleeps for
//! the configured duration before answering.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct PageServerOptions {
    /// How long `/stall*` requests wait before responding.
    pub stall: Duration,
}

impl Default for PageServerOptions {
    fn default() -> Self {
        Self {
            stall: Duration::from_secs(10),
        }
    }
}

/// Starts a server in a background thread. Returns the base URL
/// (e.g. "http://127.0.0.1:12345/"). The server runs until the process exits.
pub fn start() -> String {
    start_with_options(PageServerOptions::default())
}

pub fn start_with_options(opts: PageServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream, opts));
        }
    });
    format!("http://127.0.0.1:{}/", port)
}

/// A URL on a local port nobody listens on (connection refused).
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/gone", port)
}

/// The body served for `path` with status 200.
pub fn page_body(path: &str) -> String {
    format!(
        "<html><head><title>{path}</title></head>\
<body><h1>{path}</h1><p>Linux kernel code, built with libcurl.</p></body></html>\n"
    )
}

fn handle(mut stream: TcpStream, opts: PageServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    if path.starts_with("/stall") {
        thread::sleep(opts.stall);
    }

    let (status, body) = if path == "/missing" {
        ("404 Not Found", "<html><body>Not found</body></html>\n".to_string())
    } else {
        ("200 OK", page_body(&path))
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}
