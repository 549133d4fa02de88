//! Minimal HTTP/1.1 server for download tests.
//!
//! Serves a fixed route table; unknown paths get 404. Supports an optional
//! per-request delay and tracks how many requests are being served at once so
//! tests can assert the pool's concurrency bound.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// One servable resource.
#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Route {
    /// 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Route {
            status: 200,
            body: body.into(),
        }
    }

    /// Bodyless response with the given status.
    pub fn status(status: u16) -> Self {
        Route {
            status,
            body: Vec::new(),
        }
    }
}

/// Tracks current and peak number of in-flight requests.
#[derive(Debug, Default)]
pub struct ConcurrencyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyGauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Handle to a running test server.
pub struct TestServer {
    base_url: String,
    gauge: Arc<ConcurrencyGauge>,
}

impl TestServer {
    /// Absolute URL for a path on this server (path must start with '/').
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Highest number of requests that were in flight simultaneously.
    pub fn peak_concurrency(&self) -> usize {
        self.gauge.peak()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> TestServer {
    start_with_delay(routes, Duration::ZERO)
}

/// Like `start`, but each request sleeps `delay` before responding, keeping
/// requests in flight long enough for concurrency assertions.
pub fn start_with_delay(routes: Vec<(&str, Route)>, delay: Duration) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    let gauge = Arc::new(ConcurrencyGauge::default());
    let gauge_for_server = Arc::clone(&gauge);

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let gauge = Arc::clone(&gauge_for_server);
            thread::spawn(move || handle(stream, &routes, &gauge, delay));
        }
    });

    TestServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        gauge,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    gauge: &ConcurrencyGauge,
    delay: Duration,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = match request_path(request) {
        Some(p) => p,
        None => return,
    };

    gauge.enter();
    if !delay.is_zero() {
        thread::sleep(delay);
    }

    match routes.get(path) {
        Some(route) => {
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                route.status,
                reason(route.status),
                route.body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.write_all(&route.body);
        }
        None => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
    gauge.exit();
}

fn request_path(request: &str) -> Option<&str> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    if !method.eq_ignore_ascii_case("GET") {
        return None;
    }
    parts.next()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
