//! Minimal HTTP stub of the notes server.

// Allow dead code since this is a test utility with methods for future tests
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    status: u16,
    body: String,
}

type Shared<T> = Arc<Mutex<Vec<T>>>;

/// Serves canned JSON responses on a local port and records every request.
///
/// Unknown routes answer 404. Every response closes the connection.
pub struct StubServer {
    addr: SocketAddr,
    routes: Shared<Route>,
    requests: Shared<Recorded>,
}

impl StubServer {
    /// Binds an ephemeral port and starts serving on a background thread.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Stub server has no address");
        let routes: Shared<Route> = Arc::default();
        let requests: Shared<Recorded> = Arc::default();

        let (r, q) = (Arc::clone(&routes), Arc::clone(&requests));
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                serve(stream, &r, &q);
            }
        });

        Self {
            addr,
            routes,
            requests,
        }
    }

    /// Base URL of the stub.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answers `method path` with `status` and `body`.
    pub fn route(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.routes.lock().unwrap().push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns `METHOD path` for every request received so far.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

fn serve(stream: TcpStream, routes: &Shared<Route>, requests: &Shared<Recorded>) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut authorization = None;
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.to_string());
            }
        }
    }

    let mut body = vec![0u8; content_length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }

    requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization,
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let (status, reply) = routes
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.method == method && r.path == path)
        .map(|r| (r.status, r.body.clone()))
        .unwrap_or((404, r#"{"message":"no such route"}"#.to_string()));

    let mut stream = stream;
    let _ = write!(
        stream,
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reply.len(),
        reply
    );
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_answers_routes_and_records() {
        let server = StubServer::start();
        server.route("GET", "/ping", 200, r#"{"ok":true}"#);

        let ok: serde_json::Value = ureq::get(&format!("{}/ping", server.url()))
            .set("Authorization", "Bearer t")
            .call()
            .unwrap()
            .into_json()
            .unwrap();
        assert_eq!(ok["ok"], serde_json::json!(true));

        let missing = ureq::get(&format!("{}/nope", server.url())).call();
        assert!(matches!(missing, Err(ureq::Error::Status(404, _))));

        let requests = server.requests();
        assert_eq!(server.request_lines(), ["GET /ping", "GET /nope"]);
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer t"));
    }
}
