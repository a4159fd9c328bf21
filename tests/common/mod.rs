//! In-process stand-in for a SWIS server.
//!
//! Serves HTTPS with a freshly generated self-signed certificate, records
//! every request it receives and answers all of them with one canned status
//! and body.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum_server::tls_rustls::RustlsConfig;
use serde_json::Value;
use swis_client::SwisConfig;

/// One request as seen by the mock server.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    recorded: Arc<Mutex<Vec<Recorded>>>,
    status: StatusCode,
    reply: &'static str,
}

pub struct MockServer {
    pub addr: SocketAddr,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    /// Client configuration pointing at this server with `admin`/`secret`
    /// and the default (lenient) certificate policy.
    pub fn config(&self) -> SwisConfig {
        SwisConfig::new(self.addr.ip().to_string(), "admin", "secret").with_port(self.addr.port())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> Recorded {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }
}

/// `Basic` header value for `admin`/`secret`.
pub const ADMIN_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

/// Path of the JSON API as the server sees it.
pub const ROOT: &str = "/SolarWinds/InformationService/v3/Json/";

fn state(status: StatusCode, reply: &'static str) -> MockState {
    MockState {
        recorded: Arc::new(Mutex::new(Vec::new())),
        status,
        reply,
    }
}

fn app(state: MockState) -> Router {
    Router::new().fallback(record).with_state(state)
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };

    state.recorded.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_owned(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });

    (state.status, state.reply.to_owned())
}

fn bind() -> (std::net::TcpListener, SocketAddr) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();
    (listener, addr)
}

async fn serve_tls(listener: std::net::TcpListener, state: MockState) {
    let certified =
        rcgen::generate_simple_self_signed(vec!["localhost".to_owned(), "127.0.0.1".to_owned()])
            .unwrap();
    let tls = RustlsConfig::from_pem(
        certified.cert.pem().into_bytes(),
        certified.key_pair.serialize_pem().into_bytes(),
    )
    .await
    .unwrap();

    axum_server::from_tcp_rustls(listener, tls)
        .serve(app(state).into_make_service())
        .await
        .unwrap();
}

/// Starts the mock on the current tokio runtime.
pub async fn spawn(status: StatusCode, reply: &'static str) -> MockServer {
    let state = state(status, reply);
    let recorded = state.recorded.clone();
    let (listener, addr) = bind();

    tokio::spawn(serve_tls(listener, state));

    MockServer { addr, recorded }
}

/// Starts the mock on its own thread and runtime, for blocking clients.
pub fn spawn_on_thread(status: StatusCode, reply: &'static str) -> MockServer {
    let state = state(status, reply);
    let recorded = state.recorded.clone();
    let (listener, addr) = bind();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(serve_tls(listener, state));
    });

    MockServer { addr, recorded }
}

/// A local address nothing is listening on.
pub fn closed_port_config() -> SwisConfig {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    SwisConfig::new("127.0.0.1", "admin", "secret").with_port(port)
}
