//! Shared utilities for gateway integration tests.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tradechat_gateway::{GatewayConfig, GatewayServer};

/// What the mock backend saw.
#[derive(Clone, Default)]
pub struct Recorder {
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Seen>>>,
}

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub query: Option<String>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<Seen> {
        self.requests.lock().unwrap().last().cloned()
    }
}

async fn record(State(recorder): State<Recorder>, request: Request, next: Next) -> Response {
    let seen = {
        let header = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Seen {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            authorization: header(header::AUTHORIZATION),
            content_type: header(header::CONTENT_TYPE),
            query: request.uri().query().map(str::to_string),
        }
    };
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    recorder.requests.lock().unwrap().push(seen);
    next.run(request).await
}

/// A mock backend listening on an ephemeral port.
pub struct MockBackend {
    pub addr: SocketAddr,
    pub recorder: Recorder,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Serve `app` as the backend, recording every request it receives.
pub async fn start_mock_backend(app: Router) -> MockBackend {
    let recorder = Recorder::default();
    let app = app.layer(middleware::from_fn_with_state(recorder.clone(), record));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, recorder }
}

/// Gateway config pointing at `backend`.
pub fn config_for(backend: &MockBackend) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.backend.base_url = backend.url();
    config
}

/// Build the gateway router for `config`.
pub fn gateway(config: GatewayConfig) -> Router {
    GatewayServer::new(config).unwrap().router()
}

/// Drive one request through `app`.
pub async fn send(app: &Router, request: axum::http::Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text.
#[allow(dead_code)]
pub async fn text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// All `Set-Cookie` header values.
#[allow(dead_code)]
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}
