//! In-process stand-in for the external API, used by tests.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Canned reply for one route.
#[derive(Debug, Clone)]
pub(crate) struct MockResponse {
    status: u16,
    body: Value,
    set_cookies: Vec<String>,
}

impl MockResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            set_cookies: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookies.push(cookie.to_owned());
        self
    }
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub cookie: Option<String>,
    pub body: Value,
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(String, String), VecDeque<MockResponse>>,
    requests: Vec<RecordedRequest>,
}

/// Mock API listening on an ephemeral port under `/api/v1`.
///
/// Each route replays its queued responses in order and repeats the last
/// one. Unknown routes answer 404 in envelope shape.
#[derive(Debug, Clone)]
pub(crate) struct MockApi {
    addr: SocketAddr,
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(Mutex::new(MockState::default()));
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handler_state = state.clone();
        let router = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
                let state = handler_state.clone();
                async move { handle(&state, method, uri, headers, body) }
            },
        );

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Queues a JSON reply for `method path`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.push(method, path, MockResponse::json(status, body));
    }

    /// Queues a prepared reply for `method path`.
    pub fn push(&self, method: &str, path: &str, response: MockResponse) {
        let mut state = self.state.lock().unwrap();
        state
            .routes
            .entry((method.to_owned(), path.to_owned()))
            .or_default()
            .push_back(response);
    }

    /// Returns every request received for `method path`.
    pub fn requests(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        let state = self.state.lock().unwrap();
        state
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.requests(method, path).len()
    }

    /// Total number of requests received.
    pub fn total_hits(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

fn handle(
    state: &Mutex<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .trim_start_matches("/api/v1")
        .trim_start_matches('/')
        .to_owned();

    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        cookie: headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let key = (method.to_string(), path);
    let reply = match state.routes.get_mut(&key) {
        Some(queue) if queue.len() > 1 => queue.pop_front(),
        Some(queue) => queue.front().cloned(),
        None => None,
    };

    let Some(reply) = reply else {
        let body = json!({ "success": false, "message": "Route not found" });
        return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
    };

    let status = StatusCode::from_u16(reply.status).unwrap();
    let mut response = (status, axum::Json(reply.body)).into_response();
    for cookie in reply.set_cookies {
        response
            .headers_mut()
            .append(SET_COOKIE, cookie.parse().unwrap());
    }
    response
}
