//! In-process HTTP server that records requests and replays a canned response.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::CoincraddleClient;

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

struct Shared {
    status: StatusCode,
    body: String,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockServer {
    base_url: String,
    shared: Arc<Shared>,
}

impl MockServer {
    pub const API_KEY: &'static str = "test-api-key";

    /// Answer every request with `status` and `body`.
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let shared = Arc::new(Shared {
            status,
            body: body.into(),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(record)
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            shared,
        }
    }

    pub async fn json(body: serde_json::Value) -> Self {
        Self::start(StatusCode::OK, body.to_string()).await
    }

    pub fn client(&self) -> CoincraddleClient {
        CoincraddleClient::with_base_url(Self::API_KEY, self.base_url.clone()).unwrap()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }
}

async fn record(
    State(shared): State<Arc<Shared>>,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    shared.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query,
        headers,
    });

    (
        shared.status,
        [(header::CONTENT_TYPE, "application/json")],
        shared.body.clone(),
    )
}
