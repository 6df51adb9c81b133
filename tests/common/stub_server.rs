//! An axum server standing in for the PLACES API.
//!
//! Each request is answered with the next queued response and recorded, so
//! tests can check paths, query parameters and headers. The server runs on
//! its own tokio runtime; the blocking client under test talks to it over
//! real HTTP.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

/// One canned response
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(body: &serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: r#"{"message":"stub error"}"#.to_string(),
        }
    }
}

/// What the client sent
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

struct StubState {
    responses: Mutex<VecDeque<StubResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A running stub server; it shuts down when dropped
pub struct StubServer {
    addr: SocketAddr,
    state: Arc<StubState>,
    _runtime: Runtime,
}

impl StubServer {
    /// Start serving `responses` in order on an ephemeral port
    pub fn start(responses: Vec<StubResponse>) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("Failed to build stub runtime");

        let state = Arc::new(StubState {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        });

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Failed to read stub address");

        let app = Router::new()
            .fallback(respond)
            .with_state(Arc::clone(&state));
        runtime.spawn(async move {
            axum::serve(listener, app).await.expect("Stub server error");
        });

        Self {
            addr,
            state,
            _runtime: runtime,
        }
    }

    /// Base URL to put in the client configuration
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v3/views/", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

/// Record the request, then answer with the next queued response
async fn respond(
    State(state): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers,
    });

    let next = state.responses.lock().unwrap().pop_front();
    match next {
        Some(response) => {
            let status =
                StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                response.body,
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "no response queued").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_decoded_query() {
        let server = StubServer::start(vec![StubResponse::json(&serde_json::json!([]))]);
        let url = format!(
            "{}abcd-1234/query.json?%24limit=10&%24order=%3Aid",
            server.base_url()
        );

        let response = reqwest::blocking::get(url).unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/api/v3/views/abcd-1234/query.json");
        assert_eq!(requests[0].query_param("$limit"), Some("10"));
        assert_eq!(requests[0].query_param("$order"), Some(":id"));
    }

    #[test]
    fn test_exhausted_queue_is_not_found() {
        let server = StubServer::start(Vec::new());
        let url = format!("{}abcd-1234/query.json", server.base_url());

        let response = reqwest::blocking::get(url).unwrap();
        assert_eq!(response.status().as_u16(), 404);
        assert_eq!(server.requests().len(), 1);
    }
}
