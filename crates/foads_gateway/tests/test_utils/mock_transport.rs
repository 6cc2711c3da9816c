//! Scripted transport that records requests and replays canned responses.

use async_trait::async_trait;
use foads_error::HttpError;
use foads_gateway::{Transport, TransportRequest, TransportResponse};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Respond with a status and JSON body
    Json(u16, Value),
    /// Respond with a status and raw text body
    Text(u16, String),
    /// Fail before any response arrives
    NetworkError(String),
}

impl MockResponse {
    fn into_result(self) -> Result<TransportResponse, HttpError> {
        match self {
            MockResponse::Json(status, body) => Ok(TransportResponse {
                status,
                reason: reason(status).to_string(),
                body: body.to_string().into_bytes(),
            }),
            MockResponse::Text(status, body) => Ok(TransportResponse {
                status,
                reason: reason(status).to_string(),
                body: body.into_bytes(),
            }),
            MockResponse::NetworkError(message) => Err(HttpError::new(message)),
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    }
}

/// Transport keyed by URL path.
///
/// Each path has a queue of responses; the last one repeats once the queue
/// is down to a single entry. Unscripted paths fail like a refused
/// connection. Requests carrying a rejected token always get a 401.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    rejected_tokens: Mutex<Vec<String>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    /// Empty transport; every request fails with a network error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport with a working login endpoint issuing `token`.
    pub fn with_login(token: &str) -> Self {
        let transport = Self::new();
        transport.on(
            "/auth/login",
            MockResponse::Json(
                200,
                serde_json::json!({"status": "success", "token": token, "type": "Bearer"}),
            ),
        );
        transport
    }

    /// Queue a response for `path`.
    pub fn on(&self, path: &str, response: MockResponse) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Answer 401 to any request authorized with `token`.
    pub fn reject_token(&self, token: &str) -> &Self {
        self.rejected_tokens.lock().unwrap().push(token.to_string());
        self
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent to `path`.
    pub fn requests_to(&self, path: &str) -> Vec<TransportRequest> {
        self.requests()
            .into_iter()
            .filter(|r| path_of(&r.url) == path)
            .collect()
    }
}

fn path_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    match without_scheme.find('/') {
        Some(index) => &without_scheme[index..],
        None => "/",
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, HttpError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(auth) = request.header("Authorization") {
            let rejected = self
                .rejected_tokens
                .lock()
                .unwrap()
                .iter()
                .any(|token| auth == format!("Bearer {}", token));
            if rejected {
                return MockResponse::Json(
                    401,
                    serde_json::json!({"status": "error", "message": "Token inválido"}),
                )
                .into_result();
            }
        }

        let path = path_of(&request.url).to_string();
        let response = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&path) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        response
            .unwrap_or_else(|| MockResponse::NetworkError("Connection refused".to_string()))
            .into_result()
    }
}
