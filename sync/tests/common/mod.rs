//! Test doubles shared by the catalog integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use catalog_core::{ApiError, CatalogClient, Filters, HttpMethod, HttpRequest, HttpResponse};
use catalog_sync::Transport;
use tokio::sync::oneshot;

pub const BASE_URL: &str = "http://catalog.test";

pub fn client() -> CatalogClient {
    CatalogClient::new(BASE_URL)
}

/// URL the core builds for a list request with `filters`.
pub fn list_url(filters: &Filters) -> String {
    client().build_list_entries(filters).full_url()
}

/// JSON list body with one entry per title; ids are the titles lowercased.
pub fn list_body(titles: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = titles
        .iter()
        .map(|t| serde_json::json!({ "id": t.to_lowercase(), "title": t }))
        .collect();
    serde_json::Value::Array(entries).to_string()
}

pub fn ok_list(titles: &[&str]) -> HttpResponse {
    HttpResponse::new(200, list_body(titles))
}

/// Scripted transport.
///
/// Requests whose full URL has a gate wait for the test to release them.
/// Everything else takes the next scripted reply, or `200 []` when the script
/// is exhausted. Every request is recorded.
#[derive(Default)]
pub struct StubTransport {
    log: Mutex<Vec<HttpRequest>>,
    script: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<HttpResponse>>>,
}

impl StubTransport {
    pub fn reply(&self, response: HttpResponse) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    pub fn reply_err(&self, err: ApiError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    /// Hold back the response to the request for `url` until the returned
    /// sender is used.
    pub fn gate(&self, url: String) -> oneshot::Sender<HttpResponse> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(url, rx);
        tx
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.full_url();
        self.log.lock().unwrap().push(request);

        let gate = self.gates.lock().unwrap().remove(&url);
        if let Some(gate) = gate {
            return gate
                .await
                .map_err(|_| ApiError::Transport("gate dropped".to_string()));
        }

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(HttpResponse::new(200, "[]")))
    }
}
