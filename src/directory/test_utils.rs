//! Scripted transport and resolver for directory client tests.
//!
//! [`MockTransport`] answers requests from a queue of canned responses, in
//! order, and records every request it receives so tests can assert on the
//! exact network traffic. [`MockResolver`] maps usernames from a fixed table.
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new()
//!     .respond_json(StatusCode::OK, json!({"Resources": [{"id": "g-1"}]}))
//!     .respond(TransportResponse::new(StatusCode::NO_CONTENT, ""));
//! let client = GroupClient::new(&transport, MockResolver::new());
//! client.delete_group(&auth, "Engineers").await?;
//! assert_eq!(transport.count(Method::DELETE), 1);
//! ```

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use http::{Method, StatusCode};
use serde_json::Value;

use super::{DirectoryError, DirectoryResult, UserResolver};
use crate::{
    config::AuthConfig,
    transport::{Transport, TransportError, TransportRequest, TransportResponse},
};

/// Transport that replays scripted responses and records requests.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(self, response: TransportResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue a JSON response.
    pub fn respond_json(self, status: StatusCode, body: Value) -> Self {
        self.respond(TransportResponse::new(status, body.to_string()))
    }

    /// Queue a transport failure.
    pub fn fail(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// All requests received so far, in order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received with the given method.
    pub fn count(&self, method: Method) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    /// Decoded query parameter of the request at `index`.
    pub fn query_param(&self, index: usize, name: &str) -> Option<String> {
        self.requests.lock().unwrap()[index]
            .url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// JSON body of the request at `index`.
    pub fn body_json(&self, index: usize) -> Value {
        let requests = self.requests.lock().unwrap();
        let body = requests[index].body.as_ref().expect("request has a body");
        serde_json::from_slice(body).expect("request body is JSON")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = request.url.to_string();
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::request(url, "no scripted response left")))
    }
}

/// Resolver backed by a fixed username table.
#[derive(Default)]
pub struct MockResolver {
    users: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: &str, id: &str) -> Self {
        self.users.insert(username.to_string(), id.to_string());
        self
    }

    /// Usernames looked up so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserResolver for MockResolver {
    async fn resolve_user_id(&self, _auth: &AuthConfig, username: &str) -> DirectoryResult<String> {
        self.calls.lock().unwrap().push(username.to_string());
        self.users.get(username).cloned().ok_or_else(|| {
            DirectoryError::not_found("User", format!("no user found with userName {username}"))
        })
    }
}
