//! In-memory transport for tests.
//!
//! Provides canned responses keyed by `(verb, path)` and records every
//! request it receives.
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new()
//!     .respond_json(HttpVerb::Get, "/widgets/7", 200, json!({"id": 7}))
//!     .respond(HttpVerb::Delete, "/widgets/7", 204, "");
//! ```

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use rest_synth_types::HttpVerb;
use std::time::Duration;

use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

#[derive(Debug, Clone)]
enum MockReply {
    Respond(HttpResponse),
    Fail(String),
}

#[derive(Debug, Clone)]
struct MockRoute {
    method: HttpVerb,
    path: String,
    reply: MockReply,
}

/// Transport that answers from a fixed table. Unmatched requests get a 404.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Vec<MockRoute>,
    delay: Option<Duration>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, method: HttpVerb, path: &str, status: u16, body: &str) -> Self {
        self.routes.push(MockRoute {
            method,
            path: path.to_string(),
            reply: MockReply::Respond(HttpResponse::new(status, body.as_bytes().to_vec())),
        });
        self
    }

    pub fn respond_json(
        mut self,
        method: HttpVerb,
        path: &str,
        status: u16,
        value: serde_json::Value,
    ) -> Self {
        self.routes.push(MockRoute {
            method,
            path: path.to_string(),
            reply: MockReply::Respond(HttpResponse::json(status, &value)),
        });
        self
    }

    /// Make matching requests fail before any response is produced.
    pub fn fail(mut self, method: HttpVerb, path: &str, message: &str) -> Self {
        self.routes.push(MockRoute {
            method,
            path: path.to_string(),
            reply: MockReply::Fail(message.to_string()),
        });
        self
    }

    /// Sleep before answering every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let matched = self
            .routes
            .iter()
            .find(|route| route.method == request.method && route.path == request.path());

        match matched.map(|route| &route.reply) {
            Some(MockReply::Respond(response)) => Ok(response.clone()),
            Some(MockReply::Fail(message)) => Err(anyhow!("{}", message)),
            None => Ok(HttpResponse::new(404, Vec::new())),
        }
    }
}
