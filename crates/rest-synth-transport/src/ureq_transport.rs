//! `ureq`-backed transport.
//!
//! `ureq` is blocking, so each request runs on tokio's blocking pool. The
//! agent is cheap to clone and shares its connection pool across clones.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rest_synth_types::env_utils::{env_non_empty, env_var_or};
use std::io::Read;
use std::time::Duration;
use tracing::debug;

use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Connection settings for [`UreqTransport`].
///
/// Configuration via environment variables:
///
/// - `REST_SYNTH_BASE_URL` - prefix for relative request URLs
/// - `REST_SYNTH_TIMEOUT_SECS` - overall request timeout (default: 30)
/// - `REST_SYNTH_CONNECT_TIMEOUT_SECS` - connect timeout (default: 10)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl TransportConfig {
    /// Default request timeout in seconds (can be overridden by env).
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Self {
        Self {
            base_url: env_non_empty("REST_SYNTH_BASE_URL"),
            timeout: Duration::from_secs(env_var_or(
                "REST_SYNTH_TIMEOUT_SECS",
                Self::DEFAULT_TIMEOUT_SECS,
            )),
            connect_timeout: Duration::from_secs(env_var_or(
                "REST_SYNTH_CONNECT_TIMEOUT_SECS",
                Self::DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    /// Join `url` onto the base URL unless it is already absolute.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url.trim_start_matches('/')
            ),
            None => url.to_string(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// HTTP transport over a shared `ureq` agent.
///
/// Requests run on the blocking pool. Dropping the `send` future (or a
/// per-call timeout firing) stops waiting for the result, but the request
/// itself runs until it completes or hits the agent's own timeouts.
#[derive(Clone)]
pub struct UreqTransport {
    config: TransportConfig,
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .timeout_connect(config.connect_timeout)
            .build();
        Self { config, agent }
    }

    pub fn from_env() -> Self {
        Self::new(TransportConfig::from_env())
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn send_blocking(agent: &ureq::Agent, url: &str, request: &HttpRequest) -> Result<HttpResponse> {
        let mut call = agent.request(request.method.as_str(), url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let result = match &request.body {
            Some(body) => call.send_bytes(body),
            None => call.call(),
        };

        // Non-2xx responses are still responses; status handling is the caller's job.
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(e) => return Err(anyhow!("HTTP {} {} failed: {}", request.method, url, e)),
        };

        let status = response.status();
        let headers = response
            .headers_names()
            .into_iter()
            .filter_map(|name| {
                let value = response.header(&name)?.to_string();
                Some((name, value))
            })
            .collect();

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.config.resolve_url(&request.url);
        let agent = self.agent.clone();
        debug!(method = %request.method, url = %url, "sending request");

        let response =
            tokio::task::spawn_blocking(move || Self::send_blocking(&agent, &url, &request))
                .await
                .map_err(|e| anyhow!("transport task failed: {}", e))??;

        debug!(status = response.status, "received response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url_joins_base() {
        let config = TransportConfig::default().with_base_url("http://localhost:8080/api/");
        assert_eq!(
            config.resolve_url("/widgets/1"),
            "http://localhost:8080/api/widgets/1"
        );
        assert_eq!(
            config.resolve_url("https://other.example/x"),
            "https://other.example/x"
        );
        assert_eq!(TransportConfig::default().resolve_url("/w"), "/w");
    }

    #[test]
    fn test_default_timeouts() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.base_url.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = UreqTransport::new(
            TransportConfig::default()
                .with_base_url("http://127.0.0.1:1")
                .with_timeouts(Duration::from_secs(2), Duration::from_secs(1)),
        );
        let request = HttpRequest::new(rest_synth_types::HttpVerb::Get, "/widgets/1");
        let err = transport.send(request).await.expect_err("connection should fail");
        assert!(err.to_string().contains("GET"));
    }
}
