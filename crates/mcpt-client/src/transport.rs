//! HTTP transport for MCP communication.
//!
//! Every message is a single JSON POST to the server URL. All requests made
//! through one transport share a single deadline, fixed when the transport is
//! created, so the whole run is bounded rather than each request.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{McpError, Result};
use crate::protocol::{JsonRpcNotification, JsonRpcRequest, SESSION_HEADER};

/// Default budget for the whole run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// URL of the MCP endpoint.
    pub url: String,
    /// Deadline shared by every request made through the transport.
    pub timeout: Duration,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            headers: Vec::new(),
        }
    }
}

impl HttpTransportConfig {
    /// Create a new HTTP transport config with the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the overall deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// A reply whose body has been read but not decoded.
#[derive(Debug, Clone)]
pub struct RawReply {
    /// HTTP status.
    pub status: StatusCode,
    /// Value of the `Mcp-Session-Id` response header, if present and non-empty.
    pub session_id: Option<String>,
    /// Body text.
    pub text: String,
}

/// A decoded reply to a JSON-RPC request.
#[derive(Debug, Clone)]
pub struct HttpReply {
    /// Value of the `Mcp-Session-Id` response header, if present and non-empty.
    pub session_id: Option<String>,
    /// Decoded JSON body.
    pub body: Value,
}

/// Blocking HTTP transport bound to one MCP endpoint.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    url: Url,
    config: HttpTransportConfig,
    deadline: Instant,
}

impl HttpTransport {
    /// Create a new HTTP transport and start its deadline.
    pub fn connect(config: HttpTransportConfig) -> Result<Self> {
        let url = Url::parse(&config.url)
            .map_err(|e| McpError::transport(format!("invalid URL: {}", e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| McpError::transport(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!(
            url = %url,
            timeout_ms = config.timeout.as_millis() as u64,
            "created HTTP transport"
        );

        Ok(Self {
            client,
            url,
            deadline: Instant::now() + config.timeout,
            config,
        })
    }

    /// The endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Time left before the deadline, or `Timeout` once it has passed.
    pub fn remaining(&self) -> Result<Duration> {
        let left = self.deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            Err(McpError::Timeout)
        } else {
            Ok(left)
        }
    }

    /// Send a JSON-RPC request and return the undecoded reply.
    pub fn exchange(
        &self,
        request: &JsonRpcRequest,
        session_id: Option<&str>,
    ) -> Result<RawReply> {
        let resp = self.post(request, session_id)?;
        let status = resp.status();
        let session_id = resp
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let text = resp.text().map_err(McpError::from_reqwest)?;

        tracing::trace!(
            status = status.as_u16(),
            json = %text,
            "received MCP HTTP response"
        );

        Ok(RawReply {
            status,
            session_id,
            text,
        })
    }

    /// Send a JSON-RPC request and decode the JSON reply.
    pub fn send_request(
        &self,
        request: &JsonRpcRequest,
        session_id: Option<&str>,
    ) -> Result<HttpReply> {
        let raw = self.exchange(request, session_id)?;
        let body = match serde_json::from_str::<Value>(&raw.text) {
            Ok(body) => body,
            Err(_) if !raw.status.is_success() => {
                return Err(McpError::transport(format!(
                    "HTTP error {}: {}",
                    raw.status, raw.text
                )));
            }
            Err(e) => return Err(McpError::decode(e.to_string())),
        };

        Ok(HttpReply {
            session_id: raw.session_id,
            body,
        })
    }

    /// Send a JSON-RPC notification. The reply body is drained and dropped.
    pub fn send_notification(
        &self,
        notification: &JsonRpcNotification,
        session_id: Option<&str>,
    ) -> Result<()> {
        let resp = self.post(notification, session_id)?;
        let status = resp.status();
        resp.bytes().map_err(McpError::from_reqwest)?;

        tracing::debug!(
            method = %notification.method,
            status = status.as_u16(),
            "sent MCP notification"
        );

        Ok(())
    }

    fn post<T: Serialize>(&self, message: &T, session_id: Option<&str>) -> Result<Response> {
        let timeout = self.remaining()?;
        let json = serde_json::to_string(message)?;

        tracing::trace!(
            url = %self.url,
            json = %json,
            "sending MCP HTTP request"
        );

        let mut req = self
            .client
            .post(self.url.clone())
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        for (key, value) in &self.config.headers {
            req = req.header(key, value);
        }
        if let Some(sid) = session_id {
            req = req.header(SESSION_HEADER, sid);
        }

        req.body(json).send().map_err(McpError::from_reqwest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_config() {
        let config = HttpTransportConfig::new("http://localhost:8080/mcp")
            .with_timeout(Duration::from_secs(60))
            .with_header("Authorization", "Bearer token123");

        assert_eq!(config.url, "http://localhost:8080/mcp");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.headers.len(), 1);
        assert_eq!(
            config.headers[0],
            ("Authorization".to_string(), "Bearer token123".to_string())
        );
    }

    #[test]
    fn test_http_transport_config_default() {
        let config = HttpTransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_http_transport_creation() {
        let config = HttpTransportConfig::new("http://localhost:8080/mcp");
        let transport = HttpTransport::connect(config).unwrap();
        assert_eq!(transport.url().as_str(), "http://localhost:8080/mcp");
        assert!(transport.remaining().unwrap() <= Duration::from_secs(5));
    }

    #[test]
    fn test_http_transport_invalid_url() {
        let config = HttpTransportConfig::new("not a valid url");
        match HttpTransport::connect(config) {
            Err(McpError::Transport(msg)) => assert!(msg.contains("invalid URL")),
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_exhausted_deadline_fails_before_sending() {
        // Nothing listens on the discard port; the deadline check must win.
        let config =
            HttpTransportConfig::new("http://127.0.0.1:9/mcp").with_timeout(Duration::ZERO);
        let transport = HttpTransport::connect(config).unwrap();

        let request = JsonRpcRequest::new("123", "ping", None);
        let result = transport.send_request(&request, None);
        assert!(matches!(result, Err(McpError::Timeout)));

        let notification = JsonRpcNotification::new("notifications/initialized", None);
        let result = transport.send_notification(&notification, Some("abc"));
        assert!(matches!(result, Err(McpError::Timeout)));
    }
}
