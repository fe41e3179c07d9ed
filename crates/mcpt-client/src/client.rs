//! MCP client: request correlation and the high-level operations.

use std::time::Duration;

use serde_json::{Map, Value};
use url::Url;

use crate::error::{McpError, Result};
use crate::protocol::{
    CallToolParams, DEFAULT_PROTOCOL_VERSION, FeatureKind, JSONRPC_VERSION, JsonRpcRequest,
    JsonRpcResponse, OPERATION_ID, RequestId,
};
use crate::session::Session;
use crate::transport::{DEFAULT_TIMEOUT, HttpTransport, HttpTransportConfig};

/// Endpoint used when no host is configured.
pub const DEFAULT_HOST: &str = "http://localhost:8080/mcp";

/// Configuration for one client run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the MCP endpoint.
    pub host: String,
    /// Protocol version sent in `initialize`.
    pub protocol_version: String,
    /// Deadline for the whole run.
    pub timeout: Duration,
    /// Extra HTTP headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Create a config for the given host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Set the protocol version.
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// Set the overall deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add an HTTP header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    fn transport_config(&self) -> HttpTransportConfig {
        self.headers.iter().fold(
            HttpTransportConfig::new(&self.host).with_timeout(self.timeout),
            |config, (key, value)| config.with_header(key, value),
        )
    }
}

/// An MCP client bound to a single host for a single run.
#[derive(Debug)]
pub struct McpClient {
    transport: HttpTransport,
    session: Session,
}

impl McpClient {
    /// Validate the host and start the run's deadline.
    ///
    /// Nothing is sent until the first operation, which performs the handshake.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::connect(config.transport_config())?;
        let session = Session::new(transport.url().clone(), &config.protocol_version);

        tracing::info!(
            url = %transport.url(),
            protocol = %session.protocol_version(),
            "connected to MCP server via HTTP"
        );

        Ok(Self { transport, session })
    }

    /// The host URL.
    pub fn host(&self) -> &Url {
        self.session.host()
    }

    /// The session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the handshake if it has not completed yet, returning the session id.
    pub fn initialize(&mut self) -> Result<&str> {
        self.session.handshake(&self.transport)
    }

    /// Send a request and validate the JSON-RPC envelope of the response.
    ///
    /// The response is returned whether it carries a `result` or an `error`.
    pub fn exchange(
        &self,
        method: &str,
        params: Option<Value>,
        id: impl Into<RequestId>,
    ) -> Result<JsonRpcResponse> {
        if !self.session.is_established() {
            return Err(McpError::NotInitialized);
        }

        let request = JsonRpcRequest::new(id, method, params);
        let reply = self
            .transport
            .send_request(&request, self.session.session_id())?;

        let response: JsonRpcResponse = serde_json::from_value(reply.body)
            .map_err(|e| McpError::decode(format!("not a JSON-RPC response: {}", e)))?;

        match response.jsonrpc() {
            Some(Value::String(version)) if version == JSONRPC_VERSION => {}
            Some(Value::String(version)) => {
                return Err(McpError::ProtocolMismatch(version.clone()));
            }
            Some(other) => return Err(McpError::ProtocolMismatch(other.to_string())),
            None => return Err(McpError::ProtocolMismatch("<absent>".to_string())),
        }

        if !response.id_matches(&request.id) {
            return Err(McpError::IdMismatch {
                expected: request.id.to_string(),
                found: response
                    .id()
                    .map_or_else(|| "<absent>".to_string(), Value::to_string),
            });
        }

        Ok(response)
    }

    /// Send a request and return its `result`, which must be an object.
    ///
    /// A response carrying an `error` member is rejected even when it also
    /// has a `result`.
    pub fn request(
        &self,
        method: &str,
        params: Option<Value>,
        id: impl Into<RequestId>,
    ) -> Result<Map<String, Value>> {
        let mut members = self.exchange(method, params, id)?.into_members();

        if let Some(error) = members.remove("error") {
            return Err(McpError::malformed_result(format!(
                "{} returned an error: {}",
                method, error
            )));
        }

        match members.remove("result") {
            Some(Value::Object(result)) => Ok(result),
            Some(other) => Err(McpError::malformed_result(format!(
                "{} result is not an object: {}",
                method, other
            ))),
            None => Err(McpError::malformed_result(format!(
                "{} returned no result",
                method
            ))),
        }
    }

    /// Check liveness.
    ///
    /// Succeeds only on exactly `{"jsonrpc":"2.0","id":"123","result":{}}`:
    /// an `error` member or any member outside those three fails.
    pub fn ping(&mut self) -> Result<()> {
        self.initialize()?;

        let response = self.exchange("ping", None, OPERATION_ID)?;
        if let Some(key) = response
            .members()
            .keys()
            .find(|key| !matches!(key.as_str(), "jsonrpc" | "id" | "result"))
        {
            return Err(McpError::malformed_result(format!(
                "ping response has unexpected member '{}'",
                key
            )));
        }

        if !response.result_object().is_some_and(Map::is_empty) {
            return Err(McpError::malformed_result(format!(
                "ping result must be an empty object, got {}",
                response
                    .result()
                    .map_or_else(|| "nothing".to_string(), Value::to_string)
            )));
        }

        tracing::info!(host = %self.host(), "ping OK");
        Ok(())
    }

    /// List the server's tools, prompts or resources as raw descriptors.
    pub fn list_feature(&mut self, kind: FeatureKind) -> Result<Vec<Value>> {
        self.initialize()?;

        let mut result = self.request(&kind.list_method(), None, OPERATION_ID)?;
        let features = match result.remove(kind.as_str()) {
            Some(Value::Array(features)) => features,
            _ => return Err(McpError::FeatureNotFound(kind.to_string())),
        };

        tracing::debug!(
            host = %self.host(),
            feature = %kind,
            count = features.len(),
            "listed MCP features"
        );

        Ok(features)
    }

    /// Call a tool with arguments given as a JSON string.
    ///
    /// The arguments are parsed before anything is sent and forwarded without
    /// checking them against the tool's schema. The full response is returned,
    /// including a server-side `error`.
    pub fn call_tool(&mut self, tool: &str, arguments_json: &str) -> Result<JsonRpcResponse> {
        let arguments: Value =
            serde_json::from_str(arguments_json).map_err(McpError::ArgumentParse)?;

        self.initialize()?;

        let params = CallToolParams {
            name: tool.to_string(),
            arguments,
        };
        let response = self.exchange(
            "tools/call",
            Some(serde_json::to_value(&params)?),
            OPERATION_ID,
        )?;

        let tool_error = response
            .result_object()
            .and_then(|r| r.get("isError"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if response.is_error() || tool_error {
            tracing::warn!(tool = %tool, "tool call returned error");
        } else {
            tracing::debug!(tool = %tool, "tool call succeeded");
        }

        Ok(response)
    }
}
