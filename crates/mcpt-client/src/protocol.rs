//! JSON-RPC 2.0 protocol types for MCP over HTTP.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol version sent when none is configured.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

/// Header carrying the session identifier in both directions.
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Client name advertised during initialization.
pub const CLIENT_NAME: &str = "mcpt";

/// Client version advertised during initialization.
pub const CLIENT_VERSION: &str = "1.0.0";

/// Request id used for the `initialize` request.
pub const INITIALIZE_ID: i64 = 1;

/// Request id used for every operation after the handshake.
pub const OPERATION_ID: &str = "123";

// ─────────────────────────────────────────────────────────────────────────────
// JSON-RPC Base Types
// ─────────────────────────────────────────────────────────────────────────────

/// A JSON-RPC request id. Numbers and strings never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Integer id.
    Number(i64),
    /// String id.
    String(String),
}

impl RequestId {
    /// The id as it appears on the wire.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::String(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self::String(id.to_string())
    }
}

/// A JSON-RPC request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0").
    pub jsonrpc: String,
    /// Request ID for correlating responses.
    pub id: RequestId,
    /// Method name to call.
    pub method: String,
    /// Method parameters (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC request.
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC notification (no id, no response expected).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    /// JSON-RPC version (always "2.0").
    pub jsonrpc: String,
    /// Method name.
    pub method: String,
    /// Method parameters (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Create a new notification.
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC response exactly as received from the server.
///
/// The members are held untouched, so a response serializes back to what
/// the server sent: non-standard `error` objects, explicit `null` members
/// and members outside the JSON-RPC envelope included. Envelope members are
/// read through accessors, and a missing one surfaces as a typed
/// correlation error rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonRpcResponse {
    members: Map<String, Value>,
}

impl JsonRpcResponse {
    /// Member named `key`, as received.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }

    /// All members, as received.
    pub fn members(&self) -> &Map<String, Value> {
        &self.members
    }

    /// The `jsonrpc` member.
    pub fn jsonrpc(&self) -> Option<&Value> {
        self.get("jsonrpc")
    }

    /// The echoed request id.
    pub fn id(&self) -> Option<&Value> {
        self.get("id")
    }

    /// The `result` member.
    pub fn result(&self) -> Option<&Value> {
        self.get("result")
    }

    /// The `error` member, whatever its shape.
    pub fn error(&self) -> Option<&Value> {
        self.get("error")
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Whether the echoed id is exactly `id`.
    pub fn id_matches(&self, id: &RequestId) -> bool {
        self.id() == Some(&id.to_value())
    }

    /// The result as an object, if it is one.
    pub fn result_object(&self) -> Option<&Map<String, Value>> {
        self.result().and_then(Value::as_object)
    }

    /// Consume the response, returning its members.
    pub fn into_members(self) -> Map<String, Value> {
        self.members
    }
}

impl From<Map<String, Value>> for JsonRpcResponse {
    fn from(members: Map<String, Value>) -> Self {
        Self { members }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MCP Protocol Types
// ─────────────────────────────────────────────────────────────────────────────

/// Document synchronization capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynchronizationCapability {
    /// Whether the client reports saves.
    pub did_save: bool,
}

/// Text document capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDocumentCapability {
    /// Synchronization support.
    pub synchronization: SynchronizationCapability,
}

/// Client capabilities sent during initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCapabilities {
    /// Text document capabilities.
    pub text_document: TextDocumentCapability,
}

impl Default for ClientCapabilities {
    fn default() -> Self {
        Self {
            text_document: TextDocumentCapability {
                synchronization: SynchronizationCapability { did_save: true },
            },
        }
    }
}

/// Client info sent during initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name.
    pub name: String,
    /// Client version.
    pub version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: CLIENT_NAME.to_string(),
            version: CLIENT_VERSION.to_string(),
        }
    }
}

/// Parameters for the initialize request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Client capabilities.
    pub capabilities: ClientCapabilities,
    /// Client info.
    pub client_info: ClientInfo,
    /// Protocol version.
    pub protocol_version: String,
}

impl InitializeParams {
    /// Build initialize params for a protocol version, falling back to the
    /// default when the given one is empty.
    pub fn new(protocol_version: &str) -> Self {
        let protocol_version = if protocol_version.trim().is_empty() {
            DEFAULT_PROTOCOL_VERSION
        } else {
            protocol_version
        };
        Self {
            capabilities: ClientCapabilities::default(),
            client_info: ClientInfo::default(),
            protocol_version: protocol_version.to_string(),
        }
    }
}

impl Default for InitializeParams {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOL_VERSION)
    }
}

/// Server info returned during initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name.
    pub name: String,
    /// Server version.
    #[serde(default)]
    pub version: String,
}

/// Result of the initialize request. Only read for logging, so every
/// member is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol version chosen by the server.
    #[serde(default)]
    pub protocol_version: Option<String>,
    /// Server info.
    #[serde(default)]
    pub server_info: Option<ServerInfo>,
}

/// The listable MCP feature families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// `tools/list`
    Tools,
    /// `prompts/list`
    Prompts,
    /// `resources/list`
    Resources,
}

impl FeatureKind {
    /// Key under `result` holding the feature array.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::Prompts => "prompts",
            Self::Resources => "resources",
        }
    }

    /// The `<kind>/list` method name.
    pub fn list_method(&self) -> String {
        format!("{}/list", self.as_str())
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for the tools/call request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments to pass to the tool, forwarded as given.
    pub arguments: Value,
}
