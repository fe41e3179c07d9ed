//! MCP session state and the initialization handshake.
//!
//! ```text
//! Uninitialized ──initialize──▶ Initializing ──notifications/initialized──▶ Established
//! ```
//!
//! The session id is taken from the `Mcp-Session-Id` header of the
//! `initialize` response and is written exactly once.

use url::Url;

use crate::error::{McpError, Result};
use crate::protocol::{
    INITIALIZE_ID, InitializeParams, InitializeResult, JsonRpcNotification, JsonRpcRequest,
    ServerInfo,
};
use crate::transport::HttpTransport;

/// Handshake progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing sent yet.
    #[default]
    Uninitialized,
    /// `initialize` in flight, or answered and waiting on the notification.
    Initializing,
    /// Both handshake messages sent; requests may be issued.
    Established,
}

/// One MCP session against one host.
#[derive(Debug, Clone)]
pub struct Session {
    host: Url,
    protocol_version: String,
    session_id: Option<String>,
    state: SessionState,
    server_info: Option<ServerInfo>,
}

impl Session {
    /// Create an unestablished session.
    pub fn new(host: Url, protocol_version: &str) -> Self {
        Self {
            host,
            protocol_version: InitializeParams::new(protocol_version).protocol_version,
            session_id: None,
            state: SessionState::Uninitialized,
            server_info: None,
        }
    }

    /// Host this session talks to.
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Protocol version sent in `initialize`.
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Session id issued by the server, once known.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Current handshake state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether requests may be issued.
    pub fn is_established(&self) -> bool {
        self.state == SessionState::Established
    }

    /// Server info from the `initialize` result, when the server sent it.
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    /// Run the handshake and return the session id.
    ///
    /// A no-op once established. If only the notification failed on an
    /// earlier attempt, the stored session id is reused and `initialize` is
    /// not sent again.
    pub fn handshake(&mut self, transport: &HttpTransport) -> Result<&str> {
        if self.state != SessionState::Established {
            self.state = SessionState::Initializing;

            if self.session_id.is_none() {
                let session_id = self.initialize(transport)?;
                self.session_id = Some(session_id);
            }

            let notification = JsonRpcNotification::new("notifications/initialized", None);
            transport.send_notification(&notification, self.session_id.as_deref())?;

            self.state = SessionState::Established;
            tracing::debug!(host = %self.host, "MCP session established");
        }

        self.session_id.as_deref().ok_or(McpError::MissingSessionId)
    }

    fn initialize(&mut self, transport: &HttpTransport) -> Result<String> {
        let params = InitializeParams::new(&self.protocol_version);
        let request = JsonRpcRequest::new(
            INITIALIZE_ID,
            "initialize",
            Some(serde_json::to_value(&params)?),
        );

        let reply = transport.exchange(&request, None)?;
        let session_id = reply.session_id.ok_or(McpError::MissingSessionId)?;

        // The body is informational only; the header is what the session needs.
        let result = serde_json::from_str::<serde_json::Value>(&reply.text)
            .ok()
            .and_then(|body| body.get("result").cloned())
            .and_then(|result| serde_json::from_value::<InitializeResult>(result).ok())
            .unwrap_or_default();

        match &result.server_info {
            Some(server) => tracing::info!(
                session_id = %session_id,
                server = %server.name,
                version = %server.version,
                protocol = result.protocol_version.as_deref().unwrap_or(&self.protocol_version),
                "MCP server initialized"
            ),
            None => tracing::info!(session_id = %session_id, "MCP server initialized"),
        }

        self.server_info = result.server_info;
        Ok(session_id)
    }
}
