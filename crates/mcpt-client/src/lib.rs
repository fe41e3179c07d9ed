//! MCP (Model Context Protocol) session client for `mcpt`.
//!
//! This crate implements the protocol core of the `mcpt` command-line tool:
//! the HTTP transport, the session handshake, JSON-RPC request correlation,
//! the `ping` / `<kind>/list` / `tools/call` operations and introspection of
//! tool input schemas.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  McpClient                                                  │
//! │  - ping, list_feature, call_tool                            │
//! │  - Builds JSON-RPC envelopes and validates echoed id        │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session                                                    │
//! │  - initialize + notifications/initialized                   │
//! │  - Holds the Mcp-Session-Id issued by the server            │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  HttpTransport                                              │
//! │  - One JSON POST per message, one deadline per run          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use mcpt_client::{ArgumentTemplate, ClientConfig, FeatureDescriptor, FeatureKind, McpClient};
//!
//! # fn main() -> mcpt_client::Result<()> {
//! let mut client = McpClient::connect(ClientConfig::new("http://localhost:8080/mcp"))?;
//!
//! for tool in client.list_feature(FeatureKind::Tools)? {
//!     let descriptor = FeatureDescriptor::from_value(&tool)?;
//!     let template = ArgumentTemplate::from_descriptor(&descriptor)?;
//!     println!("{}", template.command_line(client.host().as_str()));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Protocol flow
//!
//! 1. Client POSTs `initialize` (id 1); the server answers with an
//!    `Mcp-Session-Id` header
//! 2. Client POSTs `notifications/initialized` carrying that header
//! 3. Client POSTs exactly one operation request (id `"123"`) carrying the header

pub mod client;
pub mod error;
pub mod protocol;
pub mod schema;
pub mod session;
pub mod transport;

// Re-export main types
pub use client::{ClientConfig, DEFAULT_HOST, McpClient};
pub use error::{McpError, Result};
pub use protocol::{
    CallToolParams, DEFAULT_PROTOCOL_VERSION, FeatureKind, InitializeParams, InitializeResult,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId, SESSION_HEADER, ServerInfo,
};
pub use schema::{
    ArgumentTemplate, ArrayItems, FeatureDescriptor, Placeholder, PropertyAnnotation, SchemaNode,
    TemplateField, annotate_properties,
};
pub use session::{Session, SessionState};
pub use transport::{DEFAULT_TIMEOUT, HttpReply, HttpTransport, HttpTransportConfig, RawReply};
