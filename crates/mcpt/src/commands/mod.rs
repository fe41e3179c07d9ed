//! CLI command handlers.

pub mod call;
pub mod list;
pub mod ping;

use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::ValueEnum;

use mcpt_client::{ClientConfig, McpClient};

/// How list results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of descriptors
    Json,
    /// Ready-to-run `mcpt call` templates with annotated properties
    Call,
}

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Client configuration, built once from the global flags.
    pub config: ClientConfig,
    /// Output format for list results.
    pub output: OutputFormat,
}

impl Context {
    /// Build the context from the global flags.
    pub fn new(
        host: String,
        protocol_version: String,
        output: OutputFormat,
        timeout_secs: u64,
        headers: &[String],
    ) -> Result<Self> {
        let mut config = ClientConfig::new(host)
            .with_protocol_version(protocol_version)
            .with_timeout(Duration::from_secs(timeout_secs));

        for header in headers {
            let (key, value) = parse_header(header)?;
            config = config.with_header(key, value);
        }

        Ok(Self { config, output })
    }

    /// Connect a client for this run.
    pub fn connect(&self) -> Result<McpClient> {
        McpClient::connect(self.config.clone())
            .with_context(|| format!("failed to connect to {}", self.config.host))
    }
}

/// Split a `KEY=VALUE` header argument.
fn parse_header(header: &str) -> Result<(String, String)> {
    match header.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(anyhow::anyhow!(
            "Invalid header format: '{}'. Use KEY=VALUE.",
            header
        )),
    }
}
