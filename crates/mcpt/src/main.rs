//! mcpt - command-line client for Model Context Protocol servers
//!
//! Main entry point for the mcpt CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

use mcpt_client::{DEFAULT_HOST, DEFAULT_PROTOCOL_VERSION};

mod commands;

use commands::{OutputFormat, call, list, ping};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// mcpt - Model Context Protocol command-line client
#[derive(Parser)]
#[command(name = "mcpt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// MCP server URL
    #[arg(long, global = true, env = "MCPT_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// MCP protocol version sent during initialization
    #[arg(
        long,
        global = true,
        env = "MCPT_PROTOCOL_VERSION",
        default_value = DEFAULT_PROTOCOL_VERSION
    )]
    pub protocol_version: String,

    /// Output format for list results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Deadline in seconds for the whole run
    #[arg(long, global = true, default_value = "5")]
    pub timeout: u64,

    /// Extra HTTP header in KEY=VALUE format (repeatable)
    #[arg(long = "header", short = 'H', global = true)]
    pub headers: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the server completes a handshake and answers ping
    Ping(ping::PingArgs),

    /// List the server's tools, prompts or resources
    List(list::ListArgs),

    /// Call a tool with JSON arguments
    Call(call::CallArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pipeable
    let filter = if cli.verbose {
        "mcpt=debug,mcpt_client=debug,info"
    } else {
        "warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
                ),
        )
        .init();

    let ctx = commands::Context::new(
        cli.host,
        cli.protocol_version,
        cli.output,
        cli.timeout,
        &cli.headers,
    )?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Ping(args) => ping::run(args, &ctx),
        Commands::List(args) => list::run(args, &ctx),
        Commands::Call(args) => call::run(args, &ctx),
    }
}
