//! Call command - invoke a tool and print the server's response.

use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;

/// Arguments for the call command.
#[derive(Args, Debug)]
pub struct CallArgs {
    /// Tool name
    #[arg(long)]
    pub tool: String,

    /// Tool arguments as a JSON value
    #[arg(long, default_value = "{}")]
    pub arguments: String,
}

/// Run the call command.
///
/// The whole JSON-RPC response is printed, including a server-side error.
pub fn run(args: CallArgs, ctx: &Context) -> Result<()> {
    let mut client = ctx.connect()?;
    let response = client
        .call_tool(&args.tool, &args.arguments)
        .with_context(|| format!("failed to call tool '{}'", args.tool))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
