//! Ping command - handshake with the server and check it answers `ping`.

use anyhow::{Context as _, Result};
use clap::Args;
use console::Style;

use super::Context;

/// Arguments for the ping command.
#[derive(Args, Debug)]
pub struct PingArgs {}

/// Run the ping command.
pub fn run(_args: PingArgs, ctx: &Context) -> Result<()> {
    let mut client = ctx.connect()?;
    client.ping().context("ping failed")?;

    let green = Style::new().green();
    let dim = Style::new().dim();
    println!(
        "{} {}",
        green.apply_to("Ping OK"),
        dim.apply_to(&ctx.config.host)
    );

    Ok(())
}
