//! List command - list a server's tools, prompts or resources.
//!
//! With `--output call`, each descriptor is rendered as a ready-to-run
//! `mcpt call` line followed by its annotated input properties.

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use console::Style;
use serde_json::Value;

use mcpt_client::{ArgumentTemplate, FeatureDescriptor, FeatureKind, annotate_properties};

use super::{Context, OutputFormat};

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Which feature to list
    #[arg(value_enum)]
    pub kind: FeatureArg,
}

/// Listable features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeatureArg {
    /// Tools (tools/list)
    Tools,
    /// Prompts (prompts/list)
    Prompts,
    /// Resources (resources/list)
    Resources,
}

impl From<FeatureArg> for FeatureKind {
    fn from(arg: FeatureArg) -> Self {
        match arg {
            FeatureArg::Tools => FeatureKind::Tools,
            FeatureArg::Prompts => FeatureKind::Prompts,
            FeatureArg::Resources => FeatureKind::Resources,
        }
    }
}

/// Run the list command.
pub fn run(args: ListArgs, ctx: &Context) -> Result<()> {
    let kind = FeatureKind::from(args.kind);
    let mut client = ctx.connect()?;
    let features = client
        .list_feature(kind)
        .with_context(|| format!("failed to list {}", kind))?;

    match ctx.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&features)?),
        OutputFormat::Call => print_templates(&features, &ctx.config.host)?,
    }

    Ok(())
}

/// Print each descriptor as a call template plus its property listing.
fn print_templates(features: &[Value], host: &str) -> Result<()> {
    let red = Style::new().red();
    let blue = Style::new().blue();

    for feature in features {
        let descriptor = FeatureDescriptor::from_value(feature)?;
        let template = ArgumentTemplate::from_descriptor(&descriptor)
            .with_context(|| format!("cannot build a call template for '{}'", descriptor.name))?;

        println!(
            "{}",
            template.command_line_with(host, |p| red.apply_to(p).to_string())
        );

        for property in annotate_properties(descriptor.schema()?) {
            if property.required {
                println!(
                    "{} {}",
                    red.apply_to("[REQUIRED]"),
                    blue.apply_to(property.describe())
                );
            } else {
                println!("{:11}{}", "", blue.apply_to(property.describe()));
            }
        }
        println!();
    }

    Ok(())
}
