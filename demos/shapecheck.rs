// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Context, Result};
use clap::Parser;
use shapecheck::{Matcher, Sink, TracingSink, ValidationLimits, Validator, Value};
use tracing_subscriber::EnvFilter;

fn read_matcher(file: &str) -> Result<Matcher> {
    let contents =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {file}"))?;

    let matcher = if file.ends_with(".json") {
        Matcher::from_json_str(&contents)?
    } else if file.ends_with(".yaml") || file.ends_with(".yml") {
        Matcher::from_yaml_str(&contents)?
    } else {
        bail!("Unsupported schema file `{file}`. Must be json or yaml.")
    };
    Ok(matcher)
}

fn read_value(file: &str) -> Result<Value> {
    if file.ends_with(".json") {
        Value::from_json_file(file)
    } else if file.ends_with(".yaml") || file.ends_with(".yml") {
        Value::from_yaml_file(file)
    } else {
        bail!("Unsupported value file `{file}`. Must be json or yaml.")
    }
}

/// Check a json or yaml document against a matcher schema.
#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Matcher schema file. json or yaml.
    #[arg(long, short, value_name = "schema.json|schema.yaml")]
    schema: String,

    /// Document to check. json or yaml.
    #[arg(long, short, value_name = "value.json|value.yaml")]
    value: String,

    /// Name of the document in diagnostics.
    #[arg(long, short, default_value = "value")]
    label: String,

    /// Maximum number of nested matcher levels.
    #[arg(long)]
    max_depth: Option<usize>,

    /// Emit diagnostics as tracing events instead of printing them.
    #[arg(long, short)]
    trace: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("shapecheck=trace")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let matcher = read_matcher(&cli.schema)?;
    let value = read_value(&cli.value)?;

    let validator = match cli.max_depth {
        Some(max_depth) => Validator::with_limits(ValidationLimits { max_depth }),
        None => Validator::new(),
    };

    let mut lines: Vec<String> = vec![];
    let mut tracing_sink = TracingSink;
    let sink: &mut dyn Sink = if cli.trace {
        &mut tracing_sink
    } else {
        &mut lines
    };

    if validator.validate(&value, &matcher, Some(&cli.label), Some(sink)) {
        println!("{} conforms to {}", cli.value, cli.schema);
        return Ok(());
    }

    for line in &lines {
        println!("{line}");
    }
    bail!("{} does not conform to {}", cli.value, cli.schema)
}
