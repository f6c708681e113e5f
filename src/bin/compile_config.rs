use anyhow::{Context, anyhow};
use pipeline_config_compiler::{PipelineConfig, Schema};
use std::fs::read_to_string;
use std::io::{self, Read};

/// Read a pipeline configuration document from stdin, compile its `processing` section
/// against the data-structure (schema) document given as the first argument, and print
/// the result as JSON.
///
/// Usage: `compile-config <data_structure.json> < config.json`
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let schema_path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("Usage: compile-config <data_structure.json> < config.json"))?;
    let schema_json = read_to_string(&schema_path)
        .with_context(|| format!("Unable to read file: {schema_path}"))?;
    let schema = Schema::from_json_str(&schema_json)?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read from stdin")?;

    let config = PipelineConfig::from_json_str(&input)?;
    let compiled = config.compile(&schema)?;

    println!("{}", serde_json::to_string_pretty(&compiled)?);
    Ok(())
}
