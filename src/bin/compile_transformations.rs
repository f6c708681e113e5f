use anyhow::Context;
use pipeline_config_compiler::compile_transformations;
use std::io::{self, Read};

/// Read a JSON array of transformation statements from stdin and print the compiled
/// descriptors as JSON.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read from stdin")?;

    let statements: Vec<String> =
        serde_json::from_str(&input).context("Expected a JSON array of statements")?;
    let compiled = compile_transformations(&statements)?;

    println!("{}", serde_json::to_string_pretty(&compiled)?);
    Ok(())
}
