//! hclci CLI tool.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hclci", version)]
#[command(about = "Convert an HCL pipeline configuration to CircleCI YAML", long_about = None)]
struct Cli {
    /// HCL file to convert. The YAML is written next to it with a `.yaml` extension.
    input: PathBuf,
}

fn main() {
    // Logs go to stderr; stdout carries the error line
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        println!("error running hclci: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => return Err(e.into()),
        // --help and --version
        Err(e) => e.exit(),
    };

    let output = commands::convert::run(&cli.input)?;
    info!(input = %cli.input.display(), output = %output.display(), "Converted configuration");
    Ok(())
}
