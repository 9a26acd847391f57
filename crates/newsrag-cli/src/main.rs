//! newsrag CLI - the demo harness
//!
//! Running the binary with no arguments loads the seed news pages, builds the
//! in-memory index, and answers two example questions.

mod cli;
mod errors;
mod output;
mod run;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Create async runtime
    let runtime = tokio::runtime::Runtime::new()?;

    // Run the pipeline
    runtime.block_on(async { run::execute(cli).await })?;

    Ok(())
}
