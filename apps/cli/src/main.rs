//! coursecatalog CLI: export a department's course listing as CSV.
//!
//! Fetches one year/term (or a range of them), keeps required undergraduate
//! courses, groups sections of the same course, and writes one CSV per term.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
