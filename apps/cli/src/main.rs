//! keypeople CLI — UBO watchlist screening tool.
//!
//! Fetches a company's ultimate beneficial owners, screens the
//! individual owners against watchlist datasets, and renders a key
//! people screening report.

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
