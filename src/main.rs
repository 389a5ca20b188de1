mod api;
mod cli;
mod error;
mod ident;
mod join;
mod model;
mod resolve;
mod sample;
mod storage;
mod store;
mod text_summary;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::run(args).await
}
