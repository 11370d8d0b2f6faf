// src/main.rs — persona-dispatch entry point

use clap::Parser;

use persona_dispatch::cli::{self, Cli};
use persona_dispatch::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::run(cli).await
}
