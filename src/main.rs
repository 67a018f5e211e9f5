//! scout - parallel codebase exploration over ripgrep and wrangler
//!
//! scout provides:
//! - Cloudflare binding overviews (D1, KV, R2, Durable Objects)
//! - Route, store, type, export and auth lookups for SvelteKit projects
//! - Concurrent searches with stable, declared-order output
//! - Text or JSON output

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backends;
mod cli;
mod core;
mod flows;
mod probes;

#[tokio::main]
async fn main() -> Result<()> {
    // Check for unsupported platforms
    #[cfg(windows)]
    {
        eprintln!("Error: Windows is not supported. Please use WSL (not guaranteed to work).");
        std::process::exit(1);
    }

    let cli = cli::Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    cli::run(cli).await
}
