// services/stub-backend/src/main.rs
//
// Local stand-in for the outage analysis service. Serves the dashboard's
// HTTP contract from JSON files; analysis, comparison and scraping promote
// canned fixtures instead of doing any work.
//
// Run with: cargo run --bin stub-backend -- --data-dir ./data

mod api;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use store::FileStore;

#[derive(Parser, Debug)]
#[command(name = "stub-backend")]
#[command(about = "File-backed local stand-in for the outage analysis service")]
struct Args {
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Directory holding `reports/` and `scraped-data/`
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Canned analysis, comparison and scrape documents
    #[arg(short, long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))]
    fixtures_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stub_backend=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!(
        data_dir = %args.data_dir.display(),
        fixtures_dir = %args.fixtures_dir.display(),
        "Starting stub analysis service on port {}",
        args.port
    );

    let store = FileStore::open(&args.data_dir, &args.fixtures_dir)
        .await
        .with_context(|| format!("Failed to open data directory {}", args.data_dir.display()))?;

    api::start_server(Arc::new(store), args.port).await?;

    Ok(())
}
