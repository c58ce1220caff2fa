//! Bookshelf catalog server.

mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bookshelf_catalog::CatalogService;
use bookshelf_catalog::api::rest::routes;
use bookshelf_catalog::domain::repo::{InMemoryBooksRepository, InMemoryCategoriesRepository};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Bookshelf - catalog REST API with response shaping and hypermedia
#[derive(Parser)]
#[command(name = "bookshelf-server")]
#[command(about = "Bookshelf catalog server")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config {
        if !Path::new(path).is_file() {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
    }

    // Layered config: defaults -> YAML (if provided) -> env (BOOKSHELF__*)
    // -> CLI overrides.
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.verbose);

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if matches!(cli.command, Some(Commands::Check)) {
        println!("configuration OK");
        return Ok(());
    }

    init_logging(&config.logging.level);

    let service = Arc::new(CatalogService::new(
        Arc::new(InMemoryBooksRepository::new()),
        Arc::new(InMemoryCategoriesRepository::new()),
        config.catalog.clone(),
    ));
    if config.catalog.seed_demo_data {
        service
            .seed_demo_data()
            .await
            .context("seeding demo catalog")?;
        tracing::info!("seeded demo catalog");
    }

    let app = routes::router(service).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "bookshelf server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install ctrl-c handler");
    }
}
