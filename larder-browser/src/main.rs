//! larder - recipe browser service
//!
//! Serves the recipe browser JSON API on localhost. The local store lives in
//! `larder.db` under the resolved root folder.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

use larder_browser::services::{LocalStore, MealDbClient, RecipeBrowser};
use larder_browser::{build_router, AppState};
use larder_common::config::{load_toml_config, RootFolderInitializer, RootFolderResolver};
use larder_common::db::init_database;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "larder", version, about = "Recipe browser service")]
struct Args {
    /// Folder holding the local store database
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// HTTP port (overrides the config file)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Remote recipe API base URL (overrides the config file)
    #[arg(long, env = "LARDER_API_BASE_URL")]
    api_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise the configured level replaces "info" once the
    // config is loaded
    let rust_log_set = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    let initial_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, reload_handle) = reload::Layer::new(initial_filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    info!("Starting Larder recipe browser v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_toml_config(args.config.as_deref());

    if !rust_log_set {
        match EnvFilter::try_new(&config.logging.level) {
            Ok(level) => {
                if let Err(e) = reload_handle.reload(level) {
                    warn!("Failed to apply log level {}: {}", config.logging.level, e);
                }
            }
            Err(e) => warn!("Invalid log level {}: {}", config.logging.level, e),
        }
    }

    if let Some(base_url) = args.api_base_url {
        config.remote.base_url = base_url;
    }
    let port = args.port.unwrap_or(config.port);

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder)
        .with_toml(&config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    if initializer.database_exists() {
        info!("Opening local store: {}", db_path.display());
    } else {
        info!("Creating new local store: {}", db_path.display());
    }

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Local store ready");
            pool
        }
        Err(e) => {
            error!("Failed to open local store: {}", e);
            return Err(e.into());
        }
    };

    let client = MealDbClient::new(&config.remote).context("Failed to build HTTP client")?;
    info!("Remote recipe API: {}", client.base_url());

    let browser = RecipeBrowser::new(Arc::new(client), LocalStore::new(pool));
    let app = build_router(AppState::new(browser));

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("larder listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
