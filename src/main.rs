// src/main.rs — Vonk entry point

use clap::Parser;
use std::sync::Arc;
use tokio::sync::Mutex;

use vonk::api::{self, ApiState};
use vonk::cli::{status, Cli, Commands};
use vonk::context::seed::{NullSeedSource, SeedSource};
use vonk::context::ContextEngine;
use vonk::infra::config::Config;
use vonk::infra::{logger, paths};
use vonk::persist::PersistManager;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("info");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Some(Commands::Status) => status::show_status().await,
        Some(Commands::Inspect { user_id }) => status::inspect_user(&user_id).await,
        Some(Commands::Serve { port }) => serve(config, port).await,
        None => serve(config, None).await,
    }
}

async fn serve(mut config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port_override {
        config.api.port = port;
    }

    paths::ensure_dirs().await?;

    let seed: Arc<dyn SeedSource> = if config.persistence.enabled {
        let manager = PersistManager::open(&paths::db_path())?;
        Arc::new(manager.into_seed_source())
    } else {
        Arc::new(NullSeedSource)
    };

    let engine = ContextEngine::new(config.engine.clone(), seed)
        .with_profile_mirroring(config.persistence.enabled && config.persistence.mirror_profiles);

    let state = ApiState {
        engine: Arc::new(Mutex::new(engine)),
    };
    api::start_server(&config.api, state).await
}
