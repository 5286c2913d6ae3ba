//! Pond engine binary.
//!
//! Wires the simulation engine, the pond store client and the runtime
//! together and runs until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `pond-config.yaml` (or `POND_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the engine, wallet and market bonus board
//! 4. Connect the HTTP pond store when `store.base_url` is set
//! 5. Start the runtime and wait for Ctrl-C
//! 6. Tear the runtime down and log the result

mod error;
mod http_store;
mod observer;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pond_core::{
    BonusBoard, MarketBonus, PondConfig, PondRuntime, PondSimulationEngine, RuntimeSettings,
    SlotGateway,
};
use pond_ledger::{PlayerWallet, Wallet};
use pond_types::PlayerId;

use crate::error::EngineError;
use crate::http_store::HttpPondStore;
use crate::observer::LoggingObserver;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "pond-config.yaml";

/// Application entry point for the pond engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the runtime fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let path = std::env::var("POND_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    let (config, from_file) = load_config(Path::new(&path))?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("pond-engine starting");
    if !from_file {
        warn!(path = %path, "Config file not found, using defaults");
    }
    info!(
        rows = config.pond.rows,
        cols = config.pond.cols,
        day_secs = config.cycle.day_secs,
        night_secs = config.cycle.night_secs,
        tick_interval_ms = config.cycle.tick_interval_ms,
        catalog_items = config.catalog.len(),
        "Configuration loaded"
    );

    // 3. Engine, wallet, bonus board.
    let player_id = config.pond.player_id.unwrap_or_else(PlayerId::new);
    let engine = PondSimulationEngine::new(&config, player_id).map_err(EngineError::from)?;
    let wallet = Arc::new(Mutex::new(PlayerWallet::new()));
    let board = Arc::new(BonusBoard::new());
    info!(player_id = %player_id, "Engine initialized");

    // 4. Pond store.
    let store = HttpPondStore::from_config(&config.store)
        .map_err(EngineError::from)?
        .map(Arc::new);
    match &store {
        Some(store) => info!(base_url = store.base_url(), "Pond store configured"),
        None => info!("No pond store configured, playing locally"),
    }

    // 5. Runtime.
    let gateway = Arc::new(SlotGateway::new(
        Arc::new(Mutex::new(engine)),
        store,
        wallet,
        Arc::clone(&board) as Arc<dyn MarketBonus>,
        player_id,
    ));
    let runtime = PondRuntime::start(
        Arc::clone(&gateway),
        board,
        RuntimeSettings::from_config(&config),
        LoggingObserver::default(),
    );

    tokio::signal::ctrl_c().await.map_err(|e| EngineError::Signal {
        message: e.to_string(),
    })?;
    info!("Shutdown requested");

    // 6. Teardown.
    let summary = runtime.stop().await.map_err(EngineError::from)?;
    let balance = gateway.wallet().lock().await.balance();
    info!(
        total_ticks = summary.total_ticks,
        final_day = summary.final_day,
        balance,
        "pond-engine stopped"
    );
    Ok(())
}

/// Load configuration from `path`, falling back to defaults (with env
/// overrides applied) when the file does not exist.
///
/// Returns the config and whether it came from the file.
fn load_config(path: &Path) -> Result<(PondConfig, bool), EngineError> {
    if path.exists() {
        return Ok((PondConfig::from_file(path)?, true));
    }
    let mut config = PondConfig::default();
    config.apply_env_overrides()?;
    config.validate()?;
    Ok((config, false))
}
