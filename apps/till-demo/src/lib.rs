//! # Till Demo Library
//!
//! Drives one checkout through `till-core` and prints the receipt.
//!
//! ## Module Organization
//! ```text
//! till_demo/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── TOML file + TILL_* env overrides
//! ├── scenario.rs     ◄─── scripted checkout
//! └── error.rs        ◄─── DemoError
//! ```

pub mod config;
pub mod error;
pub mod scenario;

use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::DemoResult;

/// Runs the demo.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                          Demo Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: info, till=debug; override with RUST_LOG                 │
/// │                                                                         │
/// │  2. Load Config ──────────────────────────────────────────────────────► │
/// │     • first CLI argument, else the platform config dir                  │
/// │     • falls back to defaults on any error                               │
/// │                                                                         │
/// │  3. Checkout ─────────────────────────────────────────────────────────► │
/// │     • catalog, cart, order, receipt on stdout                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> DemoResult<()> {
    init_tracing();

    info!("Starting Till demo");

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::load_or_default(config_path);
    info!(store = %config.store_name, prefix = %config.order_prefix, "Config loaded");

    let receipt = scenario::run_checkout(&config)?;
    println!("{}", receipt);

    info!(order_id = %receipt.order_id, total = %receipt.summary.total, "Checkout complete");
    Ok(())
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show all debug logs
/// - `RUST_LOG=till_core=trace` - Trace-level for the checkout core only
/// - Default: `info,till=debug`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,till=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
