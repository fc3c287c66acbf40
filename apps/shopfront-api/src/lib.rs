//! # Shopfront API Library
//!
//! Command surface of the storefront. Every operation a storefront client
//! can perform is a plain function in `commands/`, and the binary feeds
//! them from a JSON-lines stream.
//!
//! ## Module Organization
//! ```text
//! shopfront_api/
//! ├── lib.rs          ◄─── You are here (logging setup & run)
//! ├── config.rs       ◄─── Environment configuration
//! ├── state.rs        ◄─── Shared store handle
//! ├── session.rs      ◄─── Bearer token handling
//! ├── dispatch.rs     ◄─── Request records → commands → envelopes
//! ├── commands/
//! │   ├── mod.rs      ◄─── Shared inputs (paging, success result)
//! │   ├── catalog.rs  ◄─── Search, products, collections, stock
//! │   ├── customer.rs ◄─── Login, registration, account stubs
//! │   ├── order.rs    ◄─── Active order mutations & checkout
//! │   └── settings.rs ◄─── Shipping, payment methods, countries
//! └── error.rs        ◄─── Error codes & response envelope
//! ```
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stdin line ──► dispatch::handle_line                                   │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │               commands::<area>::<op>(&AppState, session, input)         │
//! │                      │                                                  │
//! │                      ▼  one lock per command                            │
//! │               Store (catalog · customers · orders · settings)           │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  stdout line ◄── { success, data } | { success, errorCode, message }    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod session;
pub mod state;

use std::io;

use shopfront_store::{Store, StoreError};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use state::AppState;

/// Runs the storefront over stdin/stdout until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • SHOPFRONT_CURRENCY, SHOPFRONT_ACCOUNT_STUB,                       │
/// │       SHOPFRONT_SEED_DEMO_DATA                                          │
/// │                                                                         │
/// │  3. Open Store ───────────────────────────────────────────────────────► │
/// │     • Demo catalog, settings and customers unless seeding is off       │
/// │                                                                         │
/// │  4. Serve ────────────────────────────────────────────────────────────► │
/// │     • One JSON request per line in, one envelope per line out           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Shopfront API");

    let config = AppConfig::from_env()?;
    info!(
        currency = %config.currency_code,
        account_stub = ?config.account_stub,
        seed = config.seed_demo_data,
        "Configuration loaded"
    );

    let state = open_state(&config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let handled = dispatch::serve(&state, stdin.lock(), stdout.lock())?;

    info!(handled, "Shopfront API stopped");
    Ok(())
}

/// Opens the store described by `config` and wraps it for the commands.
pub fn open_state(config: &AppConfig) -> Result<AppState, StoreError> {
    let store = Store::open(config.to_store_config())?;
    Ok(AppState::new(store))
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries responses only.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shopfront=trace` - Show trace for shopfront crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shopfront=debug"));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

// =============================================================================
// Unit Tests
// =============================================================================
