//! # Wardrobe Host Library
//!
//! The orchestration shell between the mobile UI and the pure core.
//!
//! ## Module Organization
//! ```text
//! wardrobe_host/
//! ├── lib.rs          ◄─── You are here (logging setup & exports)
//! ├── config.rs       ◄─── Environment configuration
//! ├── store.rs        ◄─── Load/save contract (SQLite, in-memory)
//! ├── session.rs      ◄─── Live wardrobe, actions and queries
//! └── error.rs        ◄─── API error type for the UI
//! ```
//!
//! ## Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Core (wardrobe-core)              Host (this crate)                    │
//! │  ────────────────────              ─────────────────                    │
//! │  • What an action does             • When it runs (one at a time)       │
//! │  • Clamping, pruning, repair       • Saving after it (best-effort)      │
//! │  • Every analytics number          • Reading the clock                  │
//! │                                    • Logging, configuration             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use config::{ConfigError, HostConfig};
pub use error::{ApiError, ErrorCode};
pub use session::{ActionResponse, Dashboard, WardrobeSession};
pub use store::{MemoryStore, WardrobeStore};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `WARDROBE_LOG=debug` - Show debug messages
/// - `WARDROBE_LOG=wardrobe=trace` - Show trace for wardrobe crates only
/// - Default: `info,wardrobe=debug,sqlx=warn`
///
/// An unparsable directive falls back to the default.
pub fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
