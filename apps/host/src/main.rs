//! # Wardrobe Dashboard
//!
//! Opens the local wardrobe and prints the dashboard as JSON.
//!
//! ## Usage
//! ```bash
//! cargo run -p wardrobe-host --bin wardrobe
//!
//! # Against the seeded development database, two weeks ahead
//! WARDROBE_DB_PATH=./wardrobe_dev.db WARDROBE_BURN_DOWN_DAYS=14 \
//!     cargo run -p wardrobe-host --bin wardrobe
//! ```
//!
//! Logs go to stderr, the dashboard to stdout.

use tracing::info;

use wardrobe_db::{Database, DbConfig};
use wardrobe_host::{init_tracing, HostConfig, WardrobeSession};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = HostConfig::from_env()?;
    init_tracing(&config.log_filter);

    info!(db_path = %config.db_path.display(), "Starting Wardrobe Flow");

    let db = Database::new(DbConfig::new(config.db_path.clone())).await?;
    info!("Database connected and migrations applied");

    let session = WardrobeSession::open(db).await;
    let dashboard = session.dashboard(config.burn_down_days).await;

    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    session.store().close().await;
    Ok(())
}
