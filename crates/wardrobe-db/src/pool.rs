//! # Snapshot Store Connection
//!
//! Opens the SQLite file the wardrobe snapshot lives in.
//!
//! ```text
//! HostConfig.db_path
//!       │
//!       ▼
//! DbConfig::new(path)              one user, one writer
//!       │
//!       ▼
//! Database::new(config).await      open file (WAL) + migrate kv_store
//!       │
//!       ▼
//! db.snapshots().load() / .save(&wardrobe)
//! ```
//!
//! The pool holds a single connection. Saves are whole-snapshot
//! transactions issued one at a time, and an in-memory database only exists
//! inside the connection that created it.
//!
//! ## WAL Mode
//! A crash mid-save leaves the previous snapshot intact.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::snapshot::SnapshotRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the snapshot store lives and how it is opened.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/wardrobe.db").busy_timeout(Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// How long a save waits on a lock held by another process
    /// (the seed tool, say) before failing.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for the file at `path`, created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// A throwaway in-memory store (tests).
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_PATH)
    }

    /// Sets the lock wait.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the snapshot store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the store.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL journal (file stores only), NORMAL synchronous
    /// 3. Opens the single connection
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening snapshot store"
        );

        // mode=rwc creates the file if it does not exist
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let mut connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            // may lose the last save on power loss, never corrupts
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(config.busy_timeout)
            .create_if_missing(true);
        if !config.is_in_memory() {
            connect_options = connect_options.journal_mode(SqliteJournalMode::Wal);
        }

        debug!(in_memory = config.is_in_memory(), "Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            // never recycle: that would drop an in-memory store
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// The underlying pool, for migration status.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the snapshot repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let stored = db.snapshots().load().await?;
    /// ```
    pub fn snapshots(&self) -> SnapshotRepository {
        SnapshotRepository::new(self.pool.clone())
    }

    /// Closes the store. Later loads and saves fail.
    pub async fn close(&self) {
        info!("Closing snapshot store");
        self.pool.close().await;
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wardrobe_core::Wardrobe;

    #[tokio::test]
    async fn test_in_memory_store_keeps_its_data() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (wardrobe, _) = Wardrobe::default().add_category("Socks", "🧦", 4, chrono::Utc::now());

        db.snapshots().save(&wardrobe).await.unwrap();
        // a second handle shares the one connection
        let stored = db.clone().snapshots().load().await.unwrap();
        assert_eq!(stored.into_wardrobe(), wardrobe);
    }

    #[tokio::test]
    async fn test_closed_store_rejects_saves() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(db.is_closed());
        assert!(db.snapshots().save(&Wardrobe::default()).await.is_err());
        assert!(db.snapshots().load().await.is_err());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wardrobe.db");
        let (wardrobe, _) = Wardrobe::default().add_category("Shirts", "👔", 6, chrono::Utc::now());

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.snapshots().save(&wardrobe).await.unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(reopened.snapshots().load().await.unwrap().into_wardrobe(), wardrobe);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .busy_timeout(Duration::from_millis(250))
            .run_migrations(false);

        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
