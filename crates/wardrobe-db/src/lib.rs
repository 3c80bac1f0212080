//! # wardrobe-db: Persistence Layer for Wardrobe Flow
//!
//! Stores the wardrobe snapshot in a local SQLite database with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Wardrobe Flow Data Flow                            │
//! │                                                                         │
//! │  WardrobeSession::open / save                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   wardrobe-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  (snapshot.rs) │   │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ SnapshotRepo   │   │ 001_kv_store │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │        <platform data dir>/wardrobe-flow/wardrobe.db            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Opening the single-connection snapshot store
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Snapshot repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wardrobe_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/wardrobe.db")).await?;
//! let wardrobe = db.snapshots().load().await?.into_wardrobe().repaired();
//! db.snapshots().save(&wardrobe).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::snapshot::{SnapshotRepository, StoredSnapshot};
