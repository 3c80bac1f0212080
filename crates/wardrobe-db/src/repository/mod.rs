//! # Repository Module
//!
//! Storage repositories for Wardrobe Flow.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WardrobeSession (host)                                                │
//! │       │                                                                 │
//! │       │  db.snapshots().load() / .save(&wardrobe)                      │
//! │       ▼                                                                 │
//! │  SnapshotRepository                                                    │
//! │  ├── load(&self)            four slices, decoded independently        │
//! │  ├── save(&self, wardrobe)  four upserts, one transaction             │
//! │  └── clear(&self)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kv_store table                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SnapshotRepository`](snapshot::SnapshotRepository) - Wardrobe snapshot slices

pub mod snapshot;
