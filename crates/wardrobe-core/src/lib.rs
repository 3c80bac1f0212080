//! # wardrobe-core: Pure Domain Logic for Wardrobe Flow
//!
//! This crate is the **heart** of Wardrobe Flow. It holds the state
//! transitions and the analytics engine as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Wardrobe Flow Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile UI (TypeScript)                       │   │
//! │  │     Toss ──► Hamper ──► Dispatch ──► Complete ──► Dashboard    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ host bridge                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   wardrobe-host (session)                       │   │
//! │  │        action dispatch surface • query surface • save          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ wardrobe-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌────────────┐ ┌─────────┐ ┌───────────────────┐ │   │
//! │  │  │  types  │ │ transition │ │ actions │ │     analytics     │ │   │
//! │  │  │Category │ │ toss       │ │ Wardrobe│ │ flow • stockout   │ │   │
//! │  │  │ Batch   │ │ dispatch   │ │ ::toss  │ │ efficiency • cycle│ │   │
//! │  │  │ Bag     │ │ complete   │ │ ::retire│ │ burndown • insight│ │   │
//! │  │  └─────────┘ └────────────┘ └─────────┘ └───────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS IN TRANSITIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 wardrobe-db (Persistence Layer)                 │   │
//! │  │              SQLite key-value slices, migrations                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity model (Category, Batch, Bag, Wardrobe)
//! - [`transition`] - Pure per-event category transitions
//! - [`actions`] - Atomic user actions over the whole [`Wardrobe`]
//! - [`analytics`] - Flow Score, forecasts, insights
//! - [`money`] - Integer-cents money type for purchase prices
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same snapshot + same event = same result
//! 2. **Total Transitions**: bad input clamps or no-ops, never panics
//! 3. **Value Semantics**: every call takes a snapshot and returns a new one
//! 4. **Explicit Time**: callers pass `now`, nothing reads the clock implicitly
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use wardrobe_core::{AnalyticsEngine, Wardrobe};
//!
//! let now = Utc::now();
//! let (wardrobe, _) = Wardrobe::default().add_category("Socks", "🧦", 10, now);
//! let socks = wardrobe.categories[0].id.clone();
//! let (wardrobe, _) = wardrobe.toss(&socks, 2, now);
//!
//! let engine = AnalyticsEngine::from_wardrobe(&wardrobe).as_of(now);
//! assert!(engine.calculate_flow_score() <= 100);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod actions;
pub mod analytics;
pub mod error;
pub mod money;
pub mod transition;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use actions::ActionReport;
pub use analytics::AnalyticsEngine;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Percent of owned items that must stay clean to be considered safe.
pub const SAFETY_PERCENT: i64 = 20;

/// Percent of owned items that make up one rotation (laundry load).
pub const BATCH_PERCENT: i64 = 40;

/// Floor for both the safety threshold and the batch size of a stocked category.
pub const MIN_THRESHOLD: i64 = 2;

/// Days without wear after which clean stock counts as dead stock.
pub const DEAD_STOCK_DAYS: i64 = 60;

/// Maximum items a single category may own, and the largest count one
/// event may carry.
///
/// ## Business Reason
/// Guards against typos in the add/acquire forms (1000 instead of 10).
/// Acquisitions that would push a category past it are ignored.
pub const MAX_CATEGORY_ITEMS: i64 = 999;

/// Maximum length of a category display name.
pub const MAX_CATEGORY_NAME_LEN: usize = 40;

/// Emoji used when a category is created without one.
pub const DEFAULT_EMOJI: &str = "👕";
