//! # Wardrobe Session
//!
//! Owns the live wardrobe and serializes every user action through it.
//!
//! ## Action Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  session.toss("socks-id", 2)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock ──► take snapshot ──► Wardrobe::toss (pure) ──► swap in result    │
//! │                                        │                                │
//! │                       Ignored? ────────┴──────── Applied                │
//! │                          │                          │                   │
//! │                          ▼                          ▼                   │
//! │                   Err(ApiError)          store.save (best-effort)       │
//! │                  nothing is saved         failure → error! only         │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                          Ok(ActionResponse)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is held across the save, so one action's snapshot is stored
//! before the next action is accepted. Queries build a fresh
//! [`AnalyticsEngine`] over the current snapshot on every call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use wardrobe_core::analytics::{
    BurnDownData, CycleAnalysis, FlowBreakdown, Insight, InventoryEfficiency, SpendingSummary, StockoutPrediction,
};
use wardrobe_core::{ActionReport, AnalyticsEngine, Bag, Money, Wardrobe};
use wardrobe_db::StoredSnapshot;

use crate::error::ApiError;
use crate::store::WardrobeStore;

// =============================================================================
// Responses
// =============================================================================

/// What an applied action did, shaped for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub category_id: Option<String>,
    pub batch_id: Option<String>,

    /// Amount asked for, when the action moves items
    pub requested: Option<i64>,

    /// Amount actually moved
    pub applied: i64,

    /// Ready-to-show summary
    pub message: String,
}

impl From<&ActionReport> for ActionResponse {
    fn from(report: &ActionReport) -> Self {
        let mut response = ActionResponse {
            category_id: None,
            batch_id: None,
            requested: None,
            applied: report.applied(),
            message: String::new(),
        };

        match report {
            ActionReport::Moved {
                category_id,
                requested,
                applied,
            } => {
                response.category_id = Some(category_id.clone());
                response.requested = Some(*requested);
                response.message = if applied < requested {
                    format!("Only {} of {} items were available", applied, requested)
                } else {
                    format!("{} item(s) updated", applied)
                };
            }
            ActionReport::Dispatched {
                batch_id,
                requested,
                dispatched,
            } => {
                response.batch_id = Some(batch_id.clone());
                response.requested = Some(*requested);
                response.message = if dispatched < requested {
                    format!("Sent {} of {} items to the wash", dispatched, requested)
                } else {
                    format!("Sent {} item(s) to the wash", dispatched)
                };
            }
            ActionReport::Completed { batch_id, restored } => {
                response.batch_id = Some(batch_id.clone());
                response.message = format!("{} item(s) back in the closet", restored);
            }
            ActionReport::CategoryAdded { category_id } => {
                response.category_id = Some(category_id.clone());
                response.message = "Category added".to_string();
            }
            ActionReport::CategoryRemoved { category_id, unstaged } => {
                response.category_id = Some(category_id.clone());
                response.message = if *unstaged > 0 {
                    format!("Category removed, {} item(s) taken out of the hamper", unstaged)
                } else {
                    "Category removed".to_string()
                };
            }
            ActionReport::HibernationChanged { category_id, hibernated } => {
                response.category_id = Some(category_id.clone());
                response.message = if *hibernated {
                    "Stored away for the season".to_string()
                } else {
                    "Back in rotation".to_string()
                };
            }
            ActionReport::Ignored(reason) => {
                response.message = reason.to_string();
            }
        }

        response
    }
}

/// Everything the home screen shows, computed at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub flow_score: u32,
    pub flow_breakdown: FlowBreakdown,
    pub insights: Vec<Insight>,
    pub stockout_predictions: Vec<StockoutPrediction>,
    pub efficiency: InventoryEfficiency,
    pub laundry_cycles: CycleAnalysis,
    pub burn_down: BurnDownData,
    pub spending: SpendingSummary,
    pub items_in_hamper: i64,
    pub items_in_laundry: i64,
}

// =============================================================================
// Repair bookkeeping
// =============================================================================

/// What load-time repair changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RepairSummary {
    /// Categories whose counts, thresholds or history were fixed
    pub adjusted: usize,
    /// Categories pruned away
    pub dropped: usize,
    /// Items taken out of the bag
    pub unstaged: i64,
}

impl RepairSummary {
    pub(crate) fn between(before: &Wardrobe, after: &Wardrobe) -> Self {
        let adjusted = after
            .categories
            .iter()
            .filter(|fixed| {
                before
                    .categories
                    .iter()
                    .find(|original| original.id == fixed.id)
                    .is_some_and(|original| original != *fixed)
            })
            .count();

        RepairSummary {
            adjusted,
            dropped: before.categories.len().saturating_sub(after.categories.len()),
            unstaged: before.bag.total() - after.bag.total(),
        }
    }

    pub(crate) fn is_clean(&self) -> bool {
        *self == RepairSummary::default()
    }
}

// =============================================================================
// Session
// =============================================================================

/// The live wardrobe plus the store it persists to.
pub struct WardrobeSession<S> {
    store: S,
    wardrobe: Mutex<Wardrobe>,
    clock: fn() -> DateTime<Utc>,
}

impl<S: WardrobeStore> WardrobeSession<S> {
    /// Loads, repairs and takes ownership of the stored wardrobe.
    ///
    /// Never fails: an unreadable store starts an empty wardrobe, and the
    /// next successful save overwrites it.
    pub async fn open(store: S) -> Self {
        let stored = match store.load().await {
            Ok(stored) => stored,
            Err(e) => {
                error!(error = %e, "Could not load the wardrobe, starting empty");
                StoredSnapshot::default()
            }
        };

        if !stored.corrupt_slices.is_empty() {
            warn!(slices = ?stored.corrupt_slices, "Unreadable slices were reset to empty");
        }
        let first_run = stored.is_first_run();

        let loaded = stored.into_wardrobe();
        let wardrobe = loaded.clone().repaired();

        let repair = RepairSummary::between(&loaded, &wardrobe);
        if !repair.is_clean() {
            warn!(
                adjusted = repair.adjusted,
                dropped = repair.dropped,
                unstaged = repair.unstaged,
                "Stored wardrobe was inconsistent and has been repaired"
            );
        }

        info!(
            first_run,
            categories = wardrobe.categories.len(),
            in_progress = wardrobe.in_progress_batches().count(),
            "Wardrobe session opened"
        );

        WardrobeSession {
            store,
            wardrobe: Mutex::new(wardrobe),
            clock: Utc::now,
        }
    }

    /// Replaces the wall clock used to stamp actions and queries.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Runs one pure action against the current snapshot.
    async fn apply<F>(&self, action: &'static str, f: F) -> Result<ActionResponse, ApiError>
    where
        F: FnOnce(Wardrobe) -> (Wardrobe, ActionReport),
    {
        let mut current = self.wardrobe.lock().await;
        let (next, report) = f(std::mem::take(&mut *current));
        *current = next;

        if let ActionReport::Ignored(reason) = report {
            debug!(action, reason = %reason, "Action ignored");
            return Err(reason.into());
        }

        debug!(action, applied = report.applied(), "Action applied");
        self.persist(&current).await;
        Ok(ActionResponse::from(&report))
    }

    async fn persist(&self, wardrobe: &Wardrobe) {
        if let Err(e) = self.store.save(wardrobe).await {
            error!(error = %e, "Saving the wardrobe failed, changes are kept in memory");
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Wears `count` items of a category.
    pub async fn toss(&self, category_id: &str, count: i64) -> Result<ActionResponse, ApiError> {
        let now = self.now();
        self.apply("toss", |w| w.toss(category_id, count, now)).await
    }

    /// Buys `count` items; `price` is the total paid.
    pub async fn acquire(
        &self,
        category_id: &str,
        count: i64,
        price: Option<Money>,
    ) -> Result<ActionResponse, ApiError> {
        let now = self.now();
        self.apply("acquire", |w| w.acquire(category_id, count, price, now)).await
    }

    pub async fn retire(
        &self,
        category_id: &str,
        count: i64,
        reason: Option<String>,
    ) -> Result<ActionResponse, ApiError> {
        let now = self.now();
        self.apply("retire", |w| w.retire(category_id, count, reason, now)).await
    }

    /// Stages items in the hamper without logging wear.
    pub async fn add_to_bag(&self, category_name: &str, count: i64) -> Result<ActionResponse, ApiError> {
        self.apply("add_to_bag", |w| w.add_to_bag(category_name, count)).await
    }

    /// Sends the given contents to the wash.
    pub async fn dispatch_laundry(&self, bag: Bag) -> Result<ActionResponse, ApiError> {
        let now = self.now();
        self.apply("dispatch_laundry", |w| w.dispatch_laundry(bag, now)).await
    }

    /// Sends whatever is in the hamper to the wash.
    pub async fn dispatch_bag(&self) -> Result<ActionResponse, ApiError> {
        let now = self.now();
        self.apply("dispatch_bag", |w| w.dispatch_bag(now)).await
    }

    pub async fn complete_batch(&self, batch_id: &str) -> Result<ActionResponse, ApiError> {
        let now = self.now();
        self.apply("complete_batch", |w| w.complete_batch(batch_id, now)).await
    }

    pub async fn add_category(
        &self,
        name: &str,
        emoji: &str,
        initial_count: i64,
    ) -> Result<ActionResponse, ApiError> {
        let now = self.now();
        self.apply("add_category", |w| w.add_category(name, emoji, initial_count, now))
            .await
    }

    pub async fn remove_category(&self, category_id: &str) -> Result<ActionResponse, ApiError> {
        self.apply("remove_category", |w| w.remove_category(category_id)).await
    }

    pub async fn update_category_hibernation(
        &self,
        category_id: &str,
        hibernated: bool,
    ) -> Result<ActionResponse, ApiError> {
        self.apply("update_category_hibernation", |w| {
            w.update_category_hibernation(category_id, hibernated)
        })
        .await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    async fn query<R>(&self, f: impl FnOnce(AnalyticsEngine<'_>) -> R) -> R {
        let wardrobe = self.wardrobe.lock().await;
        f(AnalyticsEngine::from_wardrobe(&wardrobe).as_of(self.now()))
    }

    /// A copy of the current snapshot.
    pub async fn snapshot(&self) -> Wardrobe {
        self.wardrobe.lock().await.clone()
    }

    pub async fn flow_score(&self) -> u32 {
        self.query(|engine| engine.calculate_flow_score()).await
    }

    pub async fn flow_breakdown(&self) -> FlowBreakdown {
        self.query(|engine| engine.flow_breakdown()).await
    }

    pub async fn insights(&self) -> Vec<Insight> {
        self.query(|engine| engine.generate_insights()).await
    }

    pub async fn predict_stockout(&self, category_id: &str) -> Option<StockoutPrediction> {
        self.query(|engine| engine.predict_stockout(category_id)).await
    }

    pub async fn stockout_predictions(&self) -> Vec<StockoutPrediction> {
        self.query(|engine| engine.get_all_stockout_predictions()).await
    }

    pub async fn inventory_efficiency(&self) -> InventoryEfficiency {
        self.query(|engine| engine.calculate_inventory_efficiency()).await
    }

    pub async fn laundry_cycles(&self) -> CycleAnalysis {
        self.query(|engine| engine.analyze_laundry_cycles()).await
    }

    pub async fn burn_down(&self, days_ahead: u32) -> BurnDownData {
        self.query(|engine| engine.generate_burn_down_data(days_ahead)).await
    }

    pub async fn spending_summary(&self) -> SpendingSummary {
        self.query(|engine| engine.spending_summary()).await
    }

    /// Every dashboard query against one snapshot and one `now`.
    pub async fn dashboard(&self, burn_down_days: u32) -> Dashboard {
        let wardrobe = self.wardrobe.lock().await;
        let engine = AnalyticsEngine::from_wardrobe(&wardrobe).as_of(self.now());

        Dashboard {
            generated_at: engine.now(),
            flow_score: engine.calculate_flow_score(),
            flow_breakdown: engine.flow_breakdown(),
            insights: engine.generate_insights(),
            stockout_predictions: engine.get_all_stockout_predictions(),
            efficiency: engine.calculate_inventory_efficiency(),
            laundry_cycles: engine.analyze_laundry_cycles(),
            burn_down: engine.generate_burn_down_data(burn_down_days),
            spending: engine.spending_summary(),
            items_in_hamper: wardrobe.bag.total(),
            items_in_laundry: engine.in_progress_items(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
