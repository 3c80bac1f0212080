//! # Actions
//!
//! The action dispatch surface: one pure method per user action, each
//! consuming a [`Wardrobe`] and returning the next one together with an
//! [`ActionReport`].
//!
//! ## Why Whole-Snapshot Actions?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  One user action touches several collections at once:                  │
//! │                                                                         │
//! │  dispatch_laundry                                                      │
//! │    ├── categories : clean → in laundry      (transition::dispatch)     │
//! │    ├── batches    : + new in-progress batch (post-clamp contents)      │
//! │    └── bag        : dispatched items unstaged                          │
//! │                                                                         │
//! │  All three change in ONE return value, so no caller can observe a      │
//! │  batch without its category changes (or the other way round).          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Post-Condition of Every Mutating Action
//! 1. categories retired down to zero items are pruned
//! 2. the bag is pruned of stale names and clamped to clean stock
//!
//! ## Ignored Actions
//! Invalid input never fails: the wardrobe comes back unchanged and the
//! report carries the reason as [`ActionReport::Ignored`].

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::money::Money;
use crate::transition;
use crate::types::{
    find_category, find_category_by_name, saturating_sum, Bag, Batch, BatchStatus, Category, InventoryRecord,
    Wardrobe,
};
use crate::validation::{
    normalize_emoji, validate_category_name, validate_count, validate_initial_count, validate_owned_after_purchase,
    validate_price, validate_unique_name,
};

/// What an action actually did.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionReport {
    /// Items were tossed, staged, acquired or retired.
    ///
    /// `applied` may be lower than `requested` when stock ran out; the host
    /// uses both to phrase "only 2 of 5 fit in the hamper".
    Moved {
        category_id: String,
        requested: i64,
        applied: i64,
    },

    /// A laundry batch was created from the post-clamp quantities.
    Dispatched {
        batch_id: String,
        requested: i64,
        dispatched: i64,
    },

    /// A batch came back; `restored` items returned to clean stock.
    Completed { batch_id: String, restored: i64 },

    CategoryAdded { category_id: String },

    /// A category was removed; `unstaged` items left the bag with it.
    CategoryRemoved { category_id: String, unstaged: i64 },

    HibernationChanged { category_id: String, hibernated: bool },

    /// Nothing changed.
    Ignored(CoreError),
}

impl ActionReport {
    /// Whether the action left the wardrobe untouched.
    pub fn is_ignored(&self) -> bool {
        matches!(self, ActionReport::Ignored(_))
    }

    /// Items affected by the action (0 for structural actions).
    pub fn applied(&self) -> i64 {
        match self {
            ActionReport::Moved { applied, .. } => *applied,
            ActionReport::Dispatched { dispatched, .. } => *dispatched,
            ActionReport::Completed { restored, .. } => *restored,
            _ => 0,
        }
    }
}

impl Wardrobe {
    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn ignored(self, err: impl Into<CoreError>) -> (Self, ActionReport) {
        (self, ActionReport::Ignored(err.into()))
    }

    /// Applies the uniform post-condition of every mutating action.
    fn settle(mut self) -> Self {
        self.categories = transition::prune_exhausted(&self.categories);
        let (bag, _) = transition::prune_bag(&self.bag, &self.categories);
        self.bag = bag;
        self
    }

    /// Clean items of `category` not already sitting in the bag.
    fn unstaged_clean(&self, category: &Category) -> i64 {
        category.clean_count.saturating_sub(self.bag.get(&category.name).max(0)).max(0)
    }

    /// Shared path of `toss` and `add_to_bag`: stage up to `count` items.
    fn stage(mut self, category: Category, count: i64, wear_at: Option<DateTime<Utc>>) -> (Self, ActionReport) {
        if let Err(e) = validate_count(count) {
            return self.ignored(e);
        }
        if category.hibernated {
            return self.ignored(CoreError::Hibernated(category.name));
        }

        let available = self.unstaged_clean(&category);
        if available == 0 {
            return self.ignored(CoreError::NothingAvailable {
                category: category.name,
                requested: count,
            });
        }

        let mut applied = count.min(available);
        if let Some(at) = wear_at {
            let (categories, recorded) = transition::toss(&self.categories, &category.id, applied, at);
            self.categories = categories;
            applied = recorded;
        }
        self.bag.stage(&category.name, applied);

        let report = ActionReport::Moved {
            category_id: category.id,
            requested: count,
            applied,
        };
        (self.settle(), report)
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    /// Wears `count` items: logs the wear and drops them in the hamper.
    ///
    /// Clamped to clean items not already staged.
    pub fn toss(self, category_id: &str, count: i64, now: DateTime<Utc>) -> (Self, ActionReport) {
        let Some(category) = find_category(&self.categories, category_id).cloned() else {
            return self.ignored(CoreError::CategoryNotFound(category_id.to_string()));
        };
        self.stage(category, count, Some(now))
    }

    /// Stages `count` items of a category (by name) without logging wear.
    pub fn add_to_bag(self, category_name: &str, count: i64) -> (Self, ActionReport) {
        let Some(category) = find_category_by_name(&self.categories, category_name).cloned() else {
            return self.ignored(CoreError::CategoryNotFound(category_name.to_string()));
        };
        self.stage(category, count, None)
    }

    /// Sends `bag` to the laundry as one new batch.
    ///
    /// The batch records what actually left clean stock, never the raw
    /// requested amounts. Dispatched items are removed from the staged bag.
    pub fn dispatch_laundry(mut self, bag: Bag, now: DateTime<Utc>) -> (Self, ActionReport) {
        let requested = bag.total();
        let (categories, dispatched) = transition::dispatch(&self.categories, &bag);
        let Some(batch) = Batch::from_contents(dispatched, now) else {
            return self.ignored(CoreError::EmptyDispatch);
        };

        self.categories = categories;
        for (name, count) in &batch.contents {
            self.bag.unstage(name, *count);
        }

        let report = ActionReport::Dispatched {
            batch_id: batch.id.clone(),
            requested,
            dispatched: batch.total_items,
        };
        self.batches.push(batch);
        (self.settle(), report)
    }

    /// Dispatches whatever is currently staged.
    pub fn dispatch_bag(self, now: DateTime<Utc>) -> (Self, ActionReport) {
        let bag = self.bag.clone();
        self.dispatch_laundry(bag, now)
    }

    /// Marks a batch completed and returns its items to clean stock.
    pub fn complete_batch(mut self, batch_id: &str, now: DateTime<Utc>) -> (Self, ActionReport) {
        let Some(index) = self.batches.iter().position(|b| b.id == batch_id) else {
            return self.ignored(CoreError::BatchNotFound(batch_id.to_string()));
        };
        if !self.batches[index].is_in_progress() {
            return self.ignored(CoreError::BatchAlreadyCompleted(batch_id.to_string()));
        }

        let completed = transition::complete(&self.categories, &self.batches[index].contents);
        let restored = saturating_sum(
            self.categories
                .iter()
                .zip(&completed)
                .map(|(before, after)| after.clean_count.saturating_sub(before.clean_count)),
        );
        self.categories = completed;

        let batch = &mut self.batches[index];
        batch.status = BatchStatus::Completed;
        batch.completed_at = Some(now);
        if let Some(entry) = batch.to_history_entry() {
            self.laundry_history.push(entry);
        }

        let report = ActionReport::Completed {
            batch_id: batch_id.to_string(),
            restored,
        };
        (self.settle(), report)
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Buys `count` new items; `price` is the total paid.
    pub fn acquire(
        mut self,
        category_id: &str,
        count: i64,
        price: Option<Money>,
        now: DateTime<Utc>,
    ) -> (Self, ActionReport) {
        if let Err(e) = validate_count(count).and_then(|_| validate_price(price)) {
            return self.ignored(e);
        }
        let Some(owned) = find_category(&self.categories, category_id).map(|c| c.total_owned) else {
            return self.ignored(CoreError::CategoryNotFound(category_id.to_string()));
        };
        if let Err(e) = validate_owned_after_purchase(owned, count) {
            return self.ignored(e);
        }

        self.categories = transition::acquire(&self.categories, category_id, count, price, now);
        let report = ActionReport::Moved {
            category_id: category_id.to_string(),
            requested: count,
            applied: count,
        };
        (self.settle(), report)
    }

    /// Retires up to `count` items (clean first, then dirty, then in laundry).
    ///
    /// A category retired down to zero items is pruned, together with its
    /// bag entry.
    pub fn retire(
        mut self,
        category_id: &str,
        count: i64,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> (Self, ActionReport) {
        if let Err(e) = validate_count(count) {
            return self.ignored(e);
        }
        let Some(category) = find_category(&self.categories, category_id).cloned() else {
            return self.ignored(CoreError::CategoryNotFound(category_id.to_string()));
        };

        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
        let (categories, retired) = transition::retire(&self.categories, category_id, count, reason, now);
        if retired == 0 {
            return self.ignored(CoreError::NothingAvailable {
                category: category.name,
                requested: count,
            });
        }

        self.categories = categories;
        let report = ActionReport::Moved {
            category_id: category_id.to_string(),
            requested: count,
            applied: retired,
        };
        (self.settle(), report)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Registers a new category with `initial_count` clean items.
    ///
    /// Initial stock is logged as an unpriced purchase at `now`, which also
    /// dates the stock for dead-stock detection.
    pub fn add_category(
        mut self,
        name: &str,
        emoji: &str,
        initial_count: i64,
        now: DateTime<Utc>,
    ) -> (Self, ActionReport) {
        let name = match validate_category_name(name) {
            Ok(name) => name,
            Err(e) => return self.ignored(e),
        };
        if let Err(e) = validate_unique_name(&self.categories, &name)
            .and_then(|_| validate_initial_count(initial_count))
        {
            return self.ignored(e);
        }

        let (mut categories, category_id) =
            transition::add_category(&self.categories, &name, &normalize_emoji(emoji), initial_count);
        if initial_count > 0 {
            if let Some(created) = categories.iter_mut().find(|c| c.id == category_id) {
                created.purchase_history.push(InventoryRecord {
                    date: now,
                    count: initial_count,
                    price: None,
                    reason: None,
                });
            }
        }

        self.categories = categories;
        (self.settle(), ActionReport::CategoryAdded { category_id })
    }

    /// Deletes a category and its staged bag entry.
    pub fn remove_category(mut self, category_id: &str) -> (Self, ActionReport) {
        if find_category(&self.categories, category_id).is_none() {
            return self.ignored(CoreError::CategoryNotFound(category_id.to_string()));
        }

        let staged_before = self.bag.total();
        let (categories, bag) = transition::remove_category(&self.categories, &self.bag, category_id);
        self.categories = categories;
        self.bag = bag;

        let report = ActionReport::CategoryRemoved {
            category_id: category_id.to_string(),
            unstaged: staged_before.saturating_sub(self.bag.total()),
        };
        (self.settle(), report)
    }

    /// Moves a category in or out of hibernation.
    pub fn update_category_hibernation(mut self, category_id: &str, hibernated: bool) -> (Self, ActionReport) {
        if find_category(&self.categories, category_id).is_none() {
            return self.ignored(CoreError::CategoryNotFound(category_id.to_string()));
        }

        self.categories = transition::set_hibernation(&self.categories, category_id, hibernated);
        let report = ActionReport::HibernationChanged {
            category_id: category_id.to_string(),
            hibernated,
        };
        (self.settle(), report)
    }

    // =========================================================================
    // Load-time repair
    // =========================================================================

    /// Normalizes a freshly loaded snapshot: consistency fix, then the
    /// usual pruning. Idempotent.
    pub fn repaired(mut self) -> Self {
        self.categories = transition::validate_and_fix_consistency(&self.categories);
        self.settle()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
