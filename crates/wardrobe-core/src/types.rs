//! # Domain Types
//!
//! The entity model shared by the transitions, the analytics engine and the
//! persistence layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Wardrobe                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │   Category      │   │     Batch       │   │ LaundryHistoryEntry │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  completedAt        │   │
//! │  │  name (join key)│◄──│  contents{name} │──►│  status             │   │
//! │  │  clean/dirty/   │   │  status         │   │  (interval stats)   │   │
//! │  │  inLaundry      │   │  completedAt    │   └─────────────────────┘   │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │          ▲                                                              │
//! │          │ name                                                         │
//! │  ┌───────┴─────────┐                                                    │
//! │  │      Bag        │  staging area (hamper) for the next dispatch      │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Name-Keyed Joins
//! The bag and batch contents reference categories by **name**, not id.
//! Renaming is not supported, so names are stable join keys; whenever the
//! category list changes structurally the bag is pruned of stale names.
//!
//! ## Wire Format
//! Every record serializes with camelCase field names (`totalOwned`,
//! `cleanCount`, `completedAt`, ...) and round-trips through JSON unchanged.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::{BATCH_PERCENT, MIN_THRESHOLD, SAFETY_PERCENT};

// =============================================================================
// History Records
// =============================================================================

/// One toss (wear) event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WearRecord {
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub count: i64,
}

/// One purchase or retirement event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryRecord {
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub count: i64,
    /// Total paid for the purchase, in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// =============================================================================
// Category
// =============================================================================

/// One clothing type the user owns.
///
/// ## Invariants
/// - `total_owned == clean_count + dirty_count + in_laundry_count`
/// - every count is `>= 0`
/// - thresholds follow [`Category::thresholds_for`]
///
/// Persisted data may violate these (manual edits, partial writes); the
/// counts are signed so such data still deserializes and can be repaired by
/// [`validate_and_fix_consistency`](crate::transition::validate_and_fix_consistency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display label, unique per user. Join key for bag and batches.
    pub name: String,

    /// Cosmetic glyph.
    #[serde(default)]
    pub emoji: String,

    #[serde(default)]
    pub total_owned: i64,

    #[serde(default)]
    pub clean_count: i64,

    #[serde(default)]
    pub dirty_count: i64,

    #[serde(default)]
    pub in_laundry_count: i64,

    /// Minimum clean stock considered safe.
    #[serde(default)]
    pub safety_threshold: i64,

    /// Rotation capacity used by the efficiency calculation.
    #[serde(default)]
    pub max_batch_size: i64,

    /// Excluded from scoring and insights while true.
    #[serde(default)]
    pub hibernated: bool,

    #[serde(default)]
    pub wear_history: Vec<WearRecord>,

    #[serde(default)]
    pub purchase_history: Vec<InventoryRecord>,

    #[serde(default)]
    pub retirement_history: Vec<InventoryRecord>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub last_worn_date: Option<DateTime<Utc>>,
}

impl Category {
    /// Creates a fresh category with `initial` clean items.
    pub fn new(name: impl Into<String>, emoji: impl Into<String>, initial: i64) -> Self {
        let owned = initial.max(0);
        let (safety_threshold, max_batch_size) = Self::thresholds_for(owned);
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            emoji: emoji.into(),
            total_owned: owned,
            clean_count: owned,
            dirty_count: 0,
            in_laundry_count: 0,
            safety_threshold,
            max_batch_size,
            hibernated: false,
            wear_history: Vec::new(),
            purchase_history: Vec::new(),
            retirement_history: Vec::new(),
            last_worn_date: None,
        }
    }

    /// Returns `(safety_threshold, max_batch_size)` for an owned count.
    ///
    /// ```rust
    /// use wardrobe_core::Category;
    ///
    /// assert_eq!(Category::thresholds_for(0), (0, 0));
    /// assert_eq!(Category::thresholds_for(4), (2, 2));
    /// assert_eq!(Category::thresholds_for(12), (3, 5));
    /// ```
    pub fn thresholds_for(owned: i64) -> (i64, i64) {
        if owned <= 0 {
            return (0, 0);
        }
        // ceil(owned * pct / 100), widened so corrupt counts cannot overflow
        let ceil_percent = |pct: i64| {
            let scaled = (i128::from(owned) * i128::from(pct) + 99) / 100;
            i64::try_from(scaled).unwrap_or(i64::MAX)
        };
        (
            ceil_percent(SAFETY_PERCENT).max(MIN_THRESHOLD),
            ceil_percent(BATCH_PERCENT).max(MIN_THRESHOLD),
        )
    }

    /// Recomputes both thresholds from `total_owned`.
    pub fn recompute_thresholds(&mut self) {
        let (safety, batch) = Self::thresholds_for(self.total_owned);
        self.safety_threshold = safety;
        self.max_batch_size = batch;
    }

    /// Takes part in scoring: not hibernated and owns something.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.hibernated && self.total_owned > 0
    }

    /// Items out of rotation for washing (dirty + in laundry).
    #[inline]
    pub fn soiled_count(&self) -> i64 {
        self.dirty_count.saturating_add(self.in_laundry_count)
    }

    /// Whether the three state counts partition `total_owned`.
    pub fn is_conserved(&self) -> bool {
        self.clean_count >= 0
            && self.dirty_count >= 0
            && self.in_laundry_count >= 0
            && i128::from(self.clean_count) + i128::from(self.dirty_count) + i128::from(self.in_laundry_count)
                == i128::from(self.total_owned)
    }

    /// Clean share of owned items, in `[0, 1]`.
    pub fn clean_ratio(&self) -> f64 {
        if self.total_owned <= 0 {
            return 0.0;
        }
        self.clean_count as f64 / self.total_owned as f64
    }
}

/// Finds a category by id.
pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.id == id)
}

/// Finds a category by its (join-key) name.
pub fn find_category_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.name == name)
}

// =============================================================================
// Batch
// =============================================================================

/// The status of a laundry batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Dispatched, still washing.
    #[default]
    InProgress,
    /// Back in the closet.
    Completed,
}

/// One laundry run.
///
/// ## Lifecycle
/// ```text
/// dispatch ──► InProgress ──► complete ──► Completed (+ history entry)
/// ```
/// Batches are never deleted and never mutated otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Batch {
    pub id: String,

    /// When the batch was dispatched.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// Category name → item count, every value positive.
    pub contents: BTreeMap<String, i64>,

    /// Sum of `contents`.
    pub total_items: i64,

    pub status: BatchStatus,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Batch {
    /// Builds an in-progress batch, dropping non-positive entries.
    ///
    /// Returns `None` when nothing positive remains: a batch is never
    /// created with zero items.
    pub fn from_contents(contents: BTreeMap<String, i64>, now: DateTime<Utc>) -> Option<Self> {
        let contents: BTreeMap<String, i64> =
            contents.into_iter().filter(|(_, count)| *count > 0).collect();
        if contents.is_empty() {
            return None;
        }

        Some(Batch {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            total_items: saturating_sum(contents.values().copied()),
            contents,
            status: BatchStatus::InProgress,
            completed_at: None,
        })
    }

    #[inline]
    pub fn is_in_progress(&self) -> bool {
        self.status == BatchStatus::InProgress
    }

    /// The completed form, ready to be appended to the laundry history.
    pub fn to_history_entry(&self) -> Option<LaundryHistoryEntry> {
        let completed_at = self.completed_at?;
        Some(LaundryHistoryEntry {
            id: Some(self.id.clone()),
            timestamp: Some(self.timestamp),
            contents: self.contents.clone(),
            total_items: self.total_items,
            status: BatchStatus::Completed,
            completed_at,
        })
    }
}

/// A completed laundry run (or a synthetic seed record) used for cycle
/// statistics. Only `status` and `completed_at` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LaundryHistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub contents: BTreeMap<String, i64>,

    #[serde(default)]
    pub total_items: i64,

    pub status: BatchStatus,

    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

impl LaundryHistoryEntry {
    /// A bare history record carrying only a completion time.
    pub fn completed_at(completed_at: DateTime<Utc>) -> Self {
        LaundryHistoryEntry {
            id: None,
            timestamp: None,
            contents: BTreeMap::new(),
            total_items: 0,
            status: BatchStatus::Completed,
            completed_at,
        }
    }
}

// =============================================================================
// Bag (Hamper)
// =============================================================================

/// Items staged for the next dispatch, keyed by category name.
///
/// ## Invariants
/// - every stored value is positive (zero entries are removed)
/// - a staged value never exceeds the category's clean stock
///   (enforced by the actions, repaired by [`Bag::prune_to`])
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bag(BTreeMap<String, i64>);

impl Bag {
    pub fn new() -> Self {
        Bag::default()
    }

    /// Staged count for a category name.
    pub fn get(&self, name: &str) -> i64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// Total staged items.
    pub fn total(&self) -> i64 {
        saturating_sum(self.0.values().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &i64)> {
        self.0.iter()
    }

    /// Adds `count` items under `name`. Non-positive counts are ignored.
    pub fn stage(&mut self, name: &str, count: i64) {
        if count <= 0 {
            return;
        }
        let entry = self.0.entry(name.to_string()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Removes up to `count` items under `name`, returning how many left.
    pub fn unstage(&mut self, name: &str, count: i64) -> i64 {
        let current = self.get(name);
        let removed = count.clamp(0, current.max(0));
        if current - removed > 0 {
            self.0.insert(name.to_string(), current - removed);
        } else {
            self.0.remove(name);
        }
        removed
    }

    /// Removes the whole entry for `name`, returning its count.
    pub fn remove(&mut self, name: &str) -> i64 {
        self.0.remove(name).unwrap_or(0).max(0)
    }

    /// Drops names with no matching category and clamps every entry to the
    /// category's clean stock. Returns how many staged items were dropped.
    pub fn prune_to(&mut self, categories: &[Category]) -> i64 {
        let before = self.total();
        self.0 = std::mem::take(&mut self.0)
            .into_iter()
            .filter_map(|(name, count)| {
                let category = find_category_by_name(categories, &name)?;
                let kept = count.min(category.clean_count);
                (kept > 0).then_some((name, kept))
            })
            .collect();
        before.saturating_sub(self.total()).max(0)
    }

    /// The staged map, consumed.
    pub fn into_inner(self) -> BTreeMap<String, i64> {
        self.0
    }
}

impl From<BTreeMap<String, i64>> for Bag {
    fn from(contents: BTreeMap<String, i64>) -> Self {
        Bag(contents.into_iter().filter(|(_, count)| *count > 0).collect())
    }
}

impl FromIterator<(String, i64)> for Bag {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        let mut bag = Bag::new();
        for (name, count) in iter {
            bag.stage(&name, count);
        }
        bag
    }
}

/// Sum that sticks at the `i64` bounds instead of overflowing.
pub(crate) fn saturating_sum<I: IntoIterator<Item = i64>>(values: I) -> i64 {
    values.into_iter().fold(0_i64, i64::saturating_add)
}

// =============================================================================
// Wardrobe (State Container)
// =============================================================================

/// The full snapshot owned by the caller.
///
/// Every action consumes one `Wardrobe` and returns the next one; nothing in
/// the core keeps a reference to it between calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Wardrobe {
    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub batches: Vec<Batch>,

    #[serde(default)]
    pub laundry_history: Vec<LaundryHistoryEntry>,

    #[serde(default, rename = "bagContents")]
    pub bag: Bag,
}

impl Wardrobe {
    /// Batches still washing.
    pub fn in_progress_batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.iter().filter(|b| b.is_in_progress())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(Category::thresholds_for(0), (0, 0));
        assert_eq!(Category::thresholds_for(1), (2, 2));
        assert_eq!(Category::thresholds_for(5), (2, 2));
        assert_eq!(Category::thresholds_for(10), (2, 4));
        assert_eq!(Category::thresholds_for(11), (3, 5));
        assert_eq!(Category::thresholds_for(30), (6, 12));
    }

    #[test]
    fn test_new_category_is_conserved() {
        let socks = Category::new("Socks", "🧦", 12);
        assert!(socks.is_conserved());
        assert_eq!(socks.clean_count, 12);
        assert_eq!(socks.safety_threshold, 3);
        assert_eq!(socks.max_batch_size, 5);
        assert!(socks.is_active());

        let empty = Category::new("Scarves", "🧣", -4);
        assert_eq!(empty.total_owned, 0);
        assert!(!empty.is_active());
    }

    #[test]
    fn test_category_wire_names_are_camel_case() {
        let mut shirt = Category::new("Shirts", "👔", 3);
        shirt.last_worn_date = Some(at(2));
        let json = serde_json::to_value(&shirt).unwrap();

        for key in [
            "totalOwned",
            "cleanCount",
            "dirtyCount",
            "inLaundryCount",
            "safetyThreshold",
            "maxBatchSize",
            "wearHistory",
            "purchaseHistory",
            "retirementHistory",
            "lastWornDate",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }

        let back: Category = serde_json::from_value(json).unwrap();
        assert_eq!(back, shirt);
    }

    #[test]
    fn test_category_tolerates_sparse_records() {
        let json = r#"{"id":"c1","name":"Jeans","totalOwned":5,"cleanCount":-2}"#;
        let jeans: Category = serde_json::from_str(json).unwrap();
        assert_eq!(jeans.clean_count, -2);
        assert!(!jeans.is_conserved());
        assert!(jeans.wear_history.is_empty());
    }

    #[test]
    fn test_batch_from_contents() {
        let mut contents = BTreeMap::new();
        contents.insert("Socks".to_string(), 3);
        contents.insert("Shirts".to_string(), 0);
        contents.insert("Towels".to_string(), -1);

        let batch = Batch::from_contents(contents, at(1)).unwrap();
        assert_eq!(batch.contents.len(), 1);
        assert_eq!(batch.total_items, 3);
        assert_eq!(batch.status, BatchStatus::InProgress);
        assert!(batch.to_history_entry().is_none());

        let mut empty = BTreeMap::new();
        empty.insert("Socks".to_string(), 0);
        assert!(Batch::from_contents(empty, at(1)).is_none());
    }

    #[test]
    fn test_batch_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&BatchStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&BatchStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_history_entry_minimal_record() {
        let json = r#"{"status":"completed","completedAt":"2026-03-01T09:00:00Z"}"#;
        let entry: LaundryHistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.completed_at, at(1));
        assert_eq!(entry.total_items, 0);
        assert_eq!(entry, LaundryHistoryEntry::completed_at(at(1)));
    }

    #[test]
    fn test_bag_stage_and_unstage() {
        let mut bag = Bag::new();
        bag.stage("Socks", 2);
        bag.stage("Socks", 1);
        bag.stage("Shirts", 0);
        assert_eq!(bag.get("Socks"), 3);
        assert_eq!(bag.total(), 3);

        assert_eq!(bag.unstage("Socks", 5), 3);
        assert!(bag.is_empty());
    }

    #[test]
    fn test_bag_prune_to_categories() {
        let socks = Category::new("Socks", "🧦", 2);
        let mut bag: Bag = vec![("Socks".to_string(), 4), ("Ghost".to_string(), 3)]
            .into_iter()
            .collect();

        let dropped = bag.prune_to(&[socks]);
        assert_eq!(dropped, 5);
        assert_eq!(bag.get("Socks"), 2);
        assert_eq!(bag.get("Ghost"), 0);
    }

    #[test]
    fn test_wardrobe_uses_bag_contents_key() {
        let mut wardrobe = Wardrobe::default();
        wardrobe.bag.stage("Socks", 1);
        let json = serde_json::to_value(&wardrobe).unwrap();
        assert_eq!(json["bagContents"]["Socks"], 1);
        assert!(json.get("laundryHistory").is_some());
    }
}
