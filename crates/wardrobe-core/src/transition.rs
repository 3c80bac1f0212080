//! # State Transition Functions
//!
//! Pure, total functions from `(categories, event)` to a new category list.
//!
//! ## State Machine of One Item
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   acquire ──► CLEAN ──── toss ────► CLEAN (staged in bag, wear logged) │
//! │                 ▲                          │                            │
//! │                 │                      dispatch                         │
//! │              complete                      │                            │
//! │                 │                          ▼                            │
//! │                 └──────────────────── IN LAUNDRY                        │
//! │                                                                         │
//! │   DIRTY: soiled items outside a batch (legacy data, repair deficit).   │
//! │          `complete` drains it after in-laundry stock.                  │
//! │                                                                         │
//! │   retire draws CLEAN ──► DIRTY ──► IN LAUNDRY, in that order.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules Shared by Every Function
//! - Inputs are borrowed, a fresh `Vec<Category>` is returned
//! - Unknown ids and non-positive counts are no-ops
//! - Amounts are clamped to what is available, and the clamped amount is
//!   returned where the caller needs to report it
//! - `total_owned` only grows in [`acquire`] and only shrinks in [`retire`]
//!   and [`remove_category`]

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::money::Money;
use crate::types::{Bag, Category, InventoryRecord, WearRecord};

/// Applies `f` to the category with `id`, cloning every other category.
fn update_category<F>(categories: &[Category], id: &str, mut f: F) -> Vec<Category>
where
    F: FnMut(&mut Category),
{
    categories
        .iter()
        .map(|c| {
            let mut c = c.clone();
            if c.id == id {
                f(&mut c);
            }
            c
        })
        .collect()
}

// =============================================================================
// Rotation Events
// =============================================================================

/// Records a wear event of up to `count` items.
///
/// Tossing into the hamper does not change clean/dirty counts: a staged
/// item can still be pulled back out before laundering. Only the wear
/// history and `last_worn_date` move.
///
/// ## Returns
/// The new categories and the amount actually recorded
/// (`min(count, clean_count)`, or 0 for a no-op).
pub fn toss(
    categories: &[Category],
    category_id: &str,
    count: i64,
    at: DateTime<Utc>,
) -> (Vec<Category>, i64) {
    let mut recorded = 0;
    let next = update_category(categories, category_id, |c| {
        let worn = count.min(c.clean_count).max(0);
        if worn == 0 {
            return;
        }
        c.wear_history.push(WearRecord { date: at, count: worn });
        c.last_worn_date = Some(at);
        recorded = worn;
    });
    (next, recorded)
}

/// Moves staged items from clean stock into the laundry.
///
/// For each bag entry the moved amount is `min(staged, clean_count)`; any
/// excess is dropped. The returned map holds the **post-clamp** amounts and
/// is what a batch must be built from, so a batch never records items that
/// never left the closet.
pub fn dispatch(categories: &[Category], bag: &Bag) -> (Vec<Category>, BTreeMap<String, i64>) {
    let mut dispatched = BTreeMap::new();
    let next = categories
        .iter()
        .map(|c| {
            let mut c = c.clone();
            let moved = bag.get(&c.name).min(c.clean_count).max(0);
            if moved > 0 {
                c.clean_count -= moved;
                c.in_laundry_count = c.in_laundry_count.saturating_add(moved);
                dispatched.insert(c.name.clone(), moved);
            }
            c
        })
        .collect();
    (next, dispatched)
}

/// Returns a finished batch to clean stock.
///
/// Each entry drains `in_laundry_count` first, then `dirty_count`, both
/// clamped at zero, and `clean_count` grows by exactly what was drained.
/// Names without a matching category are skipped.
pub fn complete(categories: &[Category], contents: &BTreeMap<String, i64>) -> Vec<Category> {
    categories
        .iter()
        .map(|c| {
            let mut c = c.clone();
            let count = contents.get(&c.name).copied().unwrap_or(0).max(0);
            if count == 0 {
                return c;
            }
            let from_laundry = count.min(c.in_laundry_count.max(0));
            let from_dirty = (count - from_laundry).min(c.dirty_count.max(0));
            c.in_laundry_count -= from_laundry;
            c.dirty_count -= from_dirty;
            c.clean_count = c.clean_count.saturating_add(from_laundry + from_dirty);
            c
        })
        .collect()
}

// =============================================================================
// Ownership Events
// =============================================================================

/// Adds `count` new clean items and logs the purchase.
pub fn acquire(
    categories: &[Category],
    category_id: &str,
    count: i64,
    price: Option<Money>,
    at: DateTime<Utc>,
) -> Vec<Category> {
    if count <= 0 {
        return categories.to_vec();
    }
    update_category(categories, category_id, |c| {
        c.total_owned = c.total_owned.saturating_add(count);
        c.clean_count = c.clean_count.saturating_add(count);
        c.recompute_thresholds();
        c.purchase_history.push(InventoryRecord {
            date: at,
            count,
            price,
            reason: None,
        });
    })
}

/// Removes up to `count` items, drawing clean → dirty → in laundry.
///
/// ## Example
/// ```text
/// clean=2 dirty=1 inLaundry=1, retire 3
///   clean:     2 → 0  (2 drawn)
///   dirty:     1 → 0  (1 drawn)
///   inLaundry: 1 → 1
/// ```
///
/// ## Returns
/// The new categories and the number of items actually retired.
pub fn retire(
    categories: &[Category],
    category_id: &str,
    count: i64,
    reason: Option<String>,
    at: DateTime<Utc>,
) -> (Vec<Category>, i64) {
    let mut retired = 0;
    let next = update_category(categories, category_id, |c| {
        let wanted = count.min(c.total_owned).max(0);
        let from_clean = wanted.min(c.clean_count.max(0));
        let from_dirty = (wanted - from_clean).min(c.dirty_count.max(0));
        let from_laundry = (wanted - from_clean - from_dirty).min(c.in_laundry_count.max(0));
        let removed = from_clean + from_dirty + from_laundry;
        if removed == 0 {
            return;
        }

        c.clean_count -= from_clean;
        c.dirty_count -= from_dirty;
        c.in_laundry_count -= from_laundry;
        c.total_owned -= removed;
        c.recompute_thresholds();
        c.retirement_history.push(InventoryRecord {
            date: at,
            count: removed,
            price: None,
            reason: reason.clone(),
        });
        retired = removed;
    });
    (next, retired)
}

// =============================================================================
// Structural Events
// =============================================================================

/// Appends a new category with `initial` clean items.
///
/// Name validation happens in the action layer; this only builds the record.
///
/// ## Returns
/// The new categories and the id of the created category.
pub fn add_category(
    categories: &[Category],
    name: &str,
    emoji: &str,
    initial: i64,
) -> (Vec<Category>, String) {
    let category = Category::new(name, emoji, initial);
    let id = category.id.clone();
    let mut next = categories.to_vec();
    next.push(category);
    (next, id)
}

/// Removes a category and excises its staged items from the bag.
///
/// The bag references categories by name, so the entry for the removed
/// name is dropped and the staged total shrinks with it.
pub fn remove_category(categories: &[Category], bag: &Bag, category_id: &str) -> (Vec<Category>, Bag) {
    let mut bag = bag.clone();
    let mut next = Vec::with_capacity(categories.len());
    for c in categories {
        if c.id == category_id {
            bag.remove(&c.name);
        } else {
            next.push(c.clone());
        }
    }
    (next, bag)
}

/// Turns hibernation on or off.
pub fn set_hibernation(categories: &[Category], category_id: &str, hibernated: bool) -> Vec<Category> {
    update_category(categories, category_id, |c| c.hibernated = hibernated)
}

// =============================================================================
// Repair Passes
// =============================================================================

/// Normalizes persisted categories.
///
/// Per category:
/// 1. every count is clamped to `>= 0`
/// 2. the state counts are forced to sum to `total_owned`; an excess is
///    taken from in-laundry, then dirty, then clean; a deficit is booked as
///    dirty, so clean stock (what the user sees first) is adjusted last
/// 3. thresholds are recomputed
/// 4. history records with a non-positive count are dropped
///
/// Idempotent: a second pass returns its input unchanged.
pub fn validate_and_fix_consistency(categories: &[Category]) -> Vec<Category> {
    categories
        .iter()
        .map(|c| {
            let mut c = c.clone();
            c.total_owned = c.total_owned.max(0);
            c.clean_count = c.clean_count.max(0);
            c.dirty_count = c.dirty_count.max(0);
            c.in_laundry_count = c.in_laundry_count.max(0);

            // widened: corrupt counts may each be close to i64::MAX
            let sum = i128::from(c.clean_count) + i128::from(c.dirty_count) + i128::from(c.in_laundry_count);
            let owned = i128::from(c.total_owned);
            if sum > owned {
                let mut excess = sum - owned;
                for field in [&mut c.in_laundry_count, &mut c.dirty_count, &mut c.clean_count] {
                    let taken = excess.min(i128::from(*field));
                    *field -= taken as i64;
                    excess -= taken;
                }
            } else if sum < owned {
                // the deficit is below total_owned, so it fits
                c.dirty_count += (owned - sum) as i64;
            }

            c.recompute_thresholds();
            c.wear_history.retain(|r| r.count > 0);
            c.purchase_history.retain(|r| r.count > 0);
            c.retirement_history.retain(|r| r.count > 0);
            c
        })
        .collect()
}

/// Drops categories that were retired down to zero items.
///
/// A category created empty (no retirements yet) is kept so the user can
/// stock it later.
pub fn prune_exhausted(categories: &[Category]) -> Vec<Category> {
    categories
        .iter()
        .filter(|c| c.total_owned > 0 || c.retirement_history.is_empty())
        .cloned()
        .collect()
}

/// Drops stale names from the bag and clamps entries to clean stock.
///
/// ## Returns
/// The pruned bag and the number of staged items dropped.
pub fn prune_bag(bag: &Bag, categories: &[Category]) -> (Bag, i64) {
    let mut bag = bag.clone();
    let dropped = bag.prune_to(categories);
    (bag, dropped)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0).unwrap()
    }

    fn category(name: &str, clean: i64, dirty: i64, in_laundry: i64) -> Category {
        let mut c = Category::new(name, "", clean + dirty + in_laundry);
        c.clean_count = clean;
        c.dirty_count = dirty;
        c.in_laundry_count = in_laundry;
        c
    }

    fn bag_of(entries: &[(&str, i64)]) -> Bag {
        entries.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn test_toss_records_wear_without_moving_stock() {
        let socks = category("Socks", 5, 0, 0);
        let id = socks.id.clone();

        let (next, recorded) = toss(&[socks], &id, 2, now());
        assert_eq!(recorded, 2);
        assert_eq!(next[0].clean_count, 5);
        assert_eq!(next[0].wear_history.len(), 1);
        assert_eq!(next[0].wear_history[0].count, 2);
        assert_eq!(next[0].last_worn_date, Some(now()));
    }

    #[test]
    fn test_toss_clamps_to_clean_stock() {
        let socks = category("Socks", 1, 0, 3);
        let id = socks.id.clone();

        let (next, recorded) = toss(&[socks], &id, 4, now());
        assert_eq!(recorded, 1);
        assert_eq!(next[0].wear_history[0].count, 1);
    }

    #[test]
    fn test_toss_noops() {
        let empty = category("Socks", 0, 0, 2);
        let id = empty.id.clone();

        let (next, recorded) = toss(&[empty.clone()], &id, 1, now());
        assert_eq!(recorded, 0);
        assert_eq!(next[0], empty);

        let (next, recorded) = toss(&[empty.clone()], "missing", 1, now());
        assert_eq!(recorded, 0);
        assert_eq!(next[0], empty);

        let (_, recorded) = toss(&[empty], &id, -2, now());
        assert_eq!(recorded, 0);
    }

    #[test]
    fn test_dispatch_clamps_to_clean_stock() {
        let socks = category("Socks", 3, 0, 0);

        let (next, dispatched) = dispatch(&[socks], &bag_of(&[("Socks", 100)]));
        assert_eq!(next[0].clean_count, 0);
        assert_eq!(next[0].in_laundry_count, 3);
        assert!(next[0].is_conserved());
        assert_eq!(dispatched.get("Socks"), Some(&3));
    }

    #[test]
    fn test_dispatch_skips_unknown_and_empty_entries() {
        let socks = category("Socks", 0, 0, 2);
        let (next, dispatched) = dispatch(&[socks.clone()], &bag_of(&[("Socks", 2), ("Ghost", 1)]));
        assert!(dispatched.is_empty());
        assert_eq!(next[0], socks);
    }

    #[test]
    fn test_complete_inverts_dispatch() {
        let before = vec![category("Socks", 6, 1, 2), category("Shirts", 4, 0, 0)];
        let bag = bag_of(&[("Socks", 4), ("Shirts", 9)]);

        let (dispatched_state, contents) = dispatch(&before, &bag);
        let after = complete(&dispatched_state, &contents);

        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(a.dirty_count, b.dirty_count);
            assert_eq!(a.in_laundry_count, b.in_laundry_count);
            assert_eq!(a.clean_count, b.clean_count);
            assert!(a.is_conserved());
        }
        let total: i64 = contents.values().sum();
        let dispatched_clean: i64 = dispatched_state.iter().map(|c| c.clean_count).sum();
        let restored_clean: i64 = after.iter().map(|c| c.clean_count).sum();
        assert_eq!(restored_clean - dispatched_clean, total);
    }

    #[test]
    fn test_complete_drains_dirty_after_laundry() {
        let towels = category("Towels", 1, 2, 1);
        let mut contents = BTreeMap::new();
        contents.insert("Towels".to_string(), 5);

        let next = complete(&[towels], &contents);
        assert_eq!(next[0].in_laundry_count, 0);
        assert_eq!(next[0].dirty_count, 0);
        assert_eq!(next[0].clean_count, 4);
        assert!(next[0].is_conserved());
    }

    #[test]
    fn test_acquire_recomputes_thresholds() {
        let socks = category("Socks", 4, 0, 0);
        let id = socks.id.clone();

        let next = acquire(&[socks], &id, 8, Some(Money::from_cents(1600)), now());
        assert_eq!(next[0].total_owned, 12);
        assert_eq!(next[0].clean_count, 12);
        assert_eq!(next[0].safety_threshold, 3);
        assert_eq!(next[0].max_batch_size, 5);
        assert_eq!(next[0].purchase_history[0].price, Some(Money::from_cents(1600)));

        let unchanged = acquire(&next, &id, 0, None, now());
        assert_eq!(unchanged, next);
    }

    #[test]
    fn test_retire_priority_clean_dirty_laundry() {
        let jeans = category("Jeans", 2, 1, 1);
        let id = jeans.id.clone();

        let (next, retired) = retire(&[jeans], &id, 3, Some("worn out".to_string()), now());
        assert_eq!(retired, 3);
        assert_eq!(next[0].clean_count, 0);
        assert_eq!(next[0].dirty_count, 0);
        assert_eq!(next[0].in_laundry_count, 1);
        assert_eq!(next[0].total_owned, 1);
        assert!(next[0].is_conserved());
        assert_eq!(next[0].retirement_history[0].reason.as_deref(), Some("worn out"));
    }

    #[test]
    fn test_retire_never_exceeds_owned() {
        let jeans = category("Jeans", 1, 1, 0);
        let id = jeans.id.clone();

        let (next, retired) = retire(&[jeans], &id, 10, None, now());
        assert_eq!(retired, 2);
        assert_eq!(next[0].total_owned, 0);
        assert_eq!(next[0].safety_threshold, 0);
    }

    #[test]
    fn test_remove_category_excises_bag_entry() {
        let socks = category("Socks", 4, 0, 0);
        let shirts = category("Shirts", 3, 0, 0);
        let id = socks.id.clone();
        let bag = bag_of(&[("Socks", 2), ("Shirts", 1)]);

        let (next, bag) = remove_category(&[socks, shirts], &bag, &id);
        assert_eq!(next.len(), 1);
        assert_eq!(bag.get("Socks"), 0);
        assert_eq!(bag.total(), 1);
    }

    #[test]
    fn test_set_hibernation() {
        let coats = category("Coats", 2, 0, 0);
        let id = coats.id.clone();
        let next = set_hibernation(&[coats], &id, true);
        assert!(next[0].hibernated);
        assert!(!next[0].is_active());
    }

    #[test]
    fn test_repair_clamps_and_rebalances() {
        let mut negative = category("Socks", 0, 0, 0);
        negative.total_owned = 5;
        negative.clean_count = -2;
        negative.dirty_count = 1;
        negative.in_laundry_count = 1;

        let mut excess = category("Shirts", 0, 0, 0);
        excess.total_owned = 4;
        excess.clean_count = 3;
        excess.dirty_count = 2;
        excess.in_laundry_count = 2;

        let fixed = validate_and_fix_consistency(&[negative, excess]);
        assert!(fixed.iter().all(Category::is_conserved));
        // deficit of 3 booked as dirty
        assert_eq!(fixed[0].clean_count, 0);
        assert_eq!(fixed[0].dirty_count, 4);
        // excess of 3 taken from laundry (2), then dirty (1)
        assert_eq!(fixed[1].clean_count, 3);
        assert_eq!(fixed[1].dirty_count, 1);
        assert_eq!(fixed[1].in_laundry_count, 0);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let mut broken = category("Socks", 0, 0, 0);
        broken.total_owned = -1;
        broken.clean_count = 7;
        broken.wear_history.push(WearRecord { date: now(), count: -3 });
        let mut drift = category("Shirts", 2, 2, 2);
        drift.total_owned = 9;
        drift.safety_threshold = 40;

        let once = validate_and_fix_consistency(&[broken, drift]);
        let twice = validate_and_fix_consistency(&once);
        assert_eq!(once, twice);
        assert!(once[0].wear_history.is_empty());
    }

    #[test]
    fn test_repair_survives_huge_stored_counts() {
        let stored: Category = serde_json::from_str(
            r#"{"id":"c1","name":"Socks","totalOwned":9000000000000000000,
                "cleanCount":9000000000000000000,"dirtyCount":9000000000000000000}"#,
        )
        .unwrap();

        let fixed = validate_and_fix_consistency(&[stored]);
        assert!(fixed[0].is_conserved());
        assert_eq!(fixed[0].clean_count, 9_000_000_000_000_000_000);
        assert_eq!(fixed[0].dirty_count, 0);
        assert_eq!(fixed[0].safety_threshold, 1_800_000_000_000_000_000);
        assert_eq!(validate_and_fix_consistency(&fixed), fixed);

        assert_eq!(Category::thresholds_for(i64::MAX).0, i64::MAX / 5 + 1);
    }

    #[test]
    fn test_prune_exhausted_keeps_fresh_empty_categories() {
        let fresh = category("Scarves", 0, 0, 0);
        let ties = category("Ties", 1, 0, 0);
        let id = ties.id.clone();
        let (after, _) = retire(&[ties], &id, 1, None, now());
        assert_eq!(after[0].total_owned, 0);

        let kept = prune_exhausted(&[fresh.clone(), after[0].clone()]);
        assert_eq!(kept, vec![fresh]);
    }

    #[test]
    fn test_conservation_over_event_sequence() {
        let mut categories = vec![category("Socks", 10, 0, 0), category("Shirts", 6, 0, 0)];
        let socks = categories[0].id.clone();
        let shirts = categories[1].id.clone();

        for round in 0..12_i64 {
            let (next, _) = toss(&categories, &socks, round % 4, now());
            let bag = bag_of(&[("Socks", round % 5), ("Shirts", 7 - round % 7)]);
            let (next, contents) = dispatch(&next, &bag);
            let next = if round % 3 == 0 { complete(&next, &contents) } else { next };
            let next = acquire(&next, &shirts, round % 2, None, now());
            let (next, _) = retire(&next, &socks, round % 3, None, now());
            categories = next;

            for c in &categories {
                assert!(c.is_conserved(), "round {round}: {c:?}");
            }
        }
    }
}
