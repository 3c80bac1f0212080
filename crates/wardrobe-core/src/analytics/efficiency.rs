//! Dead stock and inventory efficiency.
//!
//! ## Partition of Owned Items
//! ```text
//! dead-stock category     all of totalOwned                → stagnant
//! any other category      dirty + inLaundry                → active
//!                         min(clean, batch − soiled)       → active (rotating)
//!                         remaining clean                  → stagnant
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::AnalyticsEngine;
use crate::types::Category;
use crate::DEAD_STOCK_DAYS;

/// Split of owned items into rotating and idle stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryEfficiency {
    pub active_items: i64,
    pub stagnant_items: i64,
    pub total_items: i64,
    /// Rounded share of active items; 100 for an empty wardrobe.
    pub efficiency_percent: u32,
    /// Name of the category holding the most stagnant items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_offender: Option<String>,
}

impl<'a> AnalyticsEngine<'a> {
    /// Clean stock unworn for more than [`DEAD_STOCK_DAYS`] days.
    ///
    /// Age is measured from the last wear, or from the first purchase for a
    /// category never worn. A category with neither is never dead stock.
    pub fn is_dead_stock(&self, category: &Category) -> bool {
        if category.clean_count <= 0 {
            return false;
        }
        match stock_reference_date(category) {
            Some(since) => (self.now - since).num_days() > DEAD_STOCK_DAYS,
            None => false,
        }
    }

    pub fn calculate_inventory_efficiency(&self) -> InventoryEfficiency {
        let mut active_items: i64 = 0;
        let mut stagnant_items: i64 = 0;
        let mut worst: Option<(&str, i64)> = None;

        for category in self.awake() {
            let (active, stagnant) = self.partition(category);
            active_items = active_items.saturating_add(active);
            stagnant_items = stagnant_items.saturating_add(stagnant);
            if stagnant > 0 && worst.map_or(true, |(_, most)| stagnant > most) {
                worst = Some((&category.name, stagnant));
            }
        }

        let total_items = active_items.saturating_add(stagnant_items);
        let efficiency_percent = if total_items == 0 {
            100
        } else {
            (active_items as f64 * 100.0 / total_items as f64).round() as u32
        };

        InventoryEfficiency {
            active_items,
            stagnant_items,
            total_items,
            efficiency_percent,
            worst_offender: worst.map(|(name, _)| name.to_string()),
        }
    }

    /// `(active, stagnant)` items of one category.
    fn partition(&self, category: &Category) -> (i64, i64) {
        if self.is_dead_stock(category) {
            return (0, category.total_owned.max(0));
        }
        let clean = category.clean_count.max(0);
        let soiled = category.soiled_count().max(0);
        let rotating = clean.min(category.max_batch_size.saturating_sub(soiled).max(0));
        (soiled.saturating_add(rotating), clean - rotating)
    }
}

fn stock_reference_date(category: &Category) -> Option<DateTime<Utc>> {
    category
        .last_worn_date
        .or_else(|| category.purchase_history.iter().map(|r| r.date).min())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::types::InventoryRecord;

    #[test]
    fn test_empty_wardrobe_is_fully_efficient() {
        let engine = AnalyticsEngine::new(&[], &[], &[]).as_of(now());
        assert_eq!(
            engine.calculate_inventory_efficiency(),
            InventoryEfficiency {
                active_items: 0,
                stagnant_items: 0,
                total_items: 0,
                efficiency_percent: 100,
                worst_offender: None,
            }
        );
    }

    #[test]
    fn test_dead_stock_detection() {
        let engine = AnalyticsEngine::new(&[], &[], &[]).as_of(now());

        let mut ties = category("Ties", 4, 0, 0);
        ties.last_worn_date = Some(days_ago(61));
        assert!(engine.is_dead_stock(&ties));

        ties.last_worn_date = Some(days_ago(60));
        assert!(!engine.is_dead_stock(&ties));

        let mut all_dirty = category("Ties", 0, 4, 0);
        all_dirty.last_worn_date = Some(days_ago(200));
        assert!(!engine.is_dead_stock(&all_dirty));
    }

    #[test]
    fn test_never_worn_uses_first_purchase() {
        let engine = AnalyticsEngine::new(&[], &[], &[]).as_of(now());
        let mut scarves = category("Scarves", 3, 0, 0);
        scarves.last_worn_date = None;
        assert!(!engine.is_dead_stock(&scarves));

        scarves.purchase_history = vec![
            InventoryRecord {
                date: days_ago(10),
                count: 1,
                price: None,
                reason: None,
            },
            InventoryRecord {
                date: days_ago(90),
                count: 2,
                price: None,
                reason: None,
            },
        ];
        assert!(engine.is_dead_stock(&scarves));
    }

    #[test]
    fn test_partition_of_owned_items() {
        // batch 5, soiled 3: rotating min(6, 2) = 2, stagnant 4
        let mut socks = category("Socks", 6, 1, 2);
        socks.max_batch_size = 5;

        let mut ties = category("Ties", 3, 0, 0);
        ties.last_worn_date = Some(days_ago(100));

        let categories = vec![socks, ties];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());
        let efficiency = engine.calculate_inventory_efficiency();

        assert_eq!(efficiency.active_items, 5);
        assert_eq!(efficiency.stagnant_items, 7);
        assert_eq!(efficiency.total_items, 12);
        assert_eq!(efficiency.efficiency_percent, 42);
        assert_eq!(efficiency.worst_offender.as_deref(), Some("Socks"));
    }

    #[test]
    fn test_hibernated_categories_are_excluded() {
        let mut coats = category("Coats", 8, 0, 0);
        coats.hibernated = true;
        let categories = vec![coats];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());
        assert_eq!(engine.calculate_inventory_efficiency().total_items, 0);
    }
}
