//! Spending and cost-per-wear.

use serde::Serialize;
use ts_rs::TS;

use super::AnalyticsEngine;
use crate::money::Money;
use crate::types::saturating_sum;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategorySpending {
    pub category_id: String,
    pub name: String,
    pub total_spent: Money,
    pub items_worn: i64,
    /// `None` until something has been worn.
    pub cost_per_wear: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SpendingSummary {
    pub categories: Vec<CategorySpending>,
    pub total_spent: Money,
}

impl<'a> AnalyticsEngine<'a> {
    /// Purchase totals and cost per wear for every category, hibernated
    /// ones included. Unpriced purchases count as free.
    pub fn spending_summary(&self) -> SpendingSummary {
        let categories: Vec<CategorySpending> = self
            .categories
            .iter()
            .map(|c| {
                let total_spent: Money = c.purchase_history.iter().filter_map(|r| r.price).sum();
                let items_worn = saturating_sum(c.wear_history.iter().map(|r| r.count.max(0)));
                CategorySpending {
                    category_id: c.id.clone(),
                    name: c.name.clone(),
                    total_spent,
                    items_worn,
                    cost_per_wear: total_spent.per_unit(items_worn),
                }
            })
            .collect();

        SpendingSummary {
            total_spent: categories.iter().map(|c| c.total_spent).sum(),
            categories,
        }
    }
}
