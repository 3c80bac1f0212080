//! Stockout forecasting.
//!
//! Daily consumption comes from recent wear history once a category has
//! enough of it, otherwise from a per-category default.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::{project_date, AnalyticsEngine};
use crate::types::{find_category, saturating_sum, Category};

/// Wear entries needed before history replaces the default rate.
const MIN_WEAR_ENTRIES: usize = 7;

/// Trailing window for the history-based rate.
const CONSUMPTION_WINDOW_DAYS: i64 = 30;

/// Rate for categories missing from the default table.
const FALLBACK_DAILY_CONSUMPTION: f64 = 0.5;

const CRITICAL_DAYS: f64 = 2.0;
const WARNING_DAYS: f64 = 5.0;

/// Typical items worn per day for common category names.
///
/// ```rust
/// use wardrobe_core::analytics::default_daily_consumption;
///
/// assert_eq!(default_daily_consumption("Socks"), 1.0);
/// assert_eq!(default_daily_consumption("Ball Gowns"), 0.5);
/// ```
pub fn default_daily_consumption(name: &str) -> f64 {
    match name.trim().to_lowercase().as_str() {
        "underwear" | "socks" => 1.0,
        "t-shirts" | "tshirts" | "tees" => 0.7,
        "shirts" | "workout clothes" => 0.5,
        "pants" | "trousers" | "shorts" | "towels" | "pajamas" => 0.3,
        "jeans" | "sweaters" | "hoodies" => 0.2,
        _ => FALLBACK_DAILY_CONSUMPTION,
    }
}

/// How urgent a stockout is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Severity {
    Critical,
    Warning,
    Normal,
}

impl Severity {
    fn from_days(days: f64) -> Self {
        if days <= CRITICAL_DAYS {
            Severity::Critical
        } else if days <= WARNING_DAYS {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }
}

/// When a category is expected to run out of clean items.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockoutPrediction {
    pub category_id: String,
    pub category_name: String,
    pub emoji: String,
    pub clean_count: i64,
    pub daily_consumption: f64,
    pub days_until_stockout: f64,
    #[ts(as = "String")]
    pub stockout_date: DateTime<Utc>,
    pub severity: Severity,
}

impl<'a> AnalyticsEngine<'a> {
    /// Items of `category` expected to be worn per day.
    pub fn daily_consumption(&self, category: &Category) -> f64 {
        if category.wear_history.len() < MIN_WEAR_ENTRIES {
            return default_daily_consumption(&category.name);
        }

        let since = self.now - Duration::days(CONSUMPTION_WINDOW_DAYS);
        let worn = saturating_sum(
            category
                .wear_history
                .iter()
                .filter(|r| r.date >= since && r.date <= self.now)
                .map(|r| r.count.max(0)),
        );
        worn as f64 / CONSUMPTION_WINDOW_DAYS as f64
    }

    /// Forecast for one category.
    ///
    /// `None` for a missing or hibernated category, or when nothing is
    /// being consumed.
    pub fn predict_stockout(&self, category_id: &str) -> Option<StockoutPrediction> {
        let category = find_category(self.categories, category_id)?;
        self.predict(category)
    }

    /// Forecasts for every awake category, soonest stockout first.
    pub fn get_all_stockout_predictions(&self) -> Vec<StockoutPrediction> {
        let mut predictions: Vec<StockoutPrediction> = self.awake().filter_map(|c| self.predict(c)).collect();
        predictions.sort_by(|a, b| a.days_until_stockout.total_cmp(&b.days_until_stockout));
        predictions
    }

    fn predict(&self, category: &Category) -> Option<StockoutPrediction> {
        // nothing owned, nothing to run out of
        if category.hibernated || category.total_owned <= 0 {
            return None;
        }
        let daily_consumption = self.daily_consumption(category);
        if daily_consumption <= 0.0 {
            return None;
        }

        let clean_count = category.clean_count.max(0);
        let days_until_stockout = clean_count as f64 / daily_consumption;
        Some(StockoutPrediction {
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            emoji: category.emoji.clone(),
            clean_count,
            daily_consumption,
            days_until_stockout,
            stockout_date: project_date(self.now, days_until_stockout),
            severity: Severity::from_days(days_until_stockout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::types::WearRecord;

    #[test]
    fn test_jeans_without_clean_stock_is_critical() {
        let mut jeans = category("Jeans", 0, 0, 5);
        jeans.safety_threshold = 1;
        let socks = category("Socks", 6, 0, 0);
        let shirts = category("Shirts", 2, 0, 0);
        let categories = vec![socks, shirts, jeans.clone()];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());

        let prediction = engine.predict_stockout(&jeans.id).unwrap();
        assert_eq!(prediction.severity, Severity::Critical);
        assert_eq!(prediction.days_until_stockout, 0.0);
        assert_eq!(prediction.stockout_date, now());

        let all = engine.get_all_stockout_predictions();
        assert_eq!(all[0].category_name, "Jeans");
        // shirts: 2 / 0.5 = 4 days, socks: 6 / 1.0 = 6 days
        let order: Vec<&str> = all.iter().map(|p| p.category_name.as_str()).collect();
        assert_eq!(order, vec!["Jeans", "Shirts", "Socks"]);
        assert_eq!(all[1].severity, Severity::Warning);
        assert_eq!(all[2].severity, Severity::Normal);
    }

    #[test]
    fn test_missing_and_hibernated_have_no_prediction() {
        let mut coats = category("Coats", 1, 0, 0);
        coats.hibernated = true;
        let categories = vec![coats.clone()];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());

        assert!(engine.predict_stockout(&coats.id).is_none());
        assert!(engine.predict_stockout("missing").is_none());
        assert!(engine.get_all_stockout_predictions().is_empty());
    }

    #[test]
    fn test_empty_category_has_no_prediction() {
        let empty = category("Socks", 0, 0, 0);
        let shirts = category("Shirts", 2, 0, 0);
        let categories = vec![empty.clone(), shirts];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());

        assert!(engine.predict_stockout(&empty.id).is_none());
        let all = engine.get_all_stockout_predictions();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].category_name, "Shirts");
    }

    #[test]
    fn test_consumption_from_wear_history() {
        let mut socks = category("Socks", 9, 0, 0);
        // 7 entries, 6 inside the window: 2 * 6 = 12 worn in 30 days
        socks.wear_history = (0..7)
            .map(|i| WearRecord {
                date: days_ago(if i == 0 { 45 } else { i * 3 }),
                count: 2,
            })
            .collect();
        let engine = AnalyticsEngine::new(&[], &[], &[]).as_of(now());

        assert!((engine.daily_consumption(&socks) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_short_history_uses_default_table() {
        let mut towels = category("Towels", 3, 0, 0);
        towels.wear_history = vec![WearRecord { date: days_ago(1), count: 3 }];
        let engine = AnalyticsEngine::new(&[], &[], &[]).as_of(now());
        assert_eq!(engine.daily_consumption(&towels), 0.3);
    }

    #[test]
    fn test_stale_history_means_no_consumption() {
        let mut socks = category("Socks", 4, 0, 0);
        socks.wear_history = (0..8)
            .map(|i| WearRecord {
                date: days_ago(90 + i),
                count: 1,
            })
            .collect();
        let categories = vec![socks.clone()];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());
        assert!(engine.predict_stockout(&socks.id).is_none());
    }
}
