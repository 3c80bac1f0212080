//! # Analytics Engine
//!
//! Read-only statistics over one wardrobe snapshot.
//!
//! ## Query Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AnalyticsEngine<'a>                              │
//! │       borrows (categories, batches, laundry history) + as_of time      │
//! │                                                                         │
//! │  flow        calculate_flow_score, flow_breakdown                      │
//! │  stockout    predict_stockout, get_all_stockout_predictions            │
//! │  efficiency  is_dead_stock, calculate_inventory_efficiency             │
//! │  cycle       analyze_laundry_cycles                                    │
//! │  burndown    generate_burn_down_data                                   │
//! │  insight     generate_insights                                         │
//! │  spending    spending_summary                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine holds only borrows and never caches: when the snapshot
//! changes, build a new engine.

mod burndown;
mod cycle;
mod efficiency;
mod flow;
mod insight;
mod spending;
mod stockout;

pub use burndown::{BurnDownData, BurnDownSeries, MAX_DAYS_AHEAD};
pub use cycle::{CycleAnalysis, CycleConsistency};
pub use efficiency::InventoryEfficiency;
pub use flow::FlowBreakdown;
pub use insight::{Insight, InsightKind, Urgency};
pub use spending::{CategorySpending, SpendingSummary};
pub use stockout::{default_daily_consumption, Severity, StockoutPrediction};

use chrono::{DateTime, Duration, Utc};

use crate::types::{saturating_sum, Batch, Category, LaundryHistoryEntry, Wardrobe};

/// Pure query engine over a borrowed snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsEngine<'a> {
    categories: &'a [Category],
    batches: &'a [Batch],
    history: &'a [LaundryHistoryEntry],
    now: DateTime<Utc>,
}

impl<'a> AnalyticsEngine<'a> {
    /// Builds an engine evaluated at the current time.
    pub fn new(categories: &'a [Category], batches: &'a [Batch], history: &'a [LaundryHistoryEntry]) -> Self {
        AnalyticsEngine {
            categories,
            batches,
            history,
            now: Utc::now(),
        }
    }

    pub fn from_wardrobe(wardrobe: &'a Wardrobe) -> Self {
        Self::new(&wardrobe.categories, &wardrobe.batches, &wardrobe.laundry_history)
    }

    /// Evaluates every time-dependent query at `now` instead.
    pub fn as_of(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Batches still washing, as seen by this snapshot.
    pub fn in_progress_items(&self) -> i64 {
        saturating_sum(self.batches.iter().filter(|b| b.is_in_progress()).map(|b| b.total_items))
    }

    /// Non-hibernated categories.
    fn awake(&self) -> impl Iterator<Item = &'a Category> {
        self.categories.iter().filter(|c| !c.hibernated)
    }

    /// Non-hibernated categories that own something.
    fn active(&self) -> impl Iterator<Item = &'a Category> {
        self.categories.iter().filter(|c| c.is_active())
    }

    /// Sorted completion times of the laundry history.
    fn completion_times(&self) -> Vec<DateTime<Utc>> {
        let mut times: Vec<DateTime<Utc>> = self.history.iter().map(|h| h.completed_at).collect();
        times.sort();
        times
    }
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Gaps between consecutive timestamps, in fractional days.
fn intervals_in_days(times: &[DateTime<Utc>]) -> Vec<f64> {
    times
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 86_400.0)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `now + days`, saturating at the end of representable time.
fn project_date(now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    Duration::try_milliseconds((days * 86_400_000.0) as i64)
        .and_then(|offset| now.checked_add_signed(offset))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::types::Category;

    pub fn now() -> DateTime<Utc> {
        // a Monday
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    pub fn days_ago(days: i64) -> DateTime<Utc> {
        now() - chrono::Duration::days(days)
    }

    /// A category with explicit counts; total is their sum.
    pub fn category(name: &str, clean: i64, dirty: i64, in_laundry: i64) -> Category {
        let mut c = Category::new(name, "", clean + dirty + in_laundry);
        c.clean_count = clean;
        c.dirty_count = dirty;
        c.in_laundry_count = in_laundry;
        c.last_worn_date = Some(days_ago(1));
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::*;

    #[test]
    fn test_stats_helpers() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
        assert_eq!(std_dev(&[5.0, 5.0, 5.0]), 0.0);
        assert!((std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_intervals_in_days() {
        let times = [days_ago(10), days_ago(7), days_ago(1)];
        assert_eq!(intervals_in_days(&times), vec![3.0, 6.0]);
    }

    #[test]
    fn test_project_date_saturates() {
        assert_eq!(project_date(now(), 1.5), now() + chrono::Duration::hours(36));
        assert_eq!(project_date(now(), f64::INFINITY), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_active_excludes_hibernated_and_empty() {
        let mut coats = category("Coats", 3, 0, 0);
        coats.hibernated = true;
        let empty = Category::new("Scarves", "", 0);
        let socks = category("Socks", 4, 1, 0);
        let categories = vec![coats, empty, socks];

        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());
        let names: Vec<&str> = engine.active().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Socks"]);
        assert_eq!(engine.awake().count(), 2);
    }
}
