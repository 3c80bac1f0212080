//! Linear burn-down of clean stock.
//!
//! Future laundry completions are ignored: the projection shows how long
//! clean stock lasts if nothing is washed.

use chrono::Duration;
use serde::Serialize;
use ts_rs::TS;

use super::AnalyticsEngine;

/// Categories plotted on the chart.
const MAX_SERIES: usize = 3;

/// Longest projection the chart supports.
pub const MAX_DAYS_AHEAD: u32 = 90;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BurnDownSeries {
    pub category_id: String,
    pub name: String,
    pub emoji: String,
    /// Projected clean items for each label.
    pub values: Vec<f64>,
}

/// Chart data: one label per day and one series per category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BurnDownData {
    pub labels: Vec<String>,
    pub series: Vec<BurnDownSeries>,
}

impl<'a> AnalyticsEngine<'a> {
    /// Projects `max(0, clean − rate × day)` for day `0..=days_ahead`.
    ///
    /// `days_ahead` is capped at [`MAX_DAYS_AHEAD`].
    pub fn generate_burn_down_data(&self, days_ahead: u32) -> BurnDownData {
        let days_ahead = days_ahead.min(MAX_DAYS_AHEAD);

        let labels = (0..=days_ahead)
            .map(|day| {
                if day == 0 {
                    "Today".to_string()
                } else {
                    (self.now + Duration::days(i64::from(day))).format("%a").to_string()
                }
            })
            .collect();

        let series = self
            .awake()
            .take(MAX_SERIES)
            .map(|c| {
                let rate = self.daily_consumption(c);
                let clean = c.clean_count.max(0) as f64;
                BurnDownSeries {
                    category_id: c.id.clone(),
                    name: c.name.clone(),
                    emoji: c.emoji.clone(),
                    values: (0..=days_ahead)
                        .map(|day| (clean - rate * f64::from(day)).max(0.0))
                        .collect(),
                }
            })
            .collect();

        BurnDownData { labels, series }
    }
}
