//! Laundry cycle statistics.
//!
//! Only gaps strictly between 0 and 30 days count as rhythm data; longer
//! gaps are holidays or resets.

use serde::Serialize;
use ts_rs::TS;

use super::{intervals_in_days, mean, AnalyticsEngine};

const MAX_RHYTHM_DAYS: f64 = 30.0;
const EXCELLENT_RANGE: f64 = 3.0;
const GOOD_RANGE: f64 = 6.0;

const MIN_OPTIMAL_INTERVAL: f64 = 3.0;
const MAX_OPTIMAL_INTERVAL: f64 = 14.0;
const DEFAULT_OPTIMAL_INTERVAL: u32 = 7;

/// How regular the laundry routine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum CycleConsistency {
    /// Fewer than two usable intervals.
    Unknown,
    Excellent,
    Good,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CycleAnalysis {
    pub consistency: CycleConsistency,
    pub avg_interval: Option<f64>,
    pub min_interval: Option<f64>,
    pub max_interval: Option<f64>,
    pub range: Option<f64>,
    pub recommendation: String,
    /// Suggested days between laundry runs, within `[3, 14]`.
    pub optimal_interval: u32,
}

impl<'a> AnalyticsEngine<'a> {
    pub fn analyze_laundry_cycles(&self) -> CycleAnalysis {
        let optimal_interval = self.optimal_interval();
        let intervals: Vec<f64> = intervals_in_days(&self.completion_times())
            .into_iter()
            .filter(|d| *d > 0.0 && *d < MAX_RHYTHM_DAYS)
            .collect();

        if intervals.len() < 2 {
            return CycleAnalysis {
                consistency: CycleConsistency::Unknown,
                avg_interval: None,
                min_interval: None,
                max_interval: None,
                range: None,
                recommendation: "Complete a few more laundry runs to discover your rhythm.".to_string(),
                optimal_interval,
            };
        }

        let avg = mean(&intervals);
        let min = intervals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = intervals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        let (consistency, recommendation) = if range <= EXCELLENT_RANGE {
            (
                CycleConsistency::Excellent,
                format!("Steady rhythm: laundry every {avg:.1} days, varying by only {range:.1}. Keep it up."),
            )
        } else if range <= GOOD_RANGE {
            (
                CycleConsistency::Good,
                format!(
                    "Mostly regular: about every {avg:.1} days with swings of {range:.1}. \
                     Aim for every {optimal_interval} days."
                ),
            )
        } else {
            (
                CycleConsistency::Poor,
                format!(
                    "Laundry days swing between {min:.1} and {max:.1} days apart. \
                     Try a fixed routine every {optimal_interval} days."
                ),
            )
        };

        CycleAnalysis {
            consistency,
            avg_interval: Some(avg),
            min_interval: Some(min),
            max_interval: Some(max),
            range: Some(range),
            recommendation,
            optimal_interval,
        }
    }

    /// Smallest clean buffer (in days above safety) across active
    /// categories, clamped and floored.
    fn optimal_interval(&self) -> u32 {
        let buffer = self
            .active()
            .filter_map(|c| {
                let rate = self.daily_consumption(c);
                (rate > 0.0).then(|| c.clean_count.saturating_sub(c.safety_threshold) as f64 / rate)
            })
            .fold(None, |acc: Option<f64>, days| Some(acc.map_or(days, |m| m.min(days))));

        match buffer {
            Some(days) => days.clamp(MIN_OPTIMAL_INTERVAL, MAX_OPTIMAL_INTERVAL).floor() as u32,
            None => DEFAULT_OPTIMAL_INTERVAL,
        }
    }
}
