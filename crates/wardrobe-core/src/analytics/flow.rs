//! Flow Score: the 0-100 health metric.
//!
//! ```text
//! score = cleanRatio × 0.35 + balance × 0.25 − bottleneck × 0.25 + consistency × 0.15
//! ```

use serde::Serialize;
use ts_rs::TS;

use super::{intervals_in_days, mean, std_dev, AnalyticsEngine};

const CLEAN_WEIGHT: f64 = 0.35;
const BALANCE_WEIGHT: f64 = 0.25;
const BOTTLENECK_WEIGHT: f64 = 0.25;
const CONSISTENCY_WEIGHT: f64 = 0.15;

/// Penalty scale for a category below its safety threshold.
const BELOW_SAFETY_PENALTY: f64 = 30.0;
/// Flat penalty for a category with nothing clean.
const EMPTY_PENALTY: f64 = 20.0;

/// Consistency score while there is too little history to judge.
const NEUTRAL_CONSISTENCY: f64 = 50.0;

/// The Flow Score with its four components, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FlowBreakdown {
    pub score: u32,
    pub clean_ratio: f64,
    pub balance: f64,
    pub bottleneck_penalty: f64,
    pub consistency: f64,
}

impl<'a> AnalyticsEngine<'a> {
    /// The composite Flow Score, clamped to `[0, 100]`.
    ///
    /// Exactly 0 when no category is active.
    pub fn calculate_flow_score(&self) -> u32 {
        self.flow_breakdown().score
    }

    /// The Flow Score together with the components it was built from.
    pub fn flow_breakdown(&self) -> FlowBreakdown {
        if self.active().next().is_none() {
            return FlowBreakdown::default();
        }

        let clean_ratio = self.clean_ratio_component();
        let balance = self.balance_component();
        let bottleneck_penalty = self.bottleneck_component();
        let consistency = self.consistency_component();

        let raw = clean_ratio * CLEAN_WEIGHT + balance * BALANCE_WEIGHT - bottleneck_penalty * BOTTLENECK_WEIGHT
            + consistency * CONSISTENCY_WEIGHT;

        FlowBreakdown {
            score: raw.clamp(0.0, 100.0).round() as u32,
            clean_ratio,
            balance,
            bottleneck_penalty,
            consistency,
        }
    }

    fn clean_ratio_component(&self) -> f64 {
        let (clean, owned) = self.active().fold((0_i128, 0_i128), |(clean, owned), c| {
            (clean + i128::from(c.clean_count.max(0)), owned + i128::from(c.total_owned))
        });
        if owned <= 0 {
            return 0.0;
        }
        100.0 * clean as f64 / owned as f64
    }

    fn balance_component(&self) -> f64 {
        let ratios: Vec<f64> = self.active().map(|c| c.clean_ratio()).collect();
        if ratios.len() <= 1 {
            return 100.0;
        }
        100.0 - 200.0 * std_dev(&ratios)
    }

    fn bottleneck_component(&self) -> f64 {
        let penalty: f64 = self
            .active()
            .map(|c| {
                let mut p = 0.0;
                if c.safety_threshold > 0 && c.clean_count < c.safety_threshold {
                    let ratio = c.clean_count.max(0) as f64 / c.safety_threshold as f64;
                    p += BELOW_SAFETY_PENALTY * (1.0 - ratio);
                }
                if c.clean_count <= 0 && c.total_owned > 0 {
                    p += EMPTY_PENALTY;
                }
                p
            })
            .sum();
        penalty.min(100.0)
    }

    fn consistency_component(&self) -> f64 {
        match self.history.len() {
            0 => 0.0,
            1 | 2 => NEUTRAL_CONSISTENCY,
            _ => {
                let intervals: Vec<f64> = intervals_in_days(&self.completion_times())
                    .into_iter()
                    .filter(|d| *d > 0.0)
                    .collect();
                let avg = mean(&intervals);
                if avg <= 0.0 {
                    return NEUTRAL_CONSISTENCY;
                }
                let cv = std_dev(&intervals) / avg;
                (100.0 - 100.0 * cv).max(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::types::{Category, LaundryHistoryEntry};

    fn history(days_ago_list: &[i64]) -> Vec<LaundryHistoryEntry> {
        days_ago_list
            .iter()
            .map(|d| LaundryHistoryEntry::completed_at(days_ago(*d)))
            .collect()
    }

    #[test]
    fn test_empty_wardrobe_scores_zero() {
        let engine = AnalyticsEngine::new(&[], &[], &[]).as_of(now());
        assert_eq!(engine.calculate_flow_score(), 0);
        assert_eq!(engine.flow_breakdown(), FlowBreakdown::default());
    }

    #[test]
    fn test_only_hibernated_scores_zero() {
        let mut coats = category("Coats", 5, 0, 0);
        coats.hibernated = true;
        let categories = vec![coats];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());
        assert_eq!(engine.calculate_flow_score(), 0);
    }

    #[test]
    fn test_single_healthy_category() {
        let categories = vec![category("Socks", 10, 0, 0)];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());

        let flow = engine.flow_breakdown();
        assert_eq!(flow.clean_ratio, 100.0);
        assert_eq!(flow.balance, 100.0);
        assert_eq!(flow.bottleneck_penalty, 0.0);
        assert_eq!(flow.consistency, 0.0);
        // 35 + 25 - 0 + 0
        assert_eq!(flow.score, 60);
    }

    #[test]
    fn test_bottleneck_penalty() {
        // safety 2 for 10 owned, 1 clean: 30 * (1 - 1/2) = 15
        let low = category("Shirts", 1, 9, 0);
        // nothing clean: 30 + 20 = 50
        let empty = category("Socks", 0, 0, 10);
        let categories = vec![low, empty];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());

        assert_eq!(engine.flow_breakdown().bottleneck_penalty, 65.0);
    }

    #[test]
    fn test_bottleneck_penalty_is_capped() {
        let categories: Vec<Category> = (0..5).map(|i| category(&format!("C{i}"), 0, 4, 0)).collect();
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());
        assert_eq!(engine.flow_breakdown().bottleneck_penalty, 100.0);
        assert_eq!(engine.calculate_flow_score(), 0);
    }

    #[test]
    fn test_consistency_tiers() {
        let categories = vec![category("Socks", 10, 0, 0)];

        let two = history(&[7, 0]);
        let engine = AnalyticsEngine::new(&categories, &[], &two).as_of(now());
        assert_eq!(engine.flow_breakdown().consistency, 50.0);

        let regular = history(&[21, 14, 7, 0]);
        let engine = AnalyticsEngine::new(&categories, &[], &regular).as_of(now());
        assert_eq!(engine.flow_breakdown().consistency, 100.0);
        // 35 + 25 + 15
        assert_eq!(engine.calculate_flow_score(), 75);

        let erratic = history(&[40, 39, 10, 9]);
        let engine = AnalyticsEngine::new(&categories, &[], &erratic).as_of(now());
        assert!(engine.flow_breakdown().consistency < 50.0);
    }

    #[test]
    fn test_history_order_does_not_matter() {
        let categories = vec![category("Socks", 10, 0, 0)];
        let shuffled = history(&[0, 21, 7, 14]);
        let engine = AnalyticsEngine::new(&categories, &[], &shuffled).as_of(now());
        assert_eq!(engine.flow_breakdown().consistency, 100.0);
    }

    #[test]
    fn test_score_bounds_over_mixed_states() {
        for clean in 0..6 {
            for dirty in 0..4 {
                let categories = vec![category("A", clean, dirty, 1), category("B", 5 - clean, 0, dirty)];
                let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());
                assert!(engine.calculate_flow_score() <= 100);
            }
        }
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        let categories = vec![
            category("A", 6_000_000_000_000_000_000, 0, 0),
            category("B", 6_000_000_000_000_000_000, 0, 0),
        ];
        let engine = AnalyticsEngine::new(&categories, &[], &[]).as_of(now());

        let flow = engine.flow_breakdown();
        assert_eq!(flow.clean_ratio, 100.0);
        assert!(flow.score <= 100);
    }
}
