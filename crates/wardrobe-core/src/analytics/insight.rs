//! Ranked insights for the dashboard.
//!
//! ## Generation Order
//! ```text
//! 1. bottleneck   every critical/warning stockout prediction
//! 2. dead stock   more than 5 stagnant items
//! 3. imbalance    max clean > 5 while min clean < 3
//! 4. routine      poor laundry cycle consistency
//! 5. panic day    soonest stockout within 3 days
//! ```
//! The list is then stably sorted by urgency, so equal-urgency insights
//! keep the order above.

use serde::Serialize;
use ts_rs::TS;

use super::{AnalyticsEngine, CycleConsistency, Severity, StockoutPrediction};
use crate::types::Category;

const STAGNANT_ALERT_ITEMS: i64 = 5;
const IMBALANCE_HIGH: i64 = 5;
const IMBALANCE_LOW: i64 = 3;
const PANIC_DAYS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Urgency {
    Critical,
    Warning,
    Insight,
}

impl Urgency {
    /// Sort rank, most urgent first.
    pub fn rank(self) -> u8 {
        match self {
            Urgency::Critical => 0,
            Urgency::Warning => 1,
            Urgency::Insight => 2,
        }
    }
}

impl From<Severity> for Urgency {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical => Urgency::Critical,
            Severity::Warning => Urgency::Warning,
            Severity::Normal => Urgency::Insight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InsightKind {
    Bottleneck,
    DeadStock,
    Imbalance,
    Routine,
    PanicDay,
}

/// One dashboard alert.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Insight {
    pub kind: InsightKind,
    pub urgency: Urgency,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl<'a> AnalyticsEngine<'a> {
    pub fn generate_insights(&self) -> Vec<Insight> {
        let predictions = self.get_all_stockout_predictions();
        let mut insights = Vec::new();

        insights.extend(
            predictions
                .iter()
                .filter(|p| p.severity != Severity::Normal)
                .map(bottleneck_insight),
        );
        insights.extend(self.dead_stock_insight());
        insights.extend(self.imbalance_insight());
        insights.extend(self.routine_insight());
        insights.extend(
            predictions
                .iter()
                .find(|p| p.days_until_stockout <= PANIC_DAYS)
                .map(panic_day_insight),
        );

        // sort_by_key is stable
        insights.sort_by_key(|i| i.urgency.rank());
        insights
    }

    fn dead_stock_insight(&self) -> Option<Insight> {
        let efficiency = self.calculate_inventory_efficiency();
        if efficiency.stagnant_items <= STAGNANT_ALERT_ITEMS {
            return None;
        }

        let mut message = format!(
            "{} of {} items are sitting idle ({}% in rotation).",
            efficiency.stagnant_items, efficiency.total_items, efficiency.efficiency_percent
        );
        if let Some(name) = &efficiency.worst_offender {
            message.push_str(&format!(" {name} is the biggest offender; consider donating a few."));
        }

        Some(Insight {
            kind: InsightKind::DeadStock,
            urgency: Urgency::Insight,
            title: "Idle closet space".to_string(),
            message,
            category_id: None,
        })
    }

    fn imbalance_insight(&self) -> Option<Insight> {
        let most = self.active().max_by_key(|c| c.clean_count)?;
        let least = self.active().min_by_key(|c| c.clean_count)?;
        if most.clean_count <= IMBALANCE_HIGH || least.clean_count >= IMBALANCE_LOW {
            return None;
        }

        Some(Insight {
            kind: InsightKind::Imbalance,
            urgency: Urgency::Warning,
            title: "Unbalanced wardrobe".to_string(),
            message: format!(
                "You have {} clean {} but only {} clean {}: that's {} outfit{} available.",
                most.clean_count,
                label(most),
                least.clean_count,
                label(least),
                least.clean_count,
                if least.clean_count == 1 { "" } else { "s" },
            ),
            category_id: Some(least.id.clone()),
        })
    }

    fn routine_insight(&self) -> Option<Insight> {
        let cycles = self.analyze_laundry_cycles();
        if cycles.consistency != CycleConsistency::Poor {
            return None;
        }
        Some(Insight {
            kind: InsightKind::Routine,
            urgency: Urgency::Insight,
            title: "Irregular laundry routine".to_string(),
            message: cycles.recommendation,
            category_id: None,
        })
    }
}

fn label(category: &Category) -> String {
    if category.emoji.is_empty() {
        category.name.clone()
    } else {
        format!("{} {}", category.emoji, category.name)
    }
}

fn weekday(prediction: &StockoutPrediction) -> String {
    prediction.stockout_date.format("%A").to_string()
}

fn bottleneck_insight(prediction: &StockoutPrediction) -> Insight {
    Insight {
        kind: InsightKind::Bottleneck,
        urgency: prediction.severity.into(),
        title: format!("Running low on {}", prediction.category_name),
        message: format!(
            "{} clean left at about {:.1} a day: runs out on {}.",
            prediction.clean_count,
            prediction.daily_consumption,
            weekday(prediction)
        ),
        category_id: Some(prediction.category_id.clone()),
    }
}

fn panic_day_insight(prediction: &StockoutPrediction) -> Insight {
    Insight {
        kind: InsightKind::PanicDay,
        urgency: Urgency::Warning,
        title: format!("Panic day: {}", weekday(prediction)),
        message: format!(
            "{} run out first, on {}. Start a load before then.",
            prediction.category_name,
            weekday(prediction)
        ),
        category_id: Some(prediction.category_id.clone()),
    }
}
