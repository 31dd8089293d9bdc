use crate::models::candidate::{Candidate, Category};
use crate::models::money::Money;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn is_consistent(&self) -> bool {
        self.start < self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledItem {
    /// e.g. "lunch", "dinner", "morning"
    pub slot: String,
    pub window: TimeWindow,
    pub candidate: Candidate,
}

/// A day that could not be filled to its quota from the candidate pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayShortfall {
    pub category: Category,
    pub required: usize,
    pub assigned: usize,
}

impl DayShortfall {
    pub fn missing(&self) -> usize {
        self.required.saturating_sub(self.assigned)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryDay {
    /// 1-based
    pub day: u32,
    pub meals: Vec<ScheduledItem>,
    pub activities: Vec<ScheduledItem>,
    pub summary: String,
    #[serde(default)]
    pub shortfalls: Vec<DayShortfall>,
}

impl ItineraryDay {
    pub fn subtotal(&self) -> Money {
        self.items().map(|item| item.candidate.cost).sum()
    }

    /// Meals and activities in start-time order
    pub fn items(&self) -> impl Iterator<Item = &ScheduledItem> {
        let mut all: Vec<&ScheduledItem> = self.meals.iter().chain(self.activities.iter()).collect();
        all.sort_by_key(|item| item.window.start);
        all.into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub ceiling: Money,
    pub total: Money,
    pub over_budget: bool,
    pub overrun_amount: Money,
    /// Swaps made to pull the total toward the ceiling
    pub substitutions: usize,
}

impl BudgetStatus {
    pub fn evaluate(ceiling: Money, total: Money, substitutions: usize) -> Self {
        let overrun_amount = total.saturating_sub(ceiling);
        Self {
            ceiling,
            total,
            over_budget: total > ceiling,
            overrun_amount,
            substitutions,
        }
    }
}

/// The request identity an itinerary was generated for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripOrigin {
    pub location: String,
    pub personality_code: String,
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<TripOrigin>,
    pub n_days: u32,
    pub days: Vec<ItineraryDay>,
    pub budget: BudgetStatus,
}

impl Itinerary {
    pub fn total_cost(&self) -> Money {
        self.days.iter().map(|d| d.subtotal()).sum()
    }

    pub fn has_shortfall(&self) -> bool {
        self.days.iter().any(|d| !d.shortfalls.is_empty())
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.days
            .iter()
            .flat_map(|d| d.meals.iter().chain(d.activities.iter()))
            .map(|item| &item.candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_time_window_overlap() {
        let lunch = TimeWindow::new(t(12, 0), t(13, 0));
        let morning = TimeWindow::new(t(9, 30), t(11, 30));
        let touching = TimeWindow::new(t(13, 0), t(15, 0));
        let inside = TimeWindow::new(t(12, 30), t(12, 45));

        assert!(!lunch.overlaps(&morning));
        assert!(!lunch.overlaps(&touching));
        assert!(lunch.overlaps(&inside));
        assert!(lunch.is_consistent());
        assert!(!TimeWindow::new(t(13, 0), t(12, 0)).is_consistent());
    }

    #[test]
    fn test_budget_status_overrun() {
        let status = BudgetStatus::evaluate(Money::from_dollars(50), Money::from_dollars(80), 0);
        assert!(status.over_budget);
        assert_eq!(status.overrun_amount, Money::from_dollars(30));

        let within = BudgetStatus::evaluate(Money::from_dollars(50), Money::from_dollars(50), 1);
        assert!(!within.over_budget);
        assert_eq!(within.overrun_amount, Money::ZERO);
    }
}
