use crate::error::Result;
use crate::models::candidate::{Candidate, Category};
use crate::models::itinerary::{
    BudgetStatus, DayShortfall, Itinerary, ItineraryDay, ScheduledItem, TimeWindow,
};
use crate::models::money::Money;
use crate::models::search::{validate_budget, validate_n_days};
use chrono::NaiveTime;
use log::{debug, info, warn};

const MIN_MEALS_PER_DAY: usize = 2;
const MIN_ACTIVITIES_PER_DAY: usize = 1;
const MAX_ACTIVITIES_PER_DAY: usize = 3;

/// Meal slots in fill order; a day with two meals gets lunch and dinner.
const MEAL_SLOTS: [(&str, (u32, u32), (u32, u32)); 3] = [
    ("lunch", (12, 0), (13, 0)),
    ("dinner", (18, 30), (19, 30)),
    ("breakfast", (8, 0), (9, 0)),
];

/// Two-hour daytime blocks that sit between the meal slots.
const ACTIVITY_SLOTS: [(&str, (u32, u32), (u32, u32)); 3] = [
    ("morning", (9, 30), (11, 30)),
    ("afternoon", (13, 30), (15, 30)),
    ("late afternoon", (16, 0), (18, 0)),
];

#[derive(Clone, Debug)]
pub struct AllocationConfig {
    pub min_meals_per_day: usize,
    pub min_activities_per_day: usize,
    /// Activities beyond the minimum are only added while the budget allows
    pub max_activities_per_day: usize,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            min_meals_per_day: MIN_MEALS_PER_DAY,
            min_activities_per_day: MIN_ACTIVITIES_PER_DAY,
            max_activities_per_day: MAX_ACTIVITIES_PER_DAY,
        }
    }
}

/// Indexes into the ranked meal/activity lists for one day
#[derive(Debug, Default, Clone)]
struct DayPlan {
    meals: Vec<usize>,
    activities: Vec<usize>,
}

/// Ranked candidates of one category plus which of them are placed
struct Ranked<'a> {
    items: Vec<&'a Candidate>,
    used: Vec<bool>,
}

impl<'a> Ranked<'a> {
    /// Highest score first; equal scores keep pool order
    fn new(candidates: &'a [Candidate], category: Category) -> Self {
        let mut items: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| c.category == category)
            .collect();
        items.sort_by(|a, b| b.score_or_zero().cmp(&a.score_or_zero()));
        let used = vec![false; items.len()];
        Self { items, used }
    }

    fn take_next(&mut self) -> Option<usize> {
        let idx = self.used.iter().position(|used| !used)?;
        self.used[idx] = true;
        Some(idx)
    }

    fn take_next_within(&mut self, limit: Money) -> Option<usize> {
        let idx = (0..self.items.len()).find(|&i| !self.used[i] && self.items[i].cost <= limit)?;
        self.used[idx] = true;
        Some(idx)
    }

    /// Cheapest unused candidate strictly cheaper than `than`
    fn cheapest_unused_below(&self, than: Money) -> Option<usize> {
        (0..self.items.len())
            .filter(|&i| !self.used[i] && self.items[i].cost < than)
            .min_by_key(|&i| self.items[i].cost)
    }

    fn cost(&self, idx: usize) -> Money {
        self.items[idx].cost
    }
}

/// A possible swap of a placed candidate for a cheaper unused one
struct Swap {
    category: Category,
    day: usize,
    position: usize,
    replacement: usize,
    saving: Money,
    replaced_cost: Money,
}

pub struct ItineraryGenerator {
    config: AllocationConfig,
}

impl ItineraryGenerator {
    pub fn new() -> Self {
        Self::with_config(AllocationConfig::default())
    }

    pub fn with_config(mut config: AllocationConfig) -> Self {
        if config.min_meals_per_day > MEAL_SLOTS.len() {
            warn!(
                "min_meals_per_day {} exceeds the {} meal slots; capping",
                config.min_meals_per_day,
                MEAL_SLOTS.len()
            );
            config.min_meals_per_day = MEAL_SLOTS.len();
        }
        config.max_activities_per_day = config.max_activities_per_day.min(ACTIVITY_SLOTS.len());
        config.min_activities_per_day = config
            .min_activities_per_day
            .min(config.max_activities_per_day);

        Self { config }
    }

    /// Distribute a scored candidate pool over `n_days` days.
    ///
    /// The assignment is recomputed from scratch; `day_hint` is ignored.
    /// Shortfalls and budget overruns are reported on the result, never as
    /// errors. Only contract violations (`n_days == 0`, negative budget) fail.
    pub fn allocate(
        &self,
        candidates: &[Candidate],
        n_days: u32,
        budget_ceiling: Money,
    ) -> Result<Itinerary> {
        validate_n_days(n_days)?;
        validate_budget(budget_ceiling)?;

        let mut meals = Ranked::new(candidates, Category::Meal);
        let mut activities = Ranked::new(candidates, Category::Activity);
        let mut plans = vec![DayPlan::default(); n_days as usize];

        // Quotas first: meals two per day in rank order, then activities
        for plan in plans.iter_mut() {
            for _ in 0..self.config.min_meals_per_day {
                if let Some(idx) = meals.take_next() {
                    plan.meals.push(idx);
                }
            }
        }
        for plan in plans.iter_mut() {
            for _ in 0..self.config.min_activities_per_day {
                if let Some(idx) = activities.take_next() {
                    plan.activities.push(idx);
                }
            }
        }

        let mut total = plan_total(&plans, &meals, &activities);
        let mut substitutions = 0;

        while total > budget_ceiling {
            let Some(swap) = find_swap(&plans, &meals, &activities) else {
                debug!("No cheaper substitutes left; total {} over {}", total, budget_ceiling);
                break;
            };

            let ranked = match swap.category {
                Category::Meal => &mut meals,
                Category::Activity => &mut activities,
            };
            let slot = match swap.category {
                Category::Meal => &mut plans[swap.day].meals[swap.position],
                Category::Activity => &mut plans[swap.day].activities[swap.position],
            };
            ranked.used[*slot] = false;
            ranked.used[swap.replacement] = true;
            *slot = swap.replacement;

            debug!(
                "Day {}: swapped a {} {} for one costing {}",
                swap.day + 1,
                swap.replaced_cost,
                swap.category.as_str(),
                swap.replaced_cost - swap.saving
            );
            total -= swap.saving;
            substitutions += 1;
        }

        // Extra activities round-robin, only while they fit under the ceiling
        let mut placed = true;
        while placed {
            placed = false;
            for plan in plans.iter_mut() {
                if plan.activities.len() >= self.config.max_activities_per_day {
                    continue;
                }
                let headroom = budget_ceiling - total;
                if let Some(idx) = activities.take_next_within(headroom) {
                    total += activities.cost(idx);
                    plan.activities.push(idx);
                    placed = true;
                }
            }
        }

        let days: Vec<ItineraryDay> = plans
            .iter()
            .enumerate()
            .map(|(i, plan)| self.build_day(i as u32 + 1, plan, &meals, &activities))
            .collect();

        let budget = BudgetStatus::evaluate(budget_ceiling, total, substitutions);
        if budget.over_budget {
            warn!(
                "Itinerary over budget by {} ({} against ceiling {}) after {} substitutions",
                budget.overrun_amount, budget.total, budget.ceiling, substitutions
            );
        }
        info!(
            "Allocated {} days from {} meals and {} activities, total {}",
            n_days,
            meals.items.len(),
            activities.items.len(),
            total
        );

        Ok(Itinerary {
            origin: None,
            n_days,
            days,
            budget,
        })
    }

    fn build_day(
        &self,
        day: u32,
        plan: &DayPlan,
        meals: &Ranked,
        activities: &Ranked,
    ) -> ItineraryDay {
        let mut meal_items: Vec<ScheduledItem> = plan
            .meals
            .iter()
            .zip(MEAL_SLOTS.iter())
            .map(|(&idx, slot)| schedule(meals.items[idx], slot))
            .collect();
        meal_items.sort_by_key(|item| item.window.start);

        let activity_items: Vec<ScheduledItem> = plan
            .activities
            .iter()
            .zip(ACTIVITY_SLOTS.iter())
            .map(|(&idx, slot)| schedule(activities.items[idx], slot))
            .collect();

        let mut shortfalls = Vec::new();
        if meal_items.len() < self.config.min_meals_per_day {
            shortfalls.push(DayShortfall {
                category: Category::Meal,
                required: self.config.min_meals_per_day,
                assigned: meal_items.len(),
            });
        }
        if activity_items.len() < self.config.min_activities_per_day {
            shortfalls.push(DayShortfall {
                category: Category::Activity,
                required: self.config.min_activities_per_day,
                assigned: activity_items.len(),
            });
        }
        for shortfall in &shortfalls {
            warn!(
                "Day {} short of {} {} entries ({} of {})",
                day,
                shortfall.missing(),
                shortfall.category.as_str(),
                shortfall.assigned,
                shortfall.required
            );
        }

        let mut itinerary_day = ItineraryDay {
            day,
            meals: meal_items,
            activities: activity_items,
            summary: String::new(),
            shortfalls,
        };
        itinerary_day.summary = summarize_day(&itinerary_day);
        itinerary_day
    }
}

impl Default for ItineraryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn plan_total(plans: &[DayPlan], meals: &Ranked, activities: &Ranked) -> Money {
    plans
        .iter()
        .map(|plan| {
            plan.meals.iter().map(|&i| meals.cost(i)).sum::<Money>()
                + plan.activities.iter().map(|&i| activities.cost(i)).sum::<Money>()
        })
        .sum()
}

/// The placed candidate with the highest cost that has a cheaper unused
/// substitute of the same category, paired with the cheapest such substitute.
fn find_swap<'a>(
    plans: &[DayPlan],
    meals: &'a Ranked<'a>,
    activities: &'a Ranked<'a>,
) -> Option<Swap> {
    let mut best: Option<Swap> = None;

    for (day, plan) in plans.iter().enumerate() {
        let placed = plan
            .meals
            .iter()
            .enumerate()
            .map(|(pos, &idx)| (Category::Meal, pos, idx, meals))
            .chain(
                plan.activities
                    .iter()
                    .enumerate()
                    .map(|(pos, &idx)| (Category::Activity, pos, idx, activities)),
            );

        for (category, position, idx, ranked) in placed {
            let cost = ranked.cost(idx);
            if best.as_ref().map_or(false, |b| b.replaced_cost >= cost) {
                continue;
            }
            if let Some(replacement) = ranked.cheapest_unused_below(cost) {
                best = Some(Swap {
                    category,
                    day,
                    position,
                    replacement,
                    saving: cost - ranked.cost(replacement),
                    replaced_cost: cost,
                });
            }
        }
    }

    best
}

fn schedule(candidate: &Candidate, slot: &(&str, (u32, u32), (u32, u32))) -> ScheduledItem {
    let (label, (start_h, start_m), (end_h, end_m)) = *slot;
    ScheduledItem {
        slot: label.to_string(),
        window: TimeWindow::new(time(start_h, start_m), time(end_h, end_m)),
        candidate: candidate.clone(),
    }
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// One-line summary naming the day's places in time order
fn summarize_day(day: &ItineraryDay) -> String {
    let parts: Vec<String> = day
        .items()
        .map(|item| match item.candidate.category {
            Category::Meal => format!("{} at {}", item.slot, item.candidate.name),
            Category::Activity => format!("{} visit to {}", item.slot, item.candidate.name),
        })
        .collect();

    if parts.is_empty() {
        format!("Day {}: no places available from the candidate pool.", day.day)
    } else {
        format!("Day {}: {}.", day.day, parts.join(", "))
    }
}
