use crate::models::candidate::{Candidate, Category};
use crate::models::itinerary::Itinerary;
use crate::models::money::Money;

const DEFAULT_MEAL_MULTIPLIER: Money = Money::from_dollars(15);
const DEFAULT_ACTIVITY_MULTIPLIER: Money = Money::from_dollars(15);
const PREMIUM_RATING: f32 = 4.5;
const DISCOUNT_RATING: f32 = 3.0;
const PREMIUM_FACTOR: f64 = 1.1;
const DISCOUNT_FACTOR: f64 = 0.9;

#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Cost of one price tier for a meal
    pub meal_multiplier: Money,
    /// Cost of one price tier for an activity
    pub activity_multiplier: Money,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            meal_multiplier: DEFAULT_MEAL_MULTIPLIER,
            activity_multiplier: DEFAULT_ACTIVITY_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PricingService {
    config: PricingConfig,
}

impl PricingService {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// `price_level x category multiplier`, using the category's default tier
    /// when the source did not report one
    pub fn base_cost(&self, candidate: &Candidate) -> Money {
        let multiplier = match candidate.category {
            Category::Meal => self.config.meal_multiplier,
            Category::Activity => self.config.activity_multiplier,
        };
        multiplier * candidate.effective_price_level() as u32
    }

    /// Set `base_cost` and reset `cost` to it
    pub fn assign_base_cost(&self, candidate: &mut Candidate) {
        candidate.base_cost = self.base_cost(candidate);
        candidate.cost = candidate.base_cost;
    }

    /// Rating-adjusted cost, always recomputed from `base_cost`
    pub fn refined_cost(candidate: &Candidate) -> Money {
        match candidate.rating {
            Some(rating) if rating >= PREMIUM_RATING => {
                candidate.base_cost.scale_to_whole_dollars(PREMIUM_FACTOR)
            }
            Some(rating) if rating < DISCOUNT_RATING => {
                candidate.base_cost.scale_to_whole_dollars(DISCOUNT_FACTOR)
            }
            _ => candidate.base_cost,
        }
    }

    /// Apply the rating heuristic to every candidate. Idempotent: repeated
    /// application with unchanged ratings yields the same costs.
    pub fn estimate_costs(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        for candidate in candidates.iter_mut() {
            candidate.cost = Self::refined_cost(candidate);
        }
        candidates
    }

    /// Calculate total meal costs of an itinerary
    pub fn calculate_meal_cost(itinerary: &Itinerary) -> Money {
        itinerary
            .days
            .iter()
            .flat_map(|d| d.meals.iter())
            .map(|item| item.candidate.cost)
            .sum()
    }

    /// Calculate total activity costs of an itinerary
    pub fn calculate_activity_cost(itinerary: &Itinerary) -> Money {
        itinerary
            .days
            .iter()
            .flat_map(|d| d.activities.iter())
            .map(|item| item.candidate.cost)
            .sum()
    }

    pub fn calculate_total_cost(itinerary: &Itinerary) -> Money {
        Self::calculate_meal_cost(itinerary) + Self::calculate_activity_cost(itinerary)
    }
}
