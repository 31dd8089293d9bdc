use crate::models::money::Money;
use crate::services::aggregator::AggregationConfig;
use crate::services::itinerary_generation_service::AllocationConfig;
use crate::services::pricing_service::PricingConfig;
use crate::services::query_builder::QueryConfig;
use crate::services::satellite_expansion::SatelliteConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Settings for every pipeline phase, built once and handed to `TripPlanner`.
#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub query: QueryConfig,
    pub aggregation: AggregationConfig,
    pub satellite: SatelliteConfig,
    pub pricing: PricingConfig,
    pub allocation: AllocationConfig,
}

impl PlannerConfig {
    /// Create config from environment variables (and a `.env` file if present)
    /// or use defaults. Values that fail to parse keep the default.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        let query = QueryConfig {
            default_theme: env::var("PLANNER_DEFAULT_THEME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.query.default_theme),
        };

        let aggregation = AggregationConfig {
            max_queries: parse_env("PLANNER_MAX_QUERIES", defaults.aggregation.max_queries),
            max_results_per_query: parse_env(
                "PLANNER_MAX_RESULTS_PER_QUERY",
                defaults.aggregation.max_results_per_query,
            ),
            max_results_per_mention: parse_env(
                "PLANNER_MAX_RESULTS_PER_MENTION",
                defaults.aggregation.max_results_per_mention,
            ),
            search_timeout: env::var("PLANNER_SEARCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.aggregation.search_timeout),
        };

        let satellite = SatelliteConfig {
            top_n: parse_env("PLANNER_SATELLITE_TOP_N", defaults.satellite.top_n),
            radius_m: parse_env("PLANNER_NEARBY_RADIUS_M", defaults.satellite.radius_m),
            min_rating: parse_env("PLANNER_NEARBY_MIN_RATING", defaults.satellite.min_rating),
            max_results: parse_env("PLANNER_NEARBY_MAX_RESULTS", defaults.satellite.max_results),
            search_timeout: env::var("PLANNER_NEARBY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.satellite.search_timeout),
        };

        // Multipliers are whole dollars per price tier
        let pricing = PricingConfig {
            meal_multiplier: env::var("PLANNER_MEAL_MULTIPLIER")
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|dollars| *dollars >= 0)
                .map(Money::from_dollars)
                .unwrap_or(defaults.pricing.meal_multiplier),
            activity_multiplier: env::var("PLANNER_ACTIVITY_MULTIPLIER")
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|dollars| *dollars >= 0)
                .map(Money::from_dollars)
                .unwrap_or(defaults.pricing.activity_multiplier),
        };

        let allocation = AllocationConfig {
            min_meals_per_day: parse_env(
                "PLANNER_MIN_MEALS_PER_DAY",
                defaults.allocation.min_meals_per_day,
            ),
            min_activities_per_day: parse_env(
                "PLANNER_MIN_ACTIVITIES_PER_DAY",
                defaults.allocation.min_activities_per_day,
            ),
            max_activities_per_day: parse_env(
                "PLANNER_MAX_ACTIVITIES_PER_DAY",
                defaults.allocation.max_activities_per_day,
            ),
        };

        Self {
            query,
            aggregation,
            satellite,
            pricing,
            allocation,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
