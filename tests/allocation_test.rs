mod common;

use common::{init_logger, place};
use itinerary_planner::models::SourceTag;
use itinerary_planner::services::itinerary_generation_service::{AllocationConfig, ItineraryGenerator};
use itinerary_planner::services::pricing_service::PricingService;
use itinerary_planner::{Candidate, Category, Money};

fn candidate(id: &str, category: Category, score: u8, cost_dollars: i64) -> Candidate {
    let mut c = Candidate::from_record(place(id, &format!("Place {}", id), Some(4.0), &[]), category, SourceTag::Api, "q")
        .expect("record has an id");
    c.score = Some(score);
    c.base_cost = Money::from_dollars(cost_dollars);
    c.cost = c.base_cost;
    c
}

fn pool(meals: usize, activities: usize, cost_dollars: i64) -> Vec<Candidate> {
    let meals = (0..meals).map(|i| candidate(&format!("m{}", i), Category::Meal, 80, cost_dollars));
    let activities = (0..activities).map(|i| candidate(&format!("a{}", i), Category::Activity, 80, cost_dollars));
    meals.chain(activities).collect()
}

#[test]
fn test_scenario_c_unrated_meal_priced_by_tier() {
    let mut record = place("m1", "Corner Noodles", None, &["restaurant"]);
    record.price_level = Some(2);
    let mut meal = Candidate::from_record(record, Category::Meal, SourceTag::Api, "q").unwrap();

    PricingService::default().assign_base_cost(&mut meal);
    assert_eq!(meal.base_cost, Money::from_dollars(30));

    let refined = PricingService::estimate_costs(vec![meal]);
    assert_eq!(refined[0].cost, Money::from_dollars(30));
    assert_eq!(refined[0].cost.to_string(), "$30");
}

#[test]
fn test_scenario_d_overrun_reported_not_hidden() {
    init_logger();
    let candidates = vec![
        candidate("m1", Category::Meal, 90, 25),
        candidate("m2", Category::Meal, 85, 25),
        candidate("a1", Category::Activity, 90, 30),
    ];

    let itinerary = ItineraryGenerator::new()
        .allocate(&candidates, 1, Money::from_dollars(50))
        .unwrap();

    assert_eq!(itinerary.days.len(), 1);
    assert_eq!(itinerary.days[0].meals.len(), 2);
    assert_eq!(itinerary.days[0].activities.len(), 1);
    assert!(itinerary.budget.over_budget);
    assert_eq!(itinerary.budget.total, Money::from_dollars(80));
    assert_eq!(itinerary.budget.overrun_amount, Money::from_dollars(30));
    assert_eq!(itinerary.budget.substitutions, 0);
}

#[test]
fn test_each_day_meets_quota_when_pool_allows() {
    let candidates = pool(6, 9, 10);
    let itinerary = ItineraryGenerator::new()
        .allocate(&candidates, 3, Money::from_dollars(1000))
        .unwrap();

    assert_eq!(itinerary.days.len(), 3);
    assert!(!itinerary.has_shortfall());
    for (i, day) in itinerary.days.iter().enumerate() {
        assert_eq!(day.day, i as u32 + 1);
        assert_eq!(day.meals.len(), 2);
        assert!((1..=3).contains(&day.activities.len()));
    }
    assert_eq!(itinerary.candidates().count(), 15);
}

#[test]
fn test_short_pool_flags_days_instead_of_failing() {
    let candidates = pool(3, 1, 10);
    let itinerary = ItineraryGenerator::new()
        .allocate(&candidates, 2, Money::from_dollars(1000))
        .unwrap();

    let day2 = &itinerary.days[1];
    assert_eq!(day2.meals.len(), 1);
    assert!(day2.activities.is_empty());
    assert_eq!(day2.shortfalls.len(), 2);

    let meal_gap = day2.shortfalls.iter().find(|s| s.category == Category::Meal).unwrap();
    assert_eq!(meal_gap.missing(), 1);
    assert!(itinerary.days[0].shortfalls.is_empty());
}

#[test]
fn test_windows_never_overlap_within_a_day() {
    let candidates = pool(4, 6, 5);
    let itinerary = ItineraryGenerator::new()
        .allocate(&candidates, 2, Money::from_dollars(1000))
        .unwrap();

    for day in &itinerary.days {
        let items: Vec<_> = day.items().collect();
        for pair in items.windows(2) {
            assert!(pair[0].window.end <= pair[1].window.start);
        }
        let slots: Vec<&str> = day.meals.iter().map(|m| m.slot.as_str()).collect();
        assert_eq!(slots, vec!["lunch", "dinner"]);
    }
}

#[test]
fn test_highest_scores_placed_first() {
    let candidates = vec![
        candidate("m_low", Category::Meal, 60, 10),
        candidate("m_high", Category::Meal, 95, 10),
        candidate("m_mid", Category::Meal, 75, 10),
        candidate("a_low", Category::Activity, 60, 10),
        candidate("a_high", Category::Activity, 99, 10),
    ];

    let config = AllocationConfig {
        max_activities_per_day: 1,
        ..AllocationConfig::default()
    };
    let itinerary = ItineraryGenerator::with_config(config)
        .allocate(&candidates, 1, Money::from_dollars(1000))
        .unwrap();

    let day = &itinerary.days[0];
    let meal_ids: Vec<&str> = day.meals.iter().map(|m| m.candidate.external_id.as_str()).collect();
    assert!(meal_ids.contains(&"m_high") && meal_ids.contains(&"m_mid"));
    assert_eq!(day.activities[0].candidate.external_id, "a_high");
}

#[test]
fn test_budget_pulled_under_ceiling_by_substitution() {
    init_logger();
    let candidates = vec![
        candidate("m1", Category::Meal, 95, 45),
        candidate("m2", Category::Meal, 90, 15),
        candidate("m3", Category::Meal, 60, 15),
        candidate("a1", Category::Activity, 95, 60),
        candidate("a2", Category::Activity, 70, 20),
    ];

    let itinerary = ItineraryGenerator::new()
        .allocate(&candidates, 1, Money::from_dollars(60))
        .unwrap();

    assert!(!itinerary.budget.over_budget);
    assert_eq!(itinerary.budget.substitutions, 2);
    assert_eq!(itinerary.budget.total, Money::from_dollars(50));
    assert_eq!(itinerary.days[0].activities[0].candidate.external_id, "a2");
}

#[test]
fn test_cost_breakdown_matches_itinerary_total() {
    let candidates = vec![
        candidate("m1", Category::Meal, 90, 15),
        candidate("m2", Category::Meal, 85, 25),
        candidate("m3", Category::Meal, 80, 10),
        candidate("m4", Category::Meal, 75, 20),
        candidate("a1", Category::Activity, 90, 30),
        candidate("a2", Category::Activity, 80, 45),
        candidate("a3", Category::Activity, 70, 33),
    ];

    let itinerary = ItineraryGenerator::new()
        .allocate(&candidates, 2, Money::from_dollars(500))
        .unwrap();

    let meals = PricingService::calculate_meal_cost(&itinerary);
    let activities = PricingService::calculate_activity_cost(&itinerary);
    assert_eq!(meals, Money::from_dollars(70));
    assert_eq!(activities, Money::from_dollars(108));
    assert_eq!(PricingService::calculate_total_cost(&itinerary), meals + activities);
    assert_eq!(PricingService::calculate_total_cost(&itinerary), itinerary.total_cost());
    assert_eq!(itinerary.budget.total, itinerary.total_cost());
}
