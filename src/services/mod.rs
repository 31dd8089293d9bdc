pub mod aggregator;
pub mod google_places_service;
pub mod itinerary_generation_service;
pub mod personality_scoring;
pub mod place_source;
pub mod pricing_service;
pub mod query_builder;
pub mod satellite_expansion;
pub mod trip_planner;
