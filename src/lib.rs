//! Trip itinerary planning.
//!
//! Candidate places are gathered from a text-search source (theme queries and
//! web-mentioned place names), deduplicated by external id, scored against a
//! four-letter personality code, and expanded with highly rated restaurants
//! near the best activities. Costs are refined from ratings and the pool is
//! then laid out into days with fixed meal and activity time slots under a
//! budget ceiling.
//!
//! ```no_run
//! use itinerary_planner::{GooglePlacesClient, Money, PlannerConfig, TripPlanner, TripRequest};
//!
//! # async fn run() -> itinerary_planner::Result<()> {
//! let planner = TripPlanner::with_google_places(
//!     GooglePlacesClient::from_env()?,
//!     PlannerConfig::from_env(),
//! );
//! let request = TripRequest::new("Tokyo", "INFJ", "anime", 3, Money::from_dollars(400));
//! let itinerary = planner.plan(&request).await?;
//! for day in &itinerary.days {
//!     println!("{}", day.summary);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::PlannerConfig;
pub use error::{PlannerError, Result, SourceError};
pub use models::{
    BudgetStatus, Candidate, Category, Itinerary, ItineraryDay, Money, RawPlaceRecord, TripRequest,
};
pub use services::google_places_service::{GooglePlacesClient, PlacesApiConfig};
pub use services::place_source::{NearbyQuery, PlaceSource, ProximitySource};
pub use services::trip_planner::TripPlanner;
