pub mod candidate;
pub mod itinerary;
pub mod money;
pub mod place;
pub mod search;

pub use candidate::{Candidate, CandidatePool, Category, SourceTag};
pub use itinerary::{
    BudgetStatus, DayShortfall, Itinerary, ItineraryDay, ScheduledItem, TimeWindow, TripOrigin,
};
pub use money::Money;
pub use place::{Coordinates, RawPlaceRecord};
pub use search::TripRequest;
