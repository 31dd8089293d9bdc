use crate::config::PlannerConfig;
use crate::error::Result;
use crate::models::candidate::{Candidate, CandidatePool, SourceTag};
use crate::models::itinerary::{Itinerary, TripOrigin};
use crate::models::search::TripRequest;
use crate::services::aggregator::{assign_day_hints, CandidateAggregator};
use crate::services::google_places_service::GooglePlacesClient;
use crate::services::itinerary_generation_service::ItineraryGenerator;
use crate::services::personality_scoring::{PersonalityProfile, PersonalityScorer};
use crate::services::place_source::{PlaceSource, ProximitySource};
use crate::services::pricing_service::PricingService;
use crate::services::query_builder::QueryBuilder;
use crate::services::satellite_expansion::{CuisineTable, SatelliteExpander};
use log::{debug, info};
use std::sync::Arc;

/// Runs the planning pipeline: gather and score candidates, refine their
/// costs, then lay them out over the requested days.
pub struct TripPlanner {
    query_builder: QueryBuilder,
    aggregator: CandidateAggregator,
    scorer: PersonalityScorer,
    expander: SatelliteExpander,
    generator: ItineraryGenerator,
}

impl TripPlanner {
    pub fn new(
        places: Arc<dyn PlaceSource>,
        nearby: Arc<dyn ProximitySource>,
        config: PlannerConfig,
    ) -> Self {
        Self::with_cuisine_table(places, nearby, config, CuisineTable::default())
    }

    pub fn with_cuisine_table(
        places: Arc<dyn PlaceSource>,
        nearby: Arc<dyn ProximitySource>,
        config: PlannerConfig,
        cuisine: CuisineTable,
    ) -> Self {
        let pricing = PricingService::new(config.pricing);

        Self {
            query_builder: QueryBuilder::with_config(config.query),
            aggregator: CandidateAggregator::with_config(
                places,
                pricing.clone(),
                config.aggregation,
            ),
            scorer: PersonalityScorer::new(),
            expander: SatelliteExpander::with_config(nearby, pricing, config.satellite, cuisine),
            generator: ItineraryGenerator::with_config(config.allocation),
        }
    }

    /// Planner backed by the Google Places API for both search capabilities
    pub fn with_google_places(client: GooglePlacesClient, config: PlannerConfig) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client, config)
    }

    /// Build the scored, deduplicated candidate pool for a request.
    ///
    /// Text-search results are admitted before web-mention results, so an id
    /// found by both keeps its API record. Nearby restaurants around the best
    /// activities are merged last and never replace an existing entry.
    pub async fn gather_candidates(&self, request: &TripRequest) -> Result<Vec<Candidate>> {
        request.validate()?;

        let queries = self.query_builder.build_queries(
            &request.location,
            &request.theme,
            &request.personality_code,
            &request.inclusion_hints,
        );

        let (api_outcomes, web_outcomes) = futures::join!(
            self.aggregator.run_queries(&queries),
            self.aggregator
                .run_mention_queries(&request.mention_names, &request.location),
        );

        let mut pool = CandidatePool::new();
        self.aggregator.merge(api_outcomes, SourceTag::Api, &mut pool);
        self.aggregator.merge(web_outcomes, SourceTag::Web, &mut pool);
        assign_day_hints(&mut pool, request.n_days);

        let profile = PersonalityProfile::from_code(&request.personality_code);
        self.scorer.score_all(pool.iter_mut(), &profile);

        self.expander
            .expand(&mut pool, &request.location, &request.personality_code)
            .await;

        info!(
            "Gathered {} candidates for {} ({})",
            pool.len(),
            request.location,
            request.personality_code
        );
        Ok(pool.into_vec())
    }

    pub fn estimate_costs(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        PricingService::estimate_costs(candidates)
    }

    pub fn allocate(&self, request: &TripRequest, candidates: &[Candidate]) -> Result<Itinerary> {
        let mut itinerary =
            self.generator
                .allocate(candidates, request.n_days, request.budget_ceiling)?;
        itinerary.origin = Some(TripOrigin {
            location: request.location.clone(),
            personality_code: request.personality_code.clone(),
            theme: request.theme.clone(),
        });
        debug!(
            "Itinerary for {}: meals {}, activities {}, total {}",
            request.location,
            PricingService::calculate_meal_cost(&itinerary),
            PricingService::calculate_activity_cost(&itinerary),
            PricingService::calculate_total_cost(&itinerary)
        );
        Ok(itinerary)
    }

    /// Gather, price and allocate in one call
    pub async fn plan(&self, request: &TripRequest) -> Result<Itinerary> {
        let candidates = self.gather_candidates(request).await?;
        let candidates = self.estimate_costs(candidates);
        self.allocate(request, &candidates)
    }
}
