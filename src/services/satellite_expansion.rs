//! Satellite expansion
//!
//! After scoring, the best activities with known coordinates become anchors
//! for nearby restaurant searches. The restaurants found are scored with the
//! dining variant of the personality scorer and merged into the pool, so days
//! do not end up as activities only.

use crate::models::candidate::{Candidate, CandidatePool, Category, SourceTag};
use crate::models::place::{Coordinates, RawPlaceRecord};
use crate::services::personality_scoring::{PersonalityProfile, PersonalityScorer};
use crate::services::place_source::{with_timeout, NearbyQuery, ProximitySource};
use crate::services::pricing_service::PricingService;
use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

const TOP_N_ANCHORS: usize = 4;
const NEARBY_RADIUS_M: u32 = 1000;
const NEARBY_MIN_RATING: f32 = 4.0;
const NEARBY_MAX_RESULTS: usize = 3;
const NEARBY_TIMEOUT_SECS: u64 = 10;
const RESTAURANT_TYPE: &str = "restaurant";

#[derive(Debug, Clone)]
pub struct SatelliteConfig {
    pub top_n: usize,
    pub radius_m: u32,
    pub min_rating: f32,
    /// Restaurants kept per anchor
    pub max_results: usize,
    pub search_timeout: Duration,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            top_n: TOP_N_ANCHORS,
            radius_m: NEARBY_RADIUS_M,
            min_rating: NEARBY_MIN_RATING,
            max_results: NEARBY_MAX_RESULTS,
            search_timeout: Duration::from_secs(NEARBY_TIMEOUT_SECS),
        }
    }
}

/// City name to cuisine search keywords.
#[derive(Debug, Clone)]
pub struct CuisineTable {
    entries: HashMap<String, Vec<String>>,
    fallback: Vec<String>,
}

impl CuisineTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: vec!["local".to_string(), "traditional".to_string()],
        }
    }

    pub fn insert(&mut self, city: &str, keywords: &[&str]) {
        self.entries.insert(
            city.trim().to_lowercase(),
            keywords.iter().map(|k| k.to_string()).collect(),
        );
    }

    /// Keywords for the city part of `location` ("Tokyo, Japan" -> "tokyo")
    pub fn keywords_for(&self, location: &str) -> &[String] {
        let city = location
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        self.entries
            .get(&city)
            .map(Vec::as_slice)
            .unwrap_or(self.fallback.as_slice())
    }
}

impl Default for CuisineTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("tokyo", &["sushi", "ramen", "izakaya"]);
        table.insert("kyoto", &["kaiseki", "tofu", "matcha"]);
        table.insert("osaka", &["takoyaki", "okonomiyaki", "kushikatsu"]);
        table.insert("seoul", &["korean bbq", "bibimbap", "tteokbokki"]);
        table.insert("bangkok", &["thai street food", "pad thai", "tom yum"]);
        table.insert("paris", &["bistro", "brasserie", "patisserie"]);
        table.insert("rome", &["trattoria", "pizza", "gelato"]);
        table.insert("london", &["pub", "fish and chips", "curry"]);
        table.insert("new york", &["pizza", "deli", "bagel"]);
        table.insert("los angeles", &["tacos", "korean bbq", "sushi"]);
        table.insert("mexico city", &["tacos", "mole", "mezcal"]);
        table
    }
}

pub struct SatelliteExpander {
    source: Arc<dyn ProximitySource>,
    config: SatelliteConfig,
    cuisine: CuisineTable,
    scorer: PersonalityScorer,
    pricing: PricingService,
}

impl SatelliteExpander {
    pub fn new(source: Arc<dyn ProximitySource>, pricing: PricingService) -> Self {
        Self::with_config(source, pricing, SatelliteConfig::default(), CuisineTable::default())
    }

    pub fn with_config(
        source: Arc<dyn ProximitySource>,
        pricing: PricingService,
        config: SatelliteConfig,
        cuisine: CuisineTable,
    ) -> Self {
        Self {
            source,
            config,
            cuisine,
            scorer: PersonalityScorer::new(),
            pricing,
        }
    }

    pub fn with_scorer(mut self, scorer: PersonalityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// The `top_n` highest-scoring activities that have coordinates.
    /// Ties keep pool order.
    pub fn select_anchors<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
        let mut anchors: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| c.category == Category::Activity && c.coordinates.is_some())
            .collect();
        anchors.sort_by(|a, b| b.score_or_zero().cmp(&a.score_or_zero()));
        anchors.truncate(self.config.top_n);
        anchors
    }

    /// Find highly rated restaurants around `coordinates`.
    ///
    /// One search per cuisine keyword for the location, all in flight at once.
    /// Results are merged in keyword order, unrated or low-rated places and
    /// places without an id are dropped, and at most `max_results` scored
    /// meal candidates are returned.
    pub async fn search_nearby(
        &self,
        coordinates: Coordinates,
        location_context: &str,
        personality_code: &str,
        radius_m: u32,
        min_rating: f32,
        max_results: usize,
    ) -> Vec<Candidate> {
        if max_results == 0 {
            return Vec::new();
        }
        let profile = PersonalityProfile::from_code(personality_code);
        let keywords = self.cuisine.keywords_for(location_context);

        let searches = keywords.iter().map(|keyword| {
            let query = NearbyQuery {
                coordinates,
                radius_m,
                place_type: RESTAURANT_TYPE.to_string(),
                keyword: keyword.clone(),
            };
            async move {
                let result =
                    with_timeout(self.config.search_timeout, self.source.search_nearby(&query)).await;
                (query.keyword, result)
            }
        });
        let outcomes = join_all(searches).await;

        let mut seen = HashSet::new();
        let mut restaurants = Vec::new();

        'keywords: for (keyword, result) in outcomes {
            let records = match result {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        "Failed nearby search for keyword '{}' near ({}, {}): {}",
                        keyword, coordinates.lat, coordinates.lng, e
                    );
                    continue;
                }
            };

            for record in records {
                if !meets_rating(&record, min_rating) {
                    continue;
                }
                let source_query = format!("{} near {}", keyword, coordinates.to_query_param());
                let Some(mut candidate) =
                    Candidate::from_record(record, Category::Meal, SourceTag::Nearby, &source_query)
                else {
                    continue;
                };
                if !seen.insert(candidate.external_id.clone()) {
                    continue;
                }

                self.pricing.assign_base_cost(&mut candidate);
                candidate.score = Some(self.scorer.score(&candidate, &profile));
                restaurants.push(candidate);

                if restaurants.len() >= max_results {
                    break 'keywords;
                }
            }
        }

        restaurants
    }

    /// Expand the pool with restaurants near its best activities. Returns the
    /// number of new candidates; ids already in the pool are left untouched.
    pub async fn expand(
        &self,
        pool: &mut CandidatePool,
        location: &str,
        personality_code: &str,
    ) -> usize {
        let anchors: Vec<(String, Coordinates)> = self
            .select_anchors(pool.as_slice())
            .into_iter()
            .filter_map(|a| a.coordinates.map(|coords| (a.name.clone(), coords)))
            .collect();

        if anchors.is_empty() {
            debug!("No activities with coordinates to anchor nearby searches");
            return 0;
        }

        let searches = anchors.iter().map(|(_, coords)| {
            self.search_nearby(
                *coords,
                location,
                personality_code,
                self.config.radius_m,
                self.config.min_rating,
                self.config.max_results,
            )
        });
        let per_anchor = join_all(searches).await;

        let mut added = 0;
        for ((anchor_name, _), restaurants) in anchors.iter().zip(per_anchor) {
            for mut restaurant in restaurants {
                restaurant.matched_from = Some(anchor_name.clone());
                if pool.admit(restaurant) {
                    added += 1;
                }
            }
        }

        info!(
            "Satellite expansion added {} restaurants around {} anchors",
            added,
            anchors.len()
        );
        added
    }
}

fn meets_rating(record: &RawPlaceRecord, min_rating: f32) -> bool {
    record.rating.map_or(false, |rating| rating >= min_rating)
}
