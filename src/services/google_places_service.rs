//! Google Places API adapter
//!
//! Implements both search capabilities over the Places web service:
//! text search for theme/mention queries and nearby search for restaurants
//! around an anchor activity.
//!
//! ## Setup
//! 1. Enable the Places API in Google Cloud Console
//! 2. Set the environment variable: `GOOGLE_PLACES_API_KEY=your_api_key_here`
//!
//! Retries are not performed here; every call is bounded by the HTTP client
//! timeout and failures are returned to the caller as `SourceError`.

use crate::error::{PlannerError, SourceError};
use crate::models::place::RawPlaceRecord;
use crate::services::place_source::{NearbyQuery, PlaceSource, ProximitySource};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::{env, time::Duration};

const TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const NEARBY_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
const HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct PlacesApiConfig {
    pub api_key: String,
    pub text_search_url: String,
    pub nearby_search_url: String,
    pub timeout: Duration,
}

impl PlacesApiConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            text_search_url: TEXT_SEARCH_URL.to_string(),
            nearby_search_url: NEARBY_SEARCH_URL.to_string(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }

    /// Read the key from `GOOGLE_PLACES_API_KEY`; endpoints may be overridden
    /// with `GOOGLE_PLACES_TEXT_SEARCH_URL` / `GOOGLE_PLACES_NEARBY_URL`.
    pub fn from_env() -> Result<Self, PlannerError> {
        let api_key = env::var("GOOGLE_PLACES_API_KEY").map_err(|_| {
            PlannerError::Config("GOOGLE_PLACES_API_KEY environment variable not set".into())
        })?;

        let defaults = Self::new(&api_key);
        Ok(Self {
            text_search_url: env::var("GOOGLE_PLACES_TEXT_SEARCH_URL")
                .unwrap_or(defaults.text_search_url),
            nearby_search_url: env::var("GOOGLE_PLACES_NEARBY_URL")
                .unwrap_or(defaults.nearby_search_url),
            timeout: env::var("GOOGLE_PLACES_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            api_key,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: Option<String>,
    #[serde(default)]
    name: String,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    geometry: Option<PlaceGeometry>,
    rating: Option<f32>,
    price_level: Option<u8>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: Option<PlaceLatLng>,
}

#[derive(Debug, Deserialize)]
struct PlaceLatLng {
    lat: f64,
    lng: f64,
}

impl PlaceResult {
    fn into_record(self) -> RawPlaceRecord {
        let location = self.geometry.and_then(|g| g.location);
        RawPlaceRecord {
            place_id: self.place_id,
            name: self.name,
            address: self.formatted_address.or(self.vicinity),
            lat: location.as_ref().map(|l| l.lat),
            lng: location.as_ref().map(|l| l.lng),
            rating: self.rating,
            price_level: self.price_level,
            types: self.types,
        }
    }
}

pub struct GooglePlacesClient {
    http_client: reqwest::Client,
    config: PlacesApiConfig,
}

impl GooglePlacesClient {
    pub fn new(config: PlacesApiConfig) -> Result<Self, PlannerError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn from_env() -> Result<Self, PlannerError> {
        Self::new(PlacesApiConfig::from_env()?)
    }

    async fn fetch(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<RawPlaceRecord>, SourceError> {
        let response = self
            .http_client
            .get(url)
            .query(params)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let places: PlacesResponse = serde_json::from_str(&body)?;

        match places.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(places
                .results
                .into_iter()
                .map(PlaceResult::into_record)
                .collect()),
            _ => Err(SourceError::Api {
                status: places.status,
                message: places.error_message,
            }),
        }
    }
}

#[async_trait]
impl PlaceSource for GooglePlacesClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawPlaceRecord>, SourceError> {
        debug!("Places text search: {}", query);

        let mut records = self
            .fetch(&self.config.text_search_url, &[("query", query.to_string())])
            .await?;
        records.truncate(max_results);
        Ok(records)
    }
}

#[async_trait]
impl ProximitySource for GooglePlacesClient {
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<RawPlaceRecord>, SourceError> {
        debug!(
            "Places nearby search: keyword '{}' around ({:.4}, {:.4})",
            query.keyword, query.coordinates.lat, query.coordinates.lng
        );

        let params = [
            ("location", query.coordinates.to_query_param()),
            ("radius", query.radius_m.to_string()),
            ("type", query.place_type.clone()),
            ("keyword", query.keyword.clone()),
        ];
        self.fetch(&self.config.nearby_search_url, &params).await
    }
}
