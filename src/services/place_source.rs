//! Search capabilities the planner consumes.
//!
//! Implementations are injected into the pipeline as `Arc<dyn PlaceSource>` /
//! `Arc<dyn ProximitySource>`; `GooglePlacesClient` is the production one.

use crate::error::SourceError;
use crate::models::place::{Coordinates, RawPlaceRecord};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Free-text place search.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawPlaceRecord>, SourceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub coordinates: Coordinates,
    pub radius_m: u32,
    /// Places type filter, e.g. "restaurant"
    pub place_type: String,
    pub keyword: String,
}

/// Geo-proximity search around a coordinate.
#[async_trait]
pub trait ProximitySource: Send + Sync {
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<RawPlaceRecord>, SourceError>;
}

/// Bound a search future by `limit`; an elapsed timer becomes `SourceError::Timeout`.
pub async fn with_timeout<T, F>(limit: Duration, search: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    match tokio::time::timeout(limit, search).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout(limit)),
    }
}
