use crate::error::SourceError;
use crate::models::candidate::{Candidate, CandidatePool, Category, SourceTag};
use crate::models::place::RawPlaceRecord;
use crate::services::place_source::{with_timeout, PlaceSource};
use crate::services::pricing_service::PricingService;
use crate::services::query_builder::QueryBuilder;
use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const MAX_QUERIES: usize = 8;
const MAX_RESULTS_PER_QUERY: usize = 5;
const MAX_RESULTS_PER_MENTION: usize = 1;
const SEARCH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Hard cap on builder queries sent to the source
    pub max_queries: usize,
    pub max_results_per_query: usize,
    pub max_results_per_mention: usize,
    pub search_timeout: Duration,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_queries: MAX_QUERIES,
            max_results_per_query: MAX_RESULTS_PER_QUERY,
            max_results_per_mention: MAX_RESULTS_PER_MENTION,
            search_timeout: Duration::from_secs(SEARCH_TIMEOUT_SECS),
        }
    }
}

/// The settled result of one search call.
#[derive(Debug)]
pub struct SearchOutcome {
    pub query: String,
    /// Mention name the query was built from, for web enrichment
    pub matched_from: Option<String>,
    pub result: Result<Vec<RawPlaceRecord>, SourceError>,
}

/// Counters for one merge, used for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub failed_searches: usize,
    pub admitted: usize,
    pub duplicates: usize,
    pub missing_id: usize,
}

pub struct CandidateAggregator {
    source: Arc<dyn PlaceSource>,
    config: AggregationConfig,
    pricing: PricingService,
    query_builder: QueryBuilder,
}

impl CandidateAggregator {
    pub fn new(source: Arc<dyn PlaceSource>, pricing: PricingService) -> Self {
        Self::with_config(source, pricing, AggregationConfig::default())
    }

    pub fn with_config(
        source: Arc<dyn PlaceSource>,
        pricing: PricingService,
        config: AggregationConfig,
    ) -> Self {
        Self {
            source,
            config,
            pricing,
            query_builder: QueryBuilder::new(),
        }
    }

    /// Run up to `max_queries` queries concurrently and wait for all of them.
    pub async fn run_queries(&self, queries: &[String]) -> Vec<SearchOutcome> {
        if queries.len() > self.config.max_queries {
            debug!(
                "Capping {} queries to {}",
                queries.len(),
                self.config.max_queries
            );
        }

        let searches = queries
            .iter()
            .take(self.config.max_queries)
            .map(|query| self.bounded_search(query, self.config.max_results_per_query, None));

        join_all(searches).await
    }

    /// Run one `"{name} in {location}"` query per mentioned place name.
    pub async fn run_mention_queries(&self, names: &[String], location: &str) -> Vec<SearchOutcome> {
        let searches = names.iter().filter_map(|name| {
            let query = self.query_builder.build_mention_query(name, location)?;
            Some(self.bounded_search_owned(query, name.clone()))
        });

        join_all(searches).await
    }

    async fn bounded_search_owned(&self, query: String, matched_from: String) -> SearchOutcome {
        self.bounded_search(&query, self.config.max_results_per_mention, Some(matched_from))
            .await
    }

    async fn bounded_search(
        &self,
        query: &str,
        max_results: usize,
        matched_from: Option<String>,
    ) -> SearchOutcome {
        let result = with_timeout(
            self.config.search_timeout,
            self.source.search(query, max_results),
        )
        .await;

        SearchOutcome {
            query: query.to_string(),
            matched_from,
            result,
        }
    }

    /// Merge settled outcomes into the pool in order. Failed searches count as
    /// zero results; records without an id are dropped; ids already admitted
    /// are skipped without touching the existing entry.
    pub fn merge(
        &self,
        outcomes: Vec<SearchOutcome>,
        source_tag: SourceTag,
        pool: &mut CandidatePool,
    ) -> MergeReport {
        let mut report = MergeReport::default();

        for outcome in outcomes {
            let records = match outcome.result {
                Ok(records) => records,
                Err(e) => {
                    warn!("Query failed: '{}': {}", outcome.query, e);
                    report.failed_searches += 1;
                    continue;
                }
            };

            for record in records {
                let category = Category::classify(&record.types);
                let Some(mut candidate) =
                    Candidate::from_record(record, category, source_tag, &outcome.query)
                else {
                    report.missing_id += 1;
                    continue;
                };

                candidate.matched_from = outcome.matched_from.clone();
                self.pricing.assign_base_cost(&mut candidate);

                if pool.admit(candidate) {
                    report.admitted += 1;
                } else {
                    report.duplicates += 1;
                }
            }
        }

        info!(
            "Merged {:?} results: {} admitted, {} duplicates, {} without id, {} failed searches",
            source_tag, report.admitted, report.duplicates, report.missing_id, report.failed_searches
        );
        report
    }
}

/// Provisional round-robin day guess: two per day per category, wrapping.
/// Advisory only; the allocator never reads it.
pub fn assign_day_hints(pool: &mut CandidatePool, n_days: u32) {
    if n_days == 0 {
        return;
    }
    let mut per_category: HashMap<Category, u32> = HashMap::new();
    for candidate in pool.iter_mut() {
        let idx = per_category.entry(candidate.category).or_insert(0);
        candidate.day_hint = Some((*idx / 2) % n_days + 1);
        *idx += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct MapSource(HashMap<String, Result<Vec<RawPlaceRecord>, u16>>);

    #[async_trait]
    impl PlaceSource for MapSource {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawPlaceRecord>, SourceError> {
            match self.0.get(query) {
                Some(Ok(records)) => Ok(records.iter().take(max_results).cloned().collect()),
                Some(Err(code)) => Err(SourceError::Status(*code)),
                None => Ok(Vec::new()),
            }
        }
    }

    fn record(id: Option<&str>, name: &str, types: &[&str]) -> RawPlaceRecord {
        RawPlaceRecord {
            place_id: id.map(str::to_string),
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn aggregator(entries: Vec<(&str, Result<Vec<RawPlaceRecord>, u16>)>) -> CandidateAggregator {
        let map = entries.into_iter().map(|(q, r)| (q.to_string(), r)).collect();
        CandidateAggregator::new(Arc::new(MapSource(map)), PricingService::default())
    }

    #[tokio::test]
    async fn test_duplicate_ids_first_seen_wins() {
        let agg = aggregator(vec![
            ("q1", Ok(vec![record(Some("place_42"), "Original", &["museum"])])),
            ("q2", Ok(vec![record(Some("place_42"), "Impostor", &["museum"]), record(Some("p2"), "Other", &[])])),
        ]);

        let outcomes = agg.run_queries(&["q1".to_string(), "q2".to_string()]).await;
        let mut pool = CandidatePool::new();
        let report = agg.merge(outcomes, SourceTag::Api, &mut pool);

        assert_eq!(pool.len(), 2);
        assert_eq!(report.duplicates, 1);
        let kept = pool.iter().find(|c| c.external_id == "place_42").unwrap();
        assert_eq!(kept.name, "Original");
        assert_eq!(kept.source_query, "q1");
    }

    #[tokio::test]
    async fn test_failed_query_does_not_abort_batch() {
        let agg = aggregator(vec![
            ("bad", Err(503)),
            ("good", Ok(vec![record(Some("a"), "A", &[]), record(None, "No id", &[])])),
        ]);

        let outcomes = agg.run_queries(&["bad".to_string(), "good".to_string()]).await;
        assert_eq!(outcomes.len(), 2);

        let mut pool = CandidatePool::new();
        let report = agg.merge(outcomes, SourceTag::Api, &mut pool);
        assert_eq!(report.failed_searches, 1);
        assert_eq!(report.missing_id, 1);
        assert_eq!(pool.len(), 1);
    }

    #[tokio::test]
    async fn test_query_cap_applied() {
        let agg = aggregator(vec![]);
        let queries: Vec<String> = (0..12).map(|i| format!("q{}", i)).collect();
        let outcomes = agg.run_queries(&queries).await;
        assert_eq!(outcomes.len(), MAX_QUERIES);
    }

    #[tokio::test]
    async fn test_mention_queries_tagged_web() {
        let agg = aggregator(vec![(
            "Ghibli Museum in Tokyo",
            Ok(vec![record(Some("g1"), "Ghibli Museum", &["museum"]), record(Some("g2"), "Extra", &[])]),
        )]);

        let outcomes = agg
            .run_mention_queries(&["Ghibli Museum".to_string(), "".to_string()], "Tokyo")
            .await;
        assert_eq!(outcomes.len(), 1);

        let mut pool = CandidatePool::new();
        agg.merge(outcomes, SourceTag::Web, &mut pool);

        // one result per mention
        assert_eq!(pool.len(), 1);
        let c = &pool.as_slice()[0];
        assert_eq!(c.source_tag, SourceTag::Web);
        assert_eq!(c.matched_from.as_deref(), Some("Ghibli Museum"));
    }

    #[test]
    fn test_day_hints_round_robin() {
        let mut pool = CandidatePool::new();
        for i in 0..5 {
            let c = Candidate::from_record(record(Some(&format!("a{}", i)), "A", &[]), Category::Activity, SourceTag::Api, "q").unwrap();
            pool.admit(c);
        }
        assign_day_hints(&mut pool, 2);
        let hints: Vec<u32> = pool.iter().map(|c| c.day_hint.unwrap()).collect();
        assert_eq!(hints, vec![1, 1, 2, 2, 1]);
    }
}
