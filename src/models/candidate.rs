use crate::models::money::Money;
use crate::models::place::{Coordinates, RawPlaceRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MEAL_TYPES: [&str; 7] = [
    "restaurant",
    "food",
    "cafe",
    "bakery",
    "bar",
    "meal_takeaway",
    "meal_delivery",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Meal,
    Activity,
}

impl Category {
    /// Classify a text-search result by its place type tags
    pub fn classify(types: &[String]) -> Self {
        let is_meal = types
            .iter()
            .any(|t| MEAL_TYPES.contains(&t.to_lowercase().as_str()));
        if is_meal {
            Category::Meal
        } else {
            Category::Activity
        }
    }

    /// Price tier assumed when the source does not report one
    pub fn default_price_level(&self) -> u8 {
        match self {
            Category::Meal => 1,
            Category::Activity => 2,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        match self {
            Category::Meal => 60,
            Category::Activity => 120,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Meal => "meal",
            Category::Activity => "activity",
        }
    }
}

/// Where a candidate came from. Traceability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Api,
    Web,
    Nearby,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub external_id: String,
    pub name: String,
    pub address: Option<String>,
    pub category: Category,
    pub types: Vec<String>,
    pub coordinates: Option<Coordinates>,
    pub rating: Option<f32>,
    pub price_level: Option<u8>,
    pub duration_minutes: u32,
    pub base_cost: Money,
    pub cost: Money,
    pub score: Option<u8>,
    pub source_tag: SourceTag,
    pub source_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_hint: Option<u32>,
}

impl Candidate {
    /// Build a candidate from a raw record. Records without an identity key
    /// cannot be deduplicated and yield `None`.
    pub fn from_record(
        record: RawPlaceRecord,
        category: Category,
        source_tag: SourceTag,
        source_query: &str,
    ) -> Option<Self> {
        let external_id = record.external_id()?.to_string();
        let coordinates = record.coordinates();

        Some(Self {
            external_id,
            name: record.name,
            address: record.address,
            category,
            types: record.types.iter().map(|t| t.to_lowercase()).collect(),
            coordinates,
            rating: record.rating,
            price_level: record.price_level,
            duration_minutes: category.duration_minutes(),
            base_cost: Money::ZERO,
            cost: Money::ZERO,
            score: None,
            source_tag,
            source_query: source_query.to_string(),
            matched_from: None,
            day_hint: None,
        })
    }

    pub fn effective_price_level(&self) -> u8 {
        self.price_level
            .unwrap_or_else(|| self.category.default_price_level())
    }

    pub fn has_type(&self, wanted: &[&str]) -> bool {
        self.types.iter().any(|t| wanted.contains(&t.as_str()))
    }

    pub fn score_or_zero(&self) -> u8 {
        self.score.unwrap_or(0)
    }
}

/// Candidate collection deduplicated by `external_id`, first seen wins.
#[derive(Debug, Default)]
pub struct CandidatePool {
    seen: HashSet<String>,
    candidates: Vec<Candidate>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and drops the candidate) when its id was already admitted.
    pub fn admit(&mut self, candidate: Candidate) -> bool {
        if self.seen.contains(&candidate.external_id) {
            return false;
        }
        self.seen.insert(candidate.external_id.clone());
        self.candidates.push(candidate);
        true
    }

    pub fn contains(&self, external_id: &str) -> bool {
        self.seen.contains(external_id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Candidate> {
        self.candidates.iter_mut()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: Option<&str>, name: &str) -> RawPlaceRecord {
        RawPlaceRecord {
            place_id: id.map(str::to_string),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_by_types() {
        let meal = vec!["Cafe".to_string(), "point_of_interest".to_string()];
        let activity = vec!["museum".to_string(), "tourist_attraction".to_string()];
        assert_eq!(Category::classify(&meal), Category::Meal);
        assert_eq!(Category::classify(&activity), Category::Activity);
        assert_eq!(Category::classify(&[]), Category::Activity);
    }

    #[test]
    fn test_from_record_requires_id() {
        assert!(Candidate::from_record(record(None, "A"), Category::Activity, SourceTag::Api, "q").is_none());
        assert!(Candidate::from_record(record(Some("  "), "A"), Category::Activity, SourceTag::Api, "q").is_none());

        let c = Candidate::from_record(record(Some("p1"), "A"), Category::Meal, SourceTag::Web, "q")
            .expect("record has an id");
        assert_eq!(c.external_id, "p1");
        assert_eq!(c.duration_minutes, 60);
        assert_eq!(c.effective_price_level(), 1);
        assert!(c.coordinates.is_none());
    }

    #[test]
    fn test_pool_first_seen_wins() {
        let mut pool = CandidatePool::new();
        let first = Candidate::from_record(record(Some("place_42"), "First"), Category::Activity, SourceTag::Api, "q1").unwrap();
        let second = Candidate::from_record(record(Some("place_42"), "Second"), Category::Activity, SourceTag::Api, "q2").unwrap();

        assert!(pool.admit(first));
        assert!(!pool.admit(second));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.as_slice()[0].name, "First");
    }
}
