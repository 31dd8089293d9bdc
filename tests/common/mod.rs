#![allow(dead_code)]

use async_trait::async_trait;
use itinerary_planner::models::{Coordinates, RawPlaceRecord};
use itinerary_planner::{NearbyQuery, PlaceSource, ProximitySource, SourceError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// What a scripted source does for one query or keyword
#[derive(Clone)]
pub enum Script {
    Records(Vec<RawPlaceRecord>),
    Fail(u16),
    /// Never resolves; the caller's timeout has to fire
    Hang,
    /// Records returned after sleeping for the given time
    Delayed(Duration, Vec<RawPlaceRecord>),
}

async fn play(script: Option<Script>, max_results: usize) -> Result<Vec<RawPlaceRecord>, SourceError> {
    match script {
        Some(Script::Records(records)) => Ok(records.into_iter().take(max_results).collect()),
        Some(Script::Fail(code)) => Err(SourceError::Status(code)),
        Some(Script::Hang) => std::future::pending().await,
        Some(Script::Delayed(delay, records)) => {
            tokio::time::sleep(delay).await;
            Ok(records.into_iter().take(max_results).collect())
        }
        None => Ok(Vec::new()),
    }
}

/// Text-search fake keyed on the exact query string
#[derive(Default)]
pub struct ScriptedPlaces {
    scripts: HashMap<String, Script>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl ScriptedPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, query: &str, script: Script) -> Self {
        self.scripts.insert(query.to_string(), script);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PlaceSource for ScriptedPlaces {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawPlaceRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        play(self.scripts.get(query).cloned(), max_results).await
    }
}

/// Nearby-search fake keyed on the cuisine keyword
#[derive(Default)]
pub struct ScriptedNearby {
    scripts: HashMap<String, Script>,
    calls: AtomicUsize,
}

impl ScriptedNearby {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, keyword: &str, script: Script) -> Self {
        self.scripts.insert(keyword.to_string(), script);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProximitySource for ScriptedNearby {
    async fn search_nearby(&self, query: &NearbyQuery) -> Result<Vec<RawPlaceRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        play(self.scripts.get(&query.keyword).cloned(), usize::MAX).await
    }
}

pub fn shared<T>(source: T) -> Arc<T> {
    Arc::new(source)
}

pub fn place(id: &str, name: &str, rating: Option<f32>, types: &[&str]) -> RawPlaceRecord {
    RawPlaceRecord {
        place_id: Some(id.to_string()),
        name: name.to_string(),
        rating,
        types: types.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

pub fn place_at(id: &str, name: &str, rating: Option<f32>, types: &[&str], at: Coordinates) -> RawPlaceRecord {
    RawPlaceRecord {
        lat: Some(at.lat),
        lng: Some(at.lng),
        ..place(id, name, rating, types)
    }
}

pub fn restaurant(id: &str, name: &str, rating: f32) -> RawPlaceRecord {
    place(id, name, Some(rating), &["restaurant", "food"])
}
