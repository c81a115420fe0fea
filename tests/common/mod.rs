//! Scripted provider shared by the pipeline and API tests.
#![allow(dead_code)]

use async_trait::async_trait;
use rust_prospect_api::core::models::{EnrichedData, EnrichmentRequest, PlaceCandidate};
use rust_prospect_api::errors::ProviderError;
use rust_prospect_api::integrations::provider::GroundedSearchProvider;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn candidate(id: &str, title: &str) -> PlaceCandidate {
    PlaceCandidate {
        place_id: Some(id.to_string()),
        title: Some(title.to_string()),
        address: Some(format!("{} street", title)),
        ..Default::default()
    }
}

pub fn enriched(name: &str) -> EnrichedData {
    EnrichedData {
        website: format!("https://{}.example", name.to_lowercase().replace(' ', "-")),
        email: "contact@example.fr".to_string(),
        is_mobile_friendly: true,
        weakness: "Slow first paint".to_string(),
        pitch: format!("{} could load twice as fast with optimized images.", name),
        phone: None,
    }
}

/// Provider answering from fixed data and recording every enrichment call.
pub struct ScriptedProvider {
    pub discovery: Result<Vec<PlaceCandidate>, ProviderError>,
    /// Business names whose enrichment call fails.
    pub failing: HashSet<String>,
    pub delay: Duration,
    pub calls: Mutex<Vec<String>>,
    pub events: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(discovery: Result<Vec<PlaceCandidate>, ProviderError>) -> Self {
        Self {
            discovery,
            failing: HashSet::new(),
            delay: Duration::from_millis(5),
            calls: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_places(count: usize) -> Self {
        Self::new(Ok((0..count)
            .map(|i| candidate(&format!("p{}", i), &format!("Place {}", i)))
            .collect()))
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl GroundedSearchProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn discover(
        &self,
        _activity: &str,
        _city: &str,
    ) -> Result<Vec<PlaceCandidate>, ProviderError> {
        self.discovery.clone()
    }

    async fn enrich(&self, request: &EnrichmentRequest) -> Result<EnrichedData, ProviderError> {
        self.calls.lock().unwrap().push(request.name.clone());
        self.events
            .lock()
            .unwrap()
            .push(format!("start:{}", request.name));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .push(format!("end:{}", request.name));

        if self.failing.contains(&request.name) {
            return Err(ProviderError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            });
        }
        Ok(enriched(&request.name))
    }
}
