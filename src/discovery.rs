/// Lead discovery
///
/// Turns one grounded search into an ordered, deduplicated list of
/// `discovered` leads. Missing provider fields are defaulted, never dropped.
use crate::errors::ProviderError;
use crate::models::{Lead, PlaceCandidate};
use crate::provider::GroundedSearchProvider;
use chrono::Utc;
use std::collections::HashSet;

pub const UNKNOWN_NAME: &str = "Unknown Business";
pub const UNKNOWN_ADDRESS: &str = "Address not available";

/// Result of a successful discovery call.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryOutcome {
    Found(Vec<Lead>),
    /// The provider answered but listed no businesses. Not an error.
    Empty,
}

impl DiscoveryOutcome {
    pub fn into_leads(self) -> Vec<Lead> {
        match self {
            DiscoveryOutcome::Found(leads) => leads,
            DiscoveryOutcome::Empty => Vec::new(),
        }
    }
}

/// Issues exactly one discovery call; `activity` and `city` must already be
/// trimmed and non-empty.
pub async fn discover_leads(
    provider: &dyn GroundedSearchProvider,
    activity: &str,
    city: &str,
) -> Result<DiscoveryOutcome, ProviderError> {
    tracing::info!(
        "Starting discovery for '{}' in '{}' ({})",
        activity,
        city,
        provider.name()
    );

    let candidates = provider.discover(activity, city).await.map_err(|e| {
        tracing::error!("Discovery failed ({}): {}", e.class(), e);
        e
    })?;
    let raw_count = candidates.len();

    let leads = leads_from_candidates(candidates, Utc::now().timestamp_millis());
    if leads.is_empty() {
        tracing::warn!("No leads found for '{}' in '{}'", activity, city);
        return Ok(DiscoveryOutcome::Empty);
    }

    tracing::info!(
        "✓ Discovered {} unique lead(s) from {} candidate(s)",
        leads.len(),
        raw_count
    );
    Ok(DiscoveryOutcome::Found(leads))
}

/// Converts candidates to leads and keeps the first occurrence of each id.
///
/// Candidates without an id get `lead-{index}-{stamp}`, where `index` is the
/// candidate's position in the provider response (`source_index` when set).
pub fn leads_from_candidates(candidates: Vec<PlaceCandidate>, stamp: i64) -> Vec<Lead> {
    let mut seen = HashSet::new();
    let mut leads = Vec::with_capacity(candidates.len());

    for (index, candidate) in candidates.into_iter().enumerate() {
        let lead = lead_from_candidate(candidate, index, stamp);
        if seen.insert(lead.id.clone()) {
            leads.push(lead);
        } else {
            tracing::debug!("Skipping duplicate lead id {}", lead.id);
        }
    }

    leads
}

fn lead_from_candidate(candidate: PlaceCandidate, index: usize, stamp: i64) -> Lead {
    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let index = candidate.source_index.unwrap_or(index);
    let id = non_blank(candidate.place_id).unwrap_or_else(|| format!("lead-{}-{}", index, stamp));
    let name = non_blank(candidate.title).unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let address = non_blank(candidate.address).unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());

    let mut lead = Lead::discovered(id, name, address);
    lead.map_uri = non_blank(candidate.uri);
    lead.rating = candidate.rating;
    lead.user_rating_count = candidate.user_rating_count;
    lead
}
