use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Lead ============

/// Lifecycle of a lead within one search session.
///
/// `Failed` is part of the domain but the enrichment pipeline never assigns it:
/// a failed enrichment resolves to fallback content and still reaches `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Discovered,
    Analyzing,
    Completed,
    Failed,
}

/// One discovered business, enriched over its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Provider place id, or a generated `lead-{index}-{millis}` fallback.
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating_count: Option<u32>,

    /// Raw phone, exactly as returned by a provider.
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub mobile_friendly: Option<bool>,
    #[serde(default)]
    pub weakness: Option<String>,
    #[serde(default)]
    pub pitch: Option<String>,

    pub status: LeadStatus,

    // Written by validation only
    #[serde(default)]
    pub clean_phone: Option<String>,
    #[serde(default)]
    pub clean_email: Option<String>,
    #[serde(default)]
    pub clean_website: Option<String>,
}

impl Lead {
    /// Creates a freshly discovered lead with no enrichment data.
    pub fn discovered(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            map_uri: None,
            rating: None,
            user_rating_count: None,
            phone: None,
            website: None,
            email: None,
            mobile_friendly: None,
            weakness: None,
            pitch: None,
            status: LeadStatus::Discovered,
            clean_phone: None,
            clean_email: None,
            clean_website: None,
        }
    }

    /// Merges an enrichment result into the record and marks it completed.
    ///
    /// A provider-supplied phone only fills an empty raw phone.
    pub fn apply_enrichment(&mut self, data: EnrichedData) {
        self.website = Some(data.website);
        self.email = Some(data.email);
        self.mobile_friendly = Some(data.is_mobile_friendly);
        self.weakness = Some(data.weakness);
        self.pitch = Some(data.pitch);
        if self.phone.is_none() {
            self.phone = data.phone.filter(|p| !p.trim().is_empty());
        }
        self.status = LeadStatus::Completed;
    }

    pub fn enrichment_request(&self, activity: &str) -> EnrichmentRequest {
        EnrichmentRequest {
            name: self.name.clone(),
            address: self.address.clone(),
            rating: self.rating,
            activity: activity.to_string(),
        }
    }
}

// ============ Search ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub activity: String,
    pub city: String,
}

impl SearchParams {
    /// Trims both fields and rejects blank values.
    pub fn normalized(&self) -> Result<Self, AppError> {
        let activity = self.activity.trim();
        let city = self.city.trim();

        if activity.is_empty() {
            return Err(AppError::BadRequest("activity cannot be empty".to_string()));
        }
        if city.is_empty() {
            return Err(AppError::BadRequest("city cannot be empty".to_string()));
        }

        Ok(Self {
            activity: activity.to_string(),
            city: city.to_string(),
        })
    }
}

/// A business as reported by the discovery call, before any defaulting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub place_id: Option<String>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub uri: Option<String>,
    pub rating: Option<f32>,
    pub user_rating_count: Option<u32>,
    /// Position in the raw provider response when it differs from the
    /// position in the candidate list (Gemini skips non-Maps chunks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
}

// ============ Enrichment ============

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentRequest {
    pub name: String,
    pub address: String,
    pub rating: Option<f32>,
    pub activity: String,
}

/// Structured enrichment answer. Every field except `phone` is required; a response
/// missing one of them fails to deserialize and is treated as malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedData {
    pub website: String,
    pub email: String,
    #[serde(rename = "isMobileFriendly")]
    pub is_mobile_friendly: bool,
    pub weakness: String,
    pub pitch: String,
    #[serde(default)]
    pub phone: Option<String>,
}

// ============ API payloads ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub generation: u64,
    pub params: Option<SearchParams>,
    pub searched_at: Option<DateTime<Utc>>,
    pub enriching: bool,
    pub leads: Vec<Lead>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: String,
    pub count: usize,
    pub leads: Vec<Lead>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSummary {
    pub processed: usize,
    pub fallbacks: usize,
    /// Results dropped because a newer search replaced the session.
    pub discarded: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichResponse {
    pub status: String,
    pub queued: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<EnrichmentSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leads: Option<Vec<Lead>>,
}
