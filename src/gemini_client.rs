use crate::errors::ProviderError;
use crate::locale::Locale;
use crate::models::{EnrichedData, EnrichmentRequest, PlaceCandidate};
use crate::provider::{
    candidate_from_value, discovery_prompt, enrichment_prompt, enrichment_response_schema,
    parse_enrichment, GroundedSearchProvider,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the Gemini `generateContent` endpoint.
///
/// Discovery uses the Google Maps grounding tool and reads businesses from the
/// grounding metadata; enrichment uses Google Search grounding with a JSON
/// response schema.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    locale: Locale,
}

impl GeminiClient {
    /// Creates a new `GeminiClient`.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The Gemini API key.
    /// * `model` - Model name, e.g. `gemini-2.5-flash`.
    /// * `locale` - Language of the enrichment prompt.
    /// * `timeout` - Per-request timeout enforced by the HTTP client.
    pub fn new(
        api_key: &str,
        model: &str,
        locale: Locale,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create Gemini client: {}", e)))?;

        Ok(Self {
            client,
            base_url: GEMINI_API_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            locale,
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn generate_content(&self, body: &Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        tracing::debug!("Gemini generateContent request: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        response.json().await.map_err(|e| {
            ProviderError::Malformed(format!("Failed to parse Gemini response: {}", e))
        })
    }
}

/// Extracts Maps grounding chunks from a `generateContent` response.
///
/// Chunks without a `maps` entry (web citations) are skipped; each kept
/// candidate remembers its chunk position. A missing candidate or metadata
/// block yields an empty list.
pub fn candidates_from_response(body: &Value) -> Vec<PlaceCandidate> {
    let chunks = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("groundingMetadata"))
        .and_then(|m| m.get("groundingChunks"))
        .and_then(|c| c.as_array());

    let Some(chunks) = chunks else {
        tracing::warn!("Gemini response carries no grounding chunks");
        return Vec::new();
    };

    chunks
        .iter()
        .enumerate()
        .filter_map(|(index, chunk)| chunk.get("maps").map(|maps| (index, maps)))
        .filter(|(_, maps)| maps.is_object())
        .map(|(index, maps)| PlaceCandidate {
            source_index: Some(index),
            ..candidate_from_value(maps)
        })
        .collect()
}

/// Concatenated text parts of the first candidate.
pub fn response_text(body: &Value) -> String {
    body.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl GroundedSearchProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn discover(
        &self,
        activity: &str,
        city: &str,
    ) -> Result<Vec<PlaceCandidate>, ProviderError> {
        tracing::info!("Searching Maps for '{}' in '{}'", activity, city);

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": discovery_prompt(activity, city) }]
            }],
            "tools": [{ "googleMaps": {} }],
            "generationConfig": { "temperature": 0.7 }
        });

        let response = self.generate_content(&body).await?;
        let candidates = candidates_from_response(&response);

        tracing::info!("✓ Gemini returned {} Maps candidate(s)", candidates.len());
        Ok(candidates)
    }

    async fn enrich(&self, request: &EnrichmentRequest) -> Result<EnrichedData, ProviderError> {
        tracing::info!("Enriching '{}' via Gemini", request.name);

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": enrichment_prompt(request, self.locale) }]
            }],
            "tools": [{ "googleSearch": {} }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": enrichment_response_schema()
            }
        });

        let response = self.generate_content(&body).await?;
        parse_enrichment(&response_text(&response))
    }
}
