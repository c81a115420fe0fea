use crate::errors::ProviderError;
use crate::locale::Locale;
use crate::models::{EnrichedData, EnrichmentRequest, PlaceCandidate};
use crate::provider::{
    candidate_from_value, discovery_prompt, enrichment_prompt, parse_enrichment,
    strip_code_blocks, GroundedSearchProvider,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use std::time::Duration;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Client for any OpenAI-compatible `chat/completions` endpoint.
///
/// There is no Maps grounding on this backend: discovery asks the model for a
/// structured list of places and relies on its own knowledge or on whatever
/// search the endpoint performs server-side.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    locale: Locale,
}

impl OpenAiClient {
    pub fn new(
        api_key: &str,
        model: &str,
        locale: Locale,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create OpenAI client: {}", e)))?;

        Ok(Self {
            client,
            base_url: OPENAI_API_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            locale,
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| ProviderError::Unauthorized("API key is not a valid header".into()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Sends one structured-output chat request and returns the message content.
    async fn structured_output(
        &self,
        prompt: String,
        schema_name: &str,
        schema: Value,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("OpenAI structured output request: model {}", self.model);

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": {
                "type": "json_schema",
                "json_schema": { "name": schema_name, "strict": true, "schema": schema }
            }
        });

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("OpenAI returned error {}: {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let data: Value = response.json().await.map_err(|e| {
            ProviderError::Malformed(format!("Failed to parse OpenAI response: {}", e))
        })?;

        data.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ProviderError::Malformed("No message content from OpenAI".to_string()))
    }
}

fn places_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["places"],
        "properties": {
            "places": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["placeId", "title", "address", "uri"],
                    "properties": {
                        "placeId": { "type": ["string", "null"] },
                        "title": { "type": "string" },
                        "address": { "type": "string" },
                        "uri": { "type": ["string", "null"] }
                    }
                }
            }
        }
    })
}

fn enrichment_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["website", "email", "phone", "isMobileFriendly", "weakness", "pitch"],
        "properties": {
            "website": { "type": "string", "description": "Website URL or 'Not found'" },
            "email": { "type": "string", "description": "Public email or 'Not found'" },
            "phone": { "type": ["string", "null"], "description": "Public phone number" },
            "isMobileFriendly": { "type": "boolean" },
            "weakness": { "type": "string" },
            "pitch": { "type": "string" }
        }
    })
}

/// Reads `{"places": [...]}`; anything else yields no candidates.
pub fn candidates_from_content(content: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
    let value: Value = serde_json::from_str(strip_code_blocks(content))
        .map_err(|e| ProviderError::Malformed(format!("Invalid places JSON: {}", e)))?;

    Ok(value
        .get("places")
        .and_then(|p| p.as_array())
        .map(|places| {
            places
                .iter()
                .filter(|p| p.is_object())
                .map(candidate_from_value)
                .collect()
        })
        .unwrap_or_default())
}

#[async_trait]
impl GroundedSearchProvider for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn discover(
        &self,
        activity: &str,
        city: &str,
    ) -> Result<Vec<PlaceCandidate>, ProviderError> {
        tracing::info!("Searching places for '{}' in '{}' via OpenAI", activity, city);

        let content = self
            .structured_output(discovery_prompt(activity, city), "places", places_schema())
            .await?;
        let candidates = candidates_from_content(&content)?;

        tracing::info!("✓ OpenAI returned {} candidate(s)", candidates.len());
        Ok(candidates)
    }

    async fn enrich(&self, request: &EnrichmentRequest) -> Result<EnrichedData, ProviderError> {
        tracing::info!("Enriching '{}' via OpenAI", request.name);

        let content = self
            .structured_output(
                enrichment_prompt(request, self.locale),
                "lead_enrichment",
                enrichment_schema(),
            )
            .await?;
        parse_enrichment(&content)
    }
}
