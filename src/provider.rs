//! Capability interface over the hosted AI service.
//!
//! Discovery and enrichment go through one trait so the backend (Gemini with
//! Maps/Search grounding, or an OpenAI-compatible endpoint) is a configuration
//! choice rather than a code fork.

use crate::config::{Config, ProviderKind};
use crate::errors::ProviderError;
use crate::gemini_client::GeminiClient;
use crate::locale::Locale;
use crate::models::{EnrichedData, EnrichmentRequest, PlaceCandidate};
use crate::openai_client::OpenAiClient;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Number of places the discovery prompt asks for.
pub const DISCOVERY_TARGET: usize = 10;

#[async_trait]
pub trait GroundedSearchProvider: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// One grounded search for businesses matching `activity` in `city`.
    ///
    /// Candidates are returned in provider order, duplicates included.
    async fn discover(&self, activity: &str, city: &str)
        -> Result<Vec<PlaceCandidate>, ProviderError>;

    /// One enrichment call for a single business.
    async fn enrich(&self, request: &EnrichmentRequest) -> Result<EnrichedData, ProviderError>;
}

/// Builds the backend selected by `AI_PROVIDER`.
pub fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn GroundedSearchProvider>> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let provider: Arc<dyn GroundedSearchProvider> = match config.provider {
        ProviderKind::Gemini => {
            let mut client =
                GeminiClient::new(&config.api_key, &config.model, config.locale, timeout)?;
            if let Some(ref base_url) = config.provider_base_url {
                client = client.with_base_url(base_url);
            }
            Arc::new(client)
        }
        ProviderKind::OpenAi => {
            let mut client =
                OpenAiClient::new(&config.api_key, &config.model, config.locale, timeout)?;
            if let Some(ref base_url) = config.provider_base_url {
                client = client.with_base_url(base_url);
            }
            Arc::new(client)
        }
    };

    tracing::info!(
        "✓ AI provider initialized: {} ({})",
        provider.name(),
        config.model
    );
    Ok(provider)
}

pub fn discovery_prompt(activity: &str, city: &str) -> String {
    format!(
        "Find {} popular places for \"{}\" in \"{}\". List them.",
        DISCOVERY_TARGET, activity, city
    )
}

pub fn enrichment_prompt(request: &EnrichmentRequest, locale: Locale) -> String {
    let rating = request
        .rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "N/A".to_string());

    match locale {
        Locale::Fr => format!(
            r#"En tant qu'expert en stratégie digitale, analyse les données suivantes pour l'entreprise "{name}" située à "{address}" (secteur : "{activity}").

1. Trouve leur site web, email officiel et téléphone (via Google Search).
2. Analyse les données : {{nom: "{name}", site: [Trouvé ou Inconnu], note: "{rating}"}}.
3. Identifie un point faible technique précis (ex: vitesse, SEO, responsive, absence de site).
4. Rédige un pitch de vente de 2 phrases percutantes pour proposer une refonte ou une amélioration.

Format de réponse attendu : JSON uniquement."#,
            name = request.name,
            address = request.address,
            activity = request.activity,
            rating = rating,
        ),
        Locale::En => format!(
            r#"As a digital strategy expert, analyse the following data for the business "{name}" located at "{address}" (sector: "{activity}").

1. Find their website, official email and phone number (via Google Search).
2. Analyse the data: {{name: "{name}", site: [Found or Unknown], rating: "{rating}"}}.
3. Identify one precise technical weakness (e.g. speed, SEO, responsiveness, no website).
4. Write a punchy two-sentence sales pitch proposing a redesign or an improvement.

Expected answer format: JSON only."#,
            name = request.name,
            address = request.address,
            activity = request.activity,
            rating = rating,
        ),
    }
}

/// JSON schema of the enrichment answer in OpenAPI-subset form (Gemini
/// `responseSchema`).
pub fn enrichment_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "website": { "type": "STRING", "description": "Website URL or 'Not found'" },
            "email": { "type": "STRING", "description": "Public email or 'Not found'" },
            "phone": { "type": "STRING", "description": "Public phone number", "nullable": true },
            "isMobileFriendly": { "type": "BOOLEAN", "description": "Mobile-friendliness estimate" },
            "weakness": { "type": "STRING", "description": "The technical weakness identified" },
            "pitch": { "type": "STRING", "description": "Two-sentence sales pitch" }
        },
        "required": ["website", "email", "isMobileFriendly", "weakness", "pitch"]
    })
}

/// Strip markdown code blocks from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Strict decode of an enrichment answer. Any missing required key is a
/// schema mismatch.
pub fn parse_enrichment(text: &str) -> Result<EnrichedData, ProviderError> {
    let body = strip_code_blocks(text);
    if body.is_empty() {
        return Err(ProviderError::Malformed(
            "empty enrichment response".to_string(),
        ));
    }

    serde_json::from_str::<EnrichedData>(body)
        .map_err(|e| ProviderError::Malformed(format!("enrichment schema mismatch: {}", e)))
}

/// Reads one candidate from a loosely-shaped JSON object. Non-string ids and
/// titles are treated as absent rather than rejecting the record.
pub fn candidate_from_value(value: &Value) -> PlaceCandidate {
    PlaceCandidate {
        place_id: first_text(value, &["placeId", "place_id", "id"]),
        title: first_text(value, &["title", "name"]),
        address: first_text(value, &["address", "formattedAddress"]),
        uri: first_text(value, &["uri", "mapUri", "url"]),
        rating: value
            .get("rating")
            .and_then(|v| v.as_f64())
            .map(|r| r as f32),
        user_rating_count: value
            .get("userRatingCount")
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok()),
        source_index: None,
    }
}

fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(|v| v.as_str()))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("{}"), "{}");
    }

    #[test]
    fn test_parse_enrichment_accepts_fenced_json() {
        let text = r#"```json
{"website":"https://a.fr","email":"x@a.fr","isMobileFriendly":false,"weakness":"No HTTPS","pitch":"Passez au HTTPS."}
```"#;
        let data = parse_enrichment(text).unwrap();
        assert_eq!(data.website, "https://a.fr");
        assert!(!data.is_mobile_friendly);
        assert_eq!(data.phone, None);
    }

    #[test]
    fn test_parse_enrichment_rejects_missing_fields() {
        let err = parse_enrichment(r#"{"website":"https://a.fr"}"#).unwrap_err();
        assert_eq!(err.class(), "malformed");

        let err = parse_enrichment("").unwrap_err();
        assert_eq!(err.class(), "malformed");
    }

    #[test]
    fn test_parse_enrichment_rejects_wrong_types() {
        let text = r#"{"website":"a","email":"b","isMobileFriendly":"yes","weakness":"c","pitch":"d"}"#;
        assert!(parse_enrichment(text).is_err());
    }

    #[test]
    fn test_candidate_from_value_is_lenient() {
        let value = json!({ "placeId": 42, "title": "  Chez Paul ", "rating": 4.5 });
        let candidate = candidate_from_value(&value);
        assert_eq!(candidate.place_id, None);
        assert_eq!(candidate.title.as_deref(), Some("Chez Paul"));
        assert_eq!(candidate.rating, Some(4.5));
    }

    #[test]
    fn test_enrichment_prompt_carries_lead_fields() {
        let request = EnrichmentRequest {
            name: "Boulangerie Martin".to_string(),
            address: "3 rue Mercière".to_string(),
            rating: Some(4.5),
            activity: "Bakery".to_string(),
        };
        let prompt = enrichment_prompt(&request, Locale::En);
        assert!(prompt.contains("\"Boulangerie Martin\""));
        assert!(prompt.contains("3 rue Mercière"));
        assert!(prompt.contains("Bakery"));
        assert!(prompt.contains("rating: \"4.5\""));
    }
}
