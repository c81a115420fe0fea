use crate::locale::Locale;
use std::fmt;
use std::str::FromStr;

/// Which hosted model backs the `GroundedSearchProvider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.5-flash",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "open-ai" => Ok(ProviderKind::OpenAi),
            other => anyhow::bail!("AI_PROVIDER must be 'gemini' or 'openai', got '{}'", other),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub provider: ProviderKind,
    pub api_key: String,
    pub provider_base_url: Option<String>, // Falls back to the provider's public endpoint
    pub model: String,
    pub request_timeout_secs: u64,
    pub enrich_batch_size: usize,
    pub locale: Locale,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let provider: ProviderKind = std::env::var("AI_PROVIDER")
            .unwrap_or_else(|_| "gemini".to_string())
            .parse()?;

        let api_key = match provider {
            ProviderKind::Gemini => std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .map_err(|_| {
                    anyhow::anyhow!("GEMINI_API_KEY or API_KEY environment variable required")
                }),
            ProviderKind::OpenAi => std::env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable required")),
        }
        .and_then(|key| {
            if key.trim().is_empty() {
                anyhow::bail!("AI provider API key cannot be empty");
            }
            Ok(key)
        })?;

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            provider,
            api_key,
            provider_base_url: match std::env::var("AI_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
            {
                Some(url) => {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("AI_BASE_URL must start with http:// or https://");
                    }
                    Some(url.trim_end_matches('/').to_string())
                }
                None => None,
            },
            model: std::env::var("AI_MODEL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| provider.default_model().to_string()),
            request_timeout_secs: std::env::var("AI_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("AI_TIMEOUT_SECS must be a number of seconds"))?,
            enrich_batch_size: std::env::var("ENRICH_BATCH_SIZE")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("ENRICH_BATCH_SIZE must be a positive number"))
                .and_then(|size: usize| {
                    if size == 0 {
                        anyhow::bail!("ENRICH_BATCH_SIZE must be at least 1");
                    }
                    Ok(size)
                })?,
            locale: std::env::var("PROSPECT_LOCALE")
                .unwrap_or_else(|_| "fr".to_string())
                .parse()?,
        };

        // Never log the API key
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("AI provider: {} (model {})", config.provider, config.model);
        if let Some(ref base_url) = config.provider_base_url {
            tracing::info!("AI base URL override: {}", base_url);
        }
        tracing::debug!(
            "Enrichment batch size: {}, locale: {}",
            config.enrich_batch_size,
            config.locale
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
