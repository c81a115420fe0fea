use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Failure of a call to the hosted AI provider, classified so the caller can
/// tell a bad key from an exhausted quota or a network problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    Network(String),
    /// The provider rejected the API key (401/403).
    Unauthorized(String),
    /// Rate limit or quota exhausted (429).
    QuotaExceeded(String),
    /// Any other non-success status.
    Api { status: u16, message: String },
    /// The response did not match the expected schema.
    Malformed(String),
}

impl ProviderError {
    /// Maps a non-success HTTP status to its failure class.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ProviderError::Unauthorized(message),
            429 => ProviderError::QuotaExceeded(message),
            _ => ProviderError::Api { status, message },
        }
    }

    /// Short machine-readable failure class.
    pub fn class(&self) -> &'static str {
        match self {
            ProviderError::Network(_) => "network",
            ProviderError::Unauthorized(_) => "auth",
            ProviderError::QuotaExceeded(_) => "quota",
            ProviderError::Api { .. } => "api",
            ProviderError::Malformed(_) => "malformed",
        }
    }

    /// Message shown to the person who started the search.
    pub fn user_message(&self) -> String {
        let reason = match self {
            ProviderError::Network(_) => "the AI provider could not be reached",
            ProviderError::Unauthorized(_) => "the API key was rejected",
            ProviderError::QuotaExceeded(_) => "the API quota is exhausted",
            ProviderError::Api { .. } => "the AI provider returned an error",
            ProviderError::Malformed(_) => "the AI provider returned an unreadable response",
        };
        format!("Failed to fetch leads: {}. Please check your API key and quota.", reason)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Network(msg) => write!(f, "Network error: {}", msg),
            ProviderError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ProviderError::QuotaExceeded(msg) => write!(f, "Quota exceeded: {}", msg),
            ProviderError::Api { status, message } => {
                write!(f, "Provider returned {}: {}", status, message)
            }
            ProviderError::Malformed(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Resource not found error.
    NotFound(String),
    /// Bad request error (invalid input).
    BadRequest(String),
    /// The session is busy with an operation that cannot run twice.
    Conflict(String),
    /// Error interacting with the AI provider.
    Provider(ProviderError),
    /// CSV export could not be produced.
    ExportError(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Provider(e) => write!(f, "AI provider error: {}", e),
            AppError::ExportError(msg) => write!(f, "Export error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to an HTTP status code and JSON body.
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Provider(e) => {
                tracing::error!("AI provider error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": e.user_message(), "kind": e.class() }),
                )
            }
            AppError::ExportError(msg) => {
                tracing::error!("Export failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                return (**source).clone().into_response();
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

/// File-system failures while exporting become `ExportError`.
impl<T> ResultExt<T> for Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::ExportError(e.to_string())),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::ExportError(e.to_string())),
            context: f(),
        })
    }
}
