//! Custom error types for gateway operations

use thiserror::Error;

/// Best-effort category for remote service failures.
///
/// The remote service exposes no structured error code, so categories are
/// recovered by matching recognizable substrings in the raw message. This is
/// a fallback classification layer, not a contract with the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorCategory {
    /// The language service is not enabled for the tenancy
    ServiceNotEnabled,
    /// The request named an invalid language code
    BadLanguageCode,
    /// Generic bad request rejected by the API
    BadRequest,
    /// Anything else, including network failures and timeouts
    Other,
}

impl ServiceErrorCategory {
    /// Classify a raw error message by recognizable substrings
    pub fn classify(message: &str) -> Self {
        if message.contains("NotAuthorizedOrNotFound") {
            ServiceErrorCategory::ServiceNotEnabled
        } else if message.contains("BadRequest") && message.contains("Languagecode") {
            ServiceErrorCategory::BadLanguageCode
        } else if message.contains("400") {
            ServiceErrorCategory::BadRequest
        } else {
            ServiceErrorCategory::Other
        }
    }

    /// Human-readable label for error rendering
    pub fn label(&self) -> &'static str {
        match self {
            ServiceErrorCategory::ServiceNotEnabled => {
                "Language service not enabled for this tenancy"
            }
            ServiceErrorCategory::BadLanguageCode => "Invalid source or target language code",
            ServiceErrorCategory::BadRequest => "Request rejected by the language service",
            ServiceErrorCategory::Other => "Translation service error",
        }
    }
}

impl std::fmt::Display for ServiceErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Gateway errors
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Input rejected before any remote call
    #[error("No text provided")]
    Validation,

    /// Daily or monthly quota reached
    #[error("Quota exceeded: {reason}")]
    QuotaExceeded {
        reason: String,
    },

    /// Remote detection/translation failure
    #[error("{}: {message}", .category.label())]
    Service {
        category: ServiceErrorCategory,
        message: String,
    },

    /// Required configuration fields are missing
    #[error("Missing configuration fields: {}", .fields.join(", "))]
    MissingConfig {
        fields: Vec<String>,
    },

    /// Other configuration problem
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Invalid response from the remote service
    #[error("Invalid response: {message}")]
    InvalidResponse {
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GatewayError {
    /// Wrap a raw remote failure message, classifying it on the way
    pub fn service(message: impl Into<String>) -> Self {
        let message = message.into();
        GatewayError::Service {
            category: ServiceErrorCategory::classify(&message),
            message,
        }
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
