//! HTTP API server implementation

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::client::{LanguageService, RemoteClient};
use crate::core::config::GatewayConfig;
use crate::core::errors::{GatewayError, ServiceErrorCategory};
use crate::core::models::{
    language_name, Detection, HistoryEntry, TranslationRequest, UsageCounters, AUTO_SOURCE,
    SUPPORTED_LANGUAGES,
};
use crate::core::orchestrator::TranslationOrchestrator;
use crate::core::usage::UsageLimiter;

/// Application state.
///
/// `orchestrator` is `None` when the remote service could not be configured;
/// the server still starts so /health can report the condition.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Option<Arc<TranslationOrchestrator>>,
    service: Option<Arc<dyn LanguageService>>,
}

/// Translation request body
#[derive(Deserialize)]
pub struct TranslateBody {
    pub text: String,
    #[serde(default = "default_target")]
    pub target_language: String,
    #[serde(default = "default_source")]
    pub source_language: String,
}

fn default_target() -> String {
    "ja".to_string()
}

fn default_source() -> String {
    AUTO_SOURCE.to_string()
}

/// Translation response
#[derive(Serialize)]
pub struct TranslateResponse {
    pub original_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub detected_language: Option<String>,
}

/// Detection request body
#[derive(Deserialize)]
pub struct DetectBody {
    pub text: String,
}

/// Detection response
#[derive(Serialize)]
pub struct DetectResponse {
    pub detected_language: String,
    pub language_name: String,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service_ready: bool,
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ServiceErrorCategory>,
}

/// Gateway error mapped to an HTTP response
pub struct ApiError(GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            GatewayError::Validation => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "No text provided".to_string(),
                    category: None,
                },
            ),
            GatewayError::QuotaExceeded { reason } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorBody {
                    error: reason.clone(),
                    category: None,
                },
            ),
            GatewayError::Service { category, message } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    error: format!("{}: {}", category.label(), message),
                    category: Some(*category),
                },
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: other.to_string(),
                    category: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// 503 when the remote service was never configured
fn service_unavailable() -> ApiError {
    ApiError(GatewayError::ConfigError {
        message: "Translation service not configured".to_string(),
    })
}

/// Translation endpoint
async fn translate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateBody>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let orchestrator = state.orchestrator.as_ref().ok_or_else(service_unavailable)?;

    let request = TranslationRequest::new(body.text, body.target_language)
        .with_source_lang(body.source_language);
    let outcome = orchestrator.handle_translation(&request).await?;

    Ok(Json(TranslateResponse {
        original_text: outcome.original_text,
        translated_text: outcome.translated_text,
        source_language: outcome.source_lang,
        target_language: outcome.target_lang,
        detected_language: outcome.detected_lang,
    }))
}

/// Language detection endpoint
async fn detect_language(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DetectBody>,
) -> Result<Json<DetectResponse>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError(GatewayError::Validation));
    }

    let service = state.service.as_ref().ok_or_else(service_unavailable)?;

    let detected = match service.detect_language(body.text.trim()).await {
        Detection::Code(code) => code,
        Detection::Unknown => "unknown".to_string(),
    };

    let name = language_name(&detected).unwrap_or("Unknown").to_string();

    Ok(Json(DetectResponse {
        detected_language: detected,
        language_name: name,
    }))
}

/// Health check handler
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service_ready: state.orchestrator.is_some(),
    })
}

/// Supported-language table handler
async fn languages() -> Json<BTreeMap<&'static str, &'static str>> {
    Json(SUPPORTED_LANGUAGES.iter().copied().collect())
}

/// Usage snapshot handler
async fn usage(State(state): State<Arc<AppState>>) -> Result<Json<UsageCounters>, ApiError> {
    let orchestrator = state.orchestrator.as_ref().ok_or_else(service_unavailable)?;
    Ok(Json(orchestrator.usage().await))
}

/// History handler, most recent first
async fn history(State(state): State<Arc<AppState>>) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let orchestrator = state.orchestrator.as_ref().ok_or_else(service_unavailable)?;
    Ok(Json(orchestrator.history().await))
}

/// Build the router for the given state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .route("/detect_language", post(detect_language))
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/usage", get(usage))
        .route("/history", get(history))
        .with_state(state)
}

/// Build application state from configuration.
///
/// An incomplete configuration does not prevent startup; the gateway comes
/// up with the service marked not ready, matching /health reporting.
pub fn build_state(config: &GatewayConfig) -> Arc<AppState> {
    match RemoteClient::new(config) {
        Ok(client) => {
            let service: Arc<dyn LanguageService> = Arc::new(client);
            let limiter = UsageLimiter::new(config.daily_limit, config.monthly_limit);
            let orchestrator = Arc::new(TranslationOrchestrator::new(service.clone(), limiter));
            Arc::new(AppState {
                orchestrator: Some(orchestrator),
                service: Some(service),
            })
        }
        Err(e) => {
            warn!("Remote service not configured: {}", e);
            Arc::new(AppState {
                orchestrator: None,
                service: None,
            })
        }
    }
}

/// Run the HTTP server
pub async fn run_server(host: String, port: u16) -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;
    let state = build_state(&config);

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
