//! Remote language service client

use std::time::Duration;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::config::GatewayConfig;
use crate::core::errors::{GatewayError, Result};
use crate::core::models::Detection;

/// Document key used for single-text requests
const DOCUMENT_KEY: &str = "user_input";

/// Capability interface for the remote translation/detection backend.
///
/// The production implementation is [`RemoteClient`]; tests substitute mock
/// services to exercise the orchestrator without network access.
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Detect the dominant language of `text`.
    ///
    /// Detection failures are not hard errors: a backend problem or an
    /// inconclusive result both surface as [`Detection::Unknown`].
    async fn detect_language(&self, text: &str) -> Detection;

    /// Translate `text` from `source_lang` to `target_lang`
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str)
        -> Result<String>;
}

/// Reqwest-backed client for the cloud language API
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    compartment_id: String,
}

impl RemoteClient {
    /// Create a client from validated configuration
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            compartment_id: config.compartment_id.clone(),
        })
    }

    /// POST a JSON body to an API action, returning the parsed response.
    ///
    /// Non-success responses become `Service` errors carrying the raw body so
    /// the category classifier can inspect it.
    async fn post_action(
        &self,
        action: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/actions/{}", self.endpoint, action);
        debug!(%url, "Calling language service");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::service(format!("{} {}", status.as_u16(), error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse { message: e.to_string() })
    }
}

#[async_trait]
impl LanguageService for RemoteClient {
    async fn detect_language(&self, text: &str) -> Detection {
        let body = serde_json::json!({
            "compartmentId": self.compartment_id,
            "documents": [{
                "key": DOCUMENT_KEY,
                "text": text,
            }]
        });

        let json = match self.post_action("batchDetectDominantLanguage", &body).await {
            Ok(json) => json,
            Err(e) => {
                warn!("Language detection failed: {}", e);
                return Detection::Unknown;
            }
        };

        json["documents"]
            .get(0)
            .and_then(|doc| doc["languages"].get(0))
            .and_then(|lang| lang["code"].as_str())
            .map(|code| Detection::Code(code.to_string()))
            .unwrap_or(Detection::Unknown)
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String> {
        let body = serde_json::json!({
            "compartmentId": self.compartment_id,
            "targetLanguageCode": target_lang,
            "documents": [{
                "key": DOCUMENT_KEY,
                "text": text,
                "languageCode": source_lang,
            }]
        });

        let json = self.post_action("batchLanguageTranslation", &body).await?;

        json["documents"]
            .get(0)
            .and_then(|doc| doc["translatedText"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| GatewayError::InvalidResponse {
                message: "No translation in response".to_string(),
            })
    }
}
