//! Configuration management

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::errors::{GatewayError, Result};

/// Default daily translation limit
pub const DEFAULT_DAILY_LIMIT: u32 = 100;

/// Default monthly translation limit
pub const DEFAULT_MONTHLY_LIMIT: u32 = 1000;

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub api_key: String,
    pub compartment_id: String,
    pub region: String,
    pub endpoint: String,
    pub timeout_ms: u64,
    pub daily_limit: u32,
    pub monthly_limit: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let region = "us-ashburn-1".to_string();
        Self {
            api_key: String::new(),
            compartment_id: String::new(),
            endpoint: endpoint_for_region(&region),
            region,
            timeout_ms: 30000,
            daily_limit: DEFAULT_DAILY_LIMIT,
            monthly_limit: DEFAULT_MONTHLY_LIMIT,
        }
    }
}

/// Service endpoint for a region
fn endpoint_for_region(region: &str) -> String {
    format!("https://language.aiservice.{}.oci.oraclecloud.com/20221001", region)
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LANGUAGE_API_KEY").unwrap_or_default();
        let compartment_id = std::env::var("LANGUAGE_COMPARTMENT_ID").unwrap_or_default();

        let region = std::env::var("LANGUAGE_REGION")
            .unwrap_or_else(|_| "us-ashburn-1".to_string());

        let endpoint = std::env::var("LANGUAGE_ENDPOINT")
            .unwrap_or_else(|_| endpoint_for_region(&region));

        let timeout_ms = parse_env("REQUEST_TIMEOUT_MS", 30000)?;
        let daily_limit = parse_env("DAILY_TRANSLATION_LIMIT", DEFAULT_DAILY_LIMIT)?;
        let monthly_limit = parse_env("MONTHLY_TRANSLATION_LIMIT", DEFAULT_MONTHLY_LIMIT)?;

        Ok(Self {
            api_key,
            compartment_id,
            region,
            endpoint,
            timeout_ms,
            daily_limit,
            monthly_limit,
        })
    }

    /// Load and validate configuration
    pub fn load() -> Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        info!(
            region = %config.region,
            daily_limit = config.daily_limit,
            monthly_limit = config.monthly_limit,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate configuration, listing every missing required field
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();

        if self.api_key.is_empty() {
            missing.push("api_key".to_string());
        }
        if self.compartment_id.is_empty() {
            missing.push("compartment_id".to_string());
        }
        if self.endpoint.is_empty() {
            missing.push("endpoint".to_string());
        }

        if !missing.is_empty() {
            return Err(GatewayError::MissingConfig { fields: missing });
        }

        if self.timeout_ms == 0 {
            return Err(GatewayError::ConfigError {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Parse an env var into a number, falling back to a default when unset
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw.parse::<T>().map_err(|_| GatewayError::ConfigError {
            message: format!("{} must be a number, got '{}'", name, raw),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lists_all_missing_fields() {
        let config = GatewayConfig {
            api_key: String::new(),
            compartment_id: String::new(),
            ..Default::default()
        };

        match config.validate() {
            Err(GatewayError::MissingConfig { fields }) => {
                assert_eq!(fields, vec!["api_key", "compartment_id"]);
            }
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_accepts_complete_config() {
        let config = GatewayConfig {
            api_key: "test_key".to_string(),
            compartment_id: "ocid1.compartment.test".to_string(),
            ..Default::default()
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = GatewayConfig {
            api_key: "test_key".to_string(),
            compartment_id: "ocid1.compartment.test".to_string(),
            timeout_ms: 0,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_limits() {
        let config = GatewayConfig::default();
        assert_eq!(config.daily_limit, 100);
        assert_eq!(config.monthly_limit, 1000);
        assert!(config.endpoint.contains("us-ashburn-1"));
    }
}
