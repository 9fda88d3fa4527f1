//! Lingua Gateway - Cloud translation gateway with usage quotas
//!
//! This library wraps a remote translation/detection service behind a quota
//! gate (daily and monthly caps with calendar rollover), a request
//! orchestrator with session history, and HTTP/CLI front ends.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    client::{LanguageService, RemoteClient},
    config::GatewayConfig,
    errors::{GatewayError, Result, ServiceErrorCategory},
    models::{
        Detection, HistoryEntry, TranslationOutcome, TranslationRequest, UsageCounters,
    },
    orchestrator::TranslationOrchestrator,
    usage::UsageLimiter,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
