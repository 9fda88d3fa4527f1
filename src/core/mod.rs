//! Core gateway module

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod usage;
