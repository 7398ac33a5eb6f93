//! Shared utilities for stockdex
//!
//! This crate provides common functionality used across the stockdex workspace:
//! logging setup and application-level configuration.

pub mod config;
pub mod logging;

pub use config::{AppConfig, Environment};
pub use logging::{init_json_tracing, init_tracing, init_tracing_with};
