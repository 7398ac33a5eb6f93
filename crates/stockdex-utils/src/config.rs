//! Application-level configuration shared by stockdex binaries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Parse an environment name, falling back to development
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name
    pub app_name: String,
    /// Environment (development, production)
    pub environment: Environment,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "stockdex".to_string(),
            environment: Environment::Development,
            log_filter: "warn,stockdex=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `STOCKDEX_ENV`; production builds log less by default
    pub fn from_env() -> Self {
        let environment = std::env::var("STOCKDEX_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();
        Self::for_environment(environment)
    }

    /// Defaults for the given environment
    pub fn for_environment(environment: Environment) -> Self {
        let log_filter = match environment {
            Environment::Development => "warn,stockdex=debug",
            Environment::Production => "warn,stockdex=info",
        };
        Self {
            environment,
            log_filter: log_filter.to_string(),
            ..Self::default()
        }
    }
}
