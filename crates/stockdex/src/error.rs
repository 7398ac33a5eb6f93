//! Error types for dashboard operations

use thiserror::Error;

/// Dashboard specific errors
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The API answered with a non-success status
    #[error("API error: {endpoint} returned {status}")]
    Api {
        endpoint: String,
        status: u16,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Ticker is already the primary/compare record or already in the team
    #[error("Duplicate ticker in {slot}: {ticker}")]
    DuplicateTicker {
        ticker: String,
        slot: Slot,
    },

    /// Team is at capacity
    #[error("Team is full (max {capacity})")]
    TeamFull {
        capacity: usize,
    },

    /// Ticker failed validation before any request was made
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Shell command could not be parsed
    #[error("Command error: {0}")]
    Command(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl DashboardError {
    /// True for failures of the fetch itself (transport, status, decoding)
    pub fn is_network_or_api(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::Network(_) | Self::Json(_) | Self::InvalidUrl(_)
        )
    }

    /// The single message shown to the user for a failed operation
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { .. } | Self::Network(_) | Self::Json(_) | Self::InvalidUrl(_) => {
                "Stock not found or API error".to_string()
            }
            Self::DuplicateTicker {
                slot: Slot::Compare,
                ..
            } => "Cannot compare same stock".to_string(),
            Self::DuplicateTicker {
                ticker,
                slot: Slot::Team,
            } => format!("{ticker} is already in your team"),
            Self::TeamFull { capacity } => format!("Team is full (max {capacity})"),
            Self::InvalidTicker(ticker) => format!("'{ticker}' is not a valid ticker"),
            other => other.to_string(),
        }
    }
}

/// Where a duplicate ticker was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Compare,
    Team,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Compare => write!(f, "compare"),
            Slot::Team => write!(f, "team"),
        }
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Other(err.to_string())
    }
}
