//! Configuration for the dashboard client

use crate::error::{DashboardError, Result};
use crate::histogram::DEFAULT_BIN_COUNT;
use crate::team::DEFAULT_TEAM_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default analytics API
pub const DEFAULT_API_BASE_URL: &str = "https://stockdex-api.vercel.app";

/// Configuration for the dashboard client and controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the analytics API
    pub api_base_url: String,

    /// Input quiescence required before a suggestion lookup is issued
    pub search_debounce: Duration,

    /// Queries shorter than this (in characters) never hit the network
    pub min_query_len: usize,

    /// Maximum number of suggestions kept from a lookup
    pub max_suggestions: usize,

    /// Delay between a team mutation and the team-risk refetch
    pub risk_refetch_debounce: Duration,

    /// Maximum number of team members
    pub team_capacity: usize,

    /// Number of buckets in the return histogram
    pub histogram_bins: usize,

    /// Cache TTL for analysis and risk responses (zero disables caching)
    pub cache_ttl: Duration,

    /// Client-side request budget
    pub rate_limit_per_minute: u32,

    /// Request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            search_debounce: Duration::from_millis(300),
            min_query_len: 2,
            max_suggestions: 10,
            risk_refetch_debounce: Duration::from_millis(500),
            team_capacity: DEFAULT_TEAM_CAPACITY,
            histogram_bins: DEFAULT_BIN_COUNT,
            cache_ttl: Duration::from_secs(300), // 5 minutes
            rate_limit_per_minute: 120,
            request_timeout: None,
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Load the API base URL from `STOCKDEX_API_URL` if set
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("STOCKDEX_API_URL") {
            self.api_base_url = url;
        }
        self
    }

    /// Parsed base URL, always ending in `/` so relative joins keep any path prefix
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.api_base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url().map_err(|e| {
            DashboardError::Config(format!("invalid api_base_url '{}': {e}", self.api_base_url))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DashboardError::Config(format!(
                "api_base_url must be http(s), got {}",
                url.scheme()
            )));
        }

        if self.team_capacity == 0 {
            return Err(DashboardError::Config(
                "team_capacity must be greater than 0".to_string(),
            ));
        }

        if self.histogram_bins == 0 {
            return Err(DashboardError::Config(
                "histogram_bins must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit_per_minute == 0 {
            return Err(DashboardError::Config(
                "rate_limit_per_minute must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for DashboardConfig
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    api_base_url: Option<String>,
    search_debounce: Option<Duration>,
    min_query_len: Option<usize>,
    max_suggestions: Option<usize>,
    risk_refetch_debounce: Option<Duration>,
    team_capacity: Option<usize>,
    histogram_bins: Option<usize>,
    cache_ttl: Option<Duration>,
    rate_limit_per_minute: Option<u32>,
    request_timeout: Option<Duration>,
}

impl DashboardConfigBuilder {
    /// Set the API base URL
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the search debounce delay
    pub fn search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = Some(delay);
        self
    }

    /// Set the minimum query length
    pub fn min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = Some(len);
        self
    }

    /// Set the maximum number of suggestions
    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = Some(max);
        self
    }

    /// Set the team-risk refetch debounce delay
    pub fn risk_refetch_debounce(mut self, delay: Duration) -> Self {
        self.risk_refetch_debounce = Some(delay);
        self
    }

    /// Set the team capacity
    pub fn team_capacity(mut self, capacity: usize) -> Self {
        self.team_capacity = Some(capacity);
        self
    }

    /// Set the histogram bucket count
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the response cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set the client-side rate limit
    pub fn rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = Some(limit);
        self
    }

    /// Set a request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load the API base URL from `STOCKDEX_API_URL` if set
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("STOCKDEX_API_URL") {
            self.api_base_url = Some(url);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<DashboardConfig> {
        let defaults = DashboardConfig::default();

        let config = DashboardConfig {
            api_base_url: self.api_base_url.unwrap_or(defaults.api_base_url),
            search_debounce: self.search_debounce.unwrap_or(defaults.search_debounce),
            min_query_len: self.min_query_len.unwrap_or(defaults.min_query_len),
            max_suggestions: self.max_suggestions.unwrap_or(defaults.max_suggestions),
            risk_refetch_debounce: self
                .risk_refetch_debounce
                .unwrap_or(defaults.risk_refetch_debounce),
            team_capacity: self.team_capacity.unwrap_or(defaults.team_capacity),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            rate_limit_per_minute: self
                .rate_limit_per_minute
                .unwrap_or(defaults.rate_limit_per_minute),
            request_timeout: self.request_timeout.or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}
