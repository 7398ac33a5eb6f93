//! Client for the Stockdex analytics API
//!
//! [`DashboardApi`] is the seam between the dashboard logic and the transport.
//! [`HttpDashboardClient`] talks JSON over HTTP; tests use the generated
//! `MockDashboardApi`.

pub mod client;

pub use client::HttpDashboardClient;

use crate::error::Result;
use crate::model::{RiskMetrics, StockRecord, Suggestion, TeamAnalysis};
use async_trait::async_trait;
use std::sync::Arc;

/// The four calls the dashboard makes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /analyze/{ticker}`
    async fn analyze(&self, ticker: &str) -> Result<Arc<StockRecord>>;

    /// `GET /search?q={query}`
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>>;

    /// `POST /analyze-team`
    async fn analyze_team(&self, tickers: &[String]) -> Result<TeamAnalysis>;

    /// `GET /api/v1/risk-metrics/{ticker}`
    async fn risk_metrics(&self, ticker: &str) -> Result<Arc<RiskMetrics>>;
}
