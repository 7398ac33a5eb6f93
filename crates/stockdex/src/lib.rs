//! Stockdex dashboard core
//!
//! Client-side logic for a stock dashboard backed by the Stockdex analytics
//! API. It includes:
//!
//! - A typed HTTP client for the analyze, search, team and risk endpoints,
//!   with response caching and client-side rate limiting
//! - Team aggregation: averaged radar stats, fundamentals and sector mix
//! - Histogram bucketing of daily returns with value-at-risk tail marking
//! - Debounced, last-query-wins ticker suggestions
//! - A fetch and mode controller (single, compare, team) over one state object
//! - A terminal shell that drives the controller
//!
//! # Architecture
//!
//! Everything network-facing goes through the [`DashboardApi`] trait. The
//! [`DashboardController`] applies fetched records to a [`DashboardState`]
//! according to the current [`Mode`]; derived data ([`TeamAggregate`],
//! [`Histogram`]) is recomputed from scratch on every change.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockdex::{DashboardConfig, DashboardController, HttpDashboardClient, Mode};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::default().with_env();
//!     let api = Arc::new(HttpDashboardClient::new(&config)?);
//!     let controller = DashboardController::new(api, &config);
//!
//!     controller.set_mode(Mode::Team);
//!     controller.search("AAPL").await?;
//!     controller.search("MSFT").await?;
//!
//!     let state = controller.snapshot();
//!     println!("{:?}", state.team_aggregate);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod histogram;
pub mod model;
pub mod schedule;
pub mod search;
pub mod shell;
pub mod team;

// Re-export main types for convenience
pub use api::{DashboardApi, HttpDashboardClient};
pub use config::DashboardConfig;
pub use controller::{DashboardController, DashboardState, FetchState, Mode, RiskView};
pub use error::{DashboardError, Result};
pub use histogram::{Bucket, Histogram};
pub use model::{
    CorrelationMatrix, RadarStats, RawStats, RiskMetrics, StatKey, StockRecord, Suggestion,
    TeamAnalysis,
};
pub use search::SearchResolver;
pub use team::{Team, TeamAggregate};
