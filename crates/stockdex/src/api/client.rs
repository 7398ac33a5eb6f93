//! HTTP implementation of [`DashboardApi`]

use super::DashboardApi;
use crate::cache::ApiCache;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::model::{RiskMetrics, StockRecord, Suggestion, TeamAnalysis};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use url::Url;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Search result as sent by the API; either field may be missing
#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    shortname: Option<String>,
}

impl SuggestionPayload {
    fn into_suggestion(self) -> Option<Suggestion> {
        let symbol = self.symbol.filter(|s| !s.trim().is_empty())?;
        Some(Suggestion {
            symbol,
            shortname: self.shortname.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
struct TeamRequest<'a> {
    tickers: &'a [String],
}

/// Stockdex API client
///
/// Requests are rate limited client-side. Analysis and risk responses are
/// cached per ticker for the configured TTL.
#[derive(Clone)]
pub struct HttpDashboardClient {
    client: Client,
    base_url: Url,
    rate_limiter: SharedRateLimiter,
    cache: ApiCache,
}

impl HttpDashboardClient {
    /// Create a client from a validated configuration
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;

        let mut builder =
            Client::builder().user_agent(concat!("stockdex/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let rate = NonZeroU32::new(config.rate_limit_per_minute).ok_or_else(|| {
            DashboardError::Config("rate_limit_per_minute must be greater than zero".to_string())
        })?;

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url()?,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(rate))),
            cache: ApiCache::new(config.cache_ttl),
        })
    }

    /// Create a client with default settings and `STOCKDEX_API_URL` applied
    pub fn from_env() -> Result<Self> {
        Self::new(&DashboardConfig::default().with_env())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cache(&self) -> &ApiCache {
        &self.cache
    }

    /// Build an endpoint URL below the base, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| DashboardError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let request = request.build()?;
        let endpoint = request.url().path().to_string();
        tracing::debug!("{} {}", request.method(), request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned {}", endpoint, status);
            return Err(DashboardError::Api {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_record(&self, ticker: &str) -> Result<Arc<StockRecord>> {
        let url = self.endpoint(&["analyze", ticker])?;
        let record: StockRecord = self.send_json(self.client.get(url)).await?;
        Ok(Arc::new(record))
    }

    async fn fetch_risk(&self, ticker: &str) -> Result<Arc<RiskMetrics>> {
        let url = self.endpoint(&["api", "v1", "risk-metrics", ticker])?;
        let mut metrics: RiskMetrics = self.send_json(self.client.get(url)).await?;
        if metrics.ticker.is_none() {
            metrics.ticker = Some(ticker.to_string());
        }
        Ok(Arc::new(metrics))
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn analyze(&self, ticker: &str) -> Result<Arc<StockRecord>> {
        let ticker = ticker.to_uppercase();
        self.cache
            .analysis
            .get_or_fetch(ticker.clone(), || self.fetch_record(&ticker))
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Suggestion>> {
        let mut url = self.endpoint(&["search"])?;
        url.query_pairs_mut().append_pair("q", query);

        let payload: Vec<SuggestionPayload> = self.send_json(self.client.get(url)).await?;
        Ok(payload
            .into_iter()
            .filter_map(SuggestionPayload::into_suggestion)
            .collect())
    }

    async fn analyze_team(&self, tickers: &[String]) -> Result<TeamAnalysis> {
        let url = self.endpoint(&["analyze-team"])?;
        let request = self.client.post(url).json(&TeamRequest { tickers });
        self.send_json(request).await
    }

    async fn risk_metrics(&self, ticker: &str) -> Result<Arc<RiskMetrics>> {
        let ticker = ticker.to_uppercase();
        self.cache
            .risk
            .get_or_fetch(ticker.clone(), || self.fetch_risk(&ticker))
            .await
    }
}
