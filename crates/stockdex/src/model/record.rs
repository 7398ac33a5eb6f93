//! Stock analysis records

use super::stats::RadarStats;
use super::{null_as_default, value_as_f64};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw fundamental as the API sent it
///
/// The API forwards upstream values untouched, so a field may be a number, a
/// numeric string or something else entirely. Decoding never fails on it;
/// [`RawValue::parse`] decides whether it is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    /// Finite numeric value, if any
    pub fn parse(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n).filter(|v| v.is_finite()),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Self::Other(v) => value_as_f64(v),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Raw fundamentals shown next to the radar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub market_cap: Option<RawValue>,
    #[serde(default)]
    pub pe_ratio: Option<RawValue>,
    /// Decimal fraction, 0.0056 = 0.56%
    #[serde(default)]
    pub dividend_yield: Option<RawValue>,
    #[serde(default)]
    pub fifty_two_week_high: Option<RawValue>,
    #[serde(default)]
    pub fifty_two_week_low: Option<RawValue>,
    #[serde(default)]
    pub avg_volume: Option<RawValue>,
}

impl RawStats {
    pub fn market_cap(&self) -> Option<f64> {
        self.market_cap.as_ref().and_then(RawValue::parse)
    }

    pub fn pe_ratio(&self) -> Option<f64> {
        self.pe_ratio.as_ref().and_then(RawValue::parse)
    }

    pub fn dividend_yield(&self) -> Option<f64> {
        self.dividend_yield.as_ref().and_then(RawValue::parse)
    }

    pub fn fifty_two_week_high(&self) -> Option<f64> {
        self.fifty_two_week_high.as_ref().and_then(RawValue::parse)
    }

    pub fn fifty_two_week_low(&self) -> Option<f64> {
        self.fifty_two_week_low.as_ref().and_then(RawValue::parse)
    }

    pub fn avg_volume(&self) -> Option<f64> {
        self.avg_volume.as_ref().and_then(RawValue::parse)
    }
}

/// One closing price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// One analyzed security, as returned by `GET /analyze/{ticker}`
///
/// Records are never patched: a re-fetch produces a new record that replaces
/// the old one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub ticker: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Industry label, used for colour mapping only
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub stats: RadarStats,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_stats: RawStats,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<PricePoint>,
}

impl StockRecord {
    /// Display name, falling back to the ticker
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ticker)
    }

    /// Case-insensitive ticker comparison
    pub fn is_ticker(&self, ticker: &str) -> bool {
        self.ticker.eq_ignore_ascii_case(ticker)
    }

    /// Most recent price in the history
    pub fn last_price(&self) -> Option<f64> {
        self.history.last().map(|p| p.price)
    }

    /// Relative change from the first to the last history point
    pub fn period_change(&self) -> Option<f64> {
        let first = self.history.first()?.price;
        let last = self.history.last()?.price;
        (first != 0.0).then(|| (last - first) / first)
    }
}

/// A ticker suggestion for the search box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub symbol: String,
    pub shortname: String,
}
