//! Risk payloads: single-ticker VaR metrics and team correlation analysis

use super::null_as_default;
use super::stats::RadarStats;
use serde::{Deserialize, Serialize};

/// Response of `GET /api/v1/risk-metrics/{ticker}`
///
/// `var` and `cvar` are signed daily-return thresholds (-0.023 = -2.3%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    #[serde(default)]
    pub ticker: Option<String>,
    pub var: f64,
    pub cvar: f64,
    /// Daily fractional returns over the trailing window
    #[serde(default, deserialize_with = "null_as_default")]
    pub returns: Vec<f64>,
    #[serde(default)]
    pub mean_return: Option<f64>,
    #[serde(default)]
    pub volatility: Option<f64>,
    #[serde(default)]
    pub confidence_level: Option<f64>,
}

/// Pairwise return correlation of the team members
///
/// Symmetric by construction upstream; not checked here. The API sends `{}`
/// when it could not compute a matrix, which decodes as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub matrix: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Coefficient for a ticker pair
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.position(row)?;
        let c = self.position(col)?;
        self.matrix.get(r)?.get(c).copied()
    }

    /// True when the matrix has one row and one column per ticker
    pub fn is_square(&self) -> bool {
        self.matrix.len() == self.tickers.len()
            && self.matrix.iter().all(|row| row.len() == self.tickers.len())
    }

    fn position(&self, ticker: &str) -> Option<usize> {
        self.tickers
            .iter()
            .position(|t| t.eq_ignore_ascii_case(ticker))
    }
}

/// Share of the team in one sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorShare {
    pub sector: String,
    pub count: usize,
    /// Percentage of members, one decimal
    pub percentage: f64,
}

/// Response of `POST /analyze-team`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_analysis: CorrelationMatrix,
    #[serde(default)]
    pub team_stats: Option<RadarStats>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_composition: Vec<SectorShare>,
    #[serde(default)]
    pub member_count: Option<usize>,
}
