//! Wire and domain types for the analytics API

pub mod record;
pub mod risk;
pub mod stats;

pub use record::{PricePoint, RawStats, RawValue, StockRecord, Suggestion};
pub use risk::{CorrelationMatrix, RiskMetrics, SectorShare, TeamAnalysis};
pub use stats::{RadarStats, StatKey, StatsSchema};

use serde::{Deserialize, Deserializer};

/// Read a JSON value as a finite number, accepting numeric strings
pub(crate) fn value_as_f64(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Treat an explicit `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
