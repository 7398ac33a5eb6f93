//! Radar stats and the legacy stat-name adapter
//!
//! Older payloads name the six scores HP, Attack, Defense, Speed, SpDef and
//! SpAtk. They are mapped positionally onto the canonical names once, when
//! the record is decoded; nothing downstream ever sees the legacy keys.

use super::value_as_f64;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// One of the six canonical radar scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKey {
    Liquidity,
    Growth,
    Profitability,
    Volatility,
    Solvency,
    Innovation,
}

impl StatKey {
    /// All keys in radar order
    pub const ALL: [StatKey; 6] = [
        StatKey::Liquidity,
        StatKey::Growth,
        StatKey::Profitability,
        StatKey::Volatility,
        StatKey::Solvency,
        StatKey::Innovation,
    ];

    /// Canonical payload key
    pub fn name(self) -> &'static str {
        match self {
            Self::Liquidity => "Liquidity",
            Self::Growth => "Growth",
            Self::Profitability => "Profitability",
            Self::Volatility => "Volatility",
            Self::Solvency => "Solvency",
            Self::Innovation => "Innovation",
        }
    }

    /// Key used by the legacy schema for the same position
    pub fn legacy_name(self) -> &'static str {
        match self {
            Self::Liquidity => "HP",
            Self::Growth => "Attack",
            Self::Profitability => "Defense",
            Self::Volatility => "Speed",
            Self::Solvency => "SpDef",
            Self::Innovation => "SpAtk",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which key set a stats payload was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatsSchema {
    #[default]
    Canonical,
    Legacy,
}

impl StatsSchema {
    fn key(self, stat: StatKey) -> &'static str {
        match self {
            Self::Canonical => stat.name(),
            Self::Legacy => stat.legacy_name(),
        }
    }

    /// Canonical wins when a payload carries keys from both sets
    fn detect(payload: &HashMap<String, serde_json::Value>) -> Self {
        let has = |schema: StatsSchema| {
            StatKey::ALL
                .iter()
                .any(|stat| payload.contains_key(schema.key(*stat)))
        };
        if !has(Self::Canonical) && has(Self::Legacy) {
            Self::Legacy
        } else {
            Self::Canonical
        }
    }
}

/// The six canonical scores of a stock (or of a team average)
///
/// Always serialized with canonical keys, whatever schema it was read from.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "StatsPayload")]
pub struct RadarStats {
    values: [f64; 6],
    schema: StatsSchema,
}

impl RadarStats {
    /// Build from values in `StatKey::ALL` order
    pub fn from_values(values: [f64; 6]) -> Self {
        Self {
            values,
            schema: StatsSchema::Canonical,
        }
    }

    /// Score for a key
    pub fn get(&self, key: StatKey) -> f64 {
        self.values[key.index()]
    }

    /// Values in `StatKey::ALL` order
    pub fn values(&self) -> [f64; 6] {
        self.values
    }

    /// Key/value pairs in radar order
    pub fn iter(&self) -> impl Iterator<Item = (StatKey, f64)> + '_ {
        StatKey::ALL.iter().map(|key| (*key, self.get(*key)))
    }

    /// Schema the payload was written in
    pub fn schema(&self) -> StatsSchema {
        self.schema
    }
}

impl Serialize for RadarStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(StatKey::ALL.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.name(), &value)?;
        }
        map.end()
    }
}

/// Raw stats object as it appears on the wire
#[derive(Deserialize)]
#[serde(transparent)]
struct StatsPayload(Option<HashMap<String, serde_json::Value>>);

impl From<StatsPayload> for RadarStats {
    fn from(payload: StatsPayload) -> Self {
        let payload = payload.0.unwrap_or_default();
        let schema = StatsSchema::detect(&payload);

        let mut values = [0.0; 6];
        for key in StatKey::ALL {
            values[key.index()] = payload
                .get(schema.key(key))
                .and_then(value_as_f64)
                .unwrap_or(0.0);
        }

        Self { values, schema }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_payload() {
        let stats: RadarStats = serde_json::from_value(json!({
            "Liquidity": 80, "Growth": 55, "Profitability": 90,
            "Volatility": 40, "Solvency": 70, "Innovation": 65
        }))
        .unwrap();

        assert_eq!(stats.schema(), StatsSchema::Canonical);
        assert_eq!(stats.get(StatKey::Liquidity), 80.0);
        assert_eq!(stats.get(StatKey::Innovation), 65.0);
    }

    #[test]
    fn test_legacy_payload_maps_positionally() {
        let legacy: RadarStats = serde_json::from_value(json!({
            "HP": 80, "Attack": 55, "Defense": 90,
            "Speed": 40, "SpDef": 70, "SpAtk": 65
        }))
        .unwrap();
        let canonical: RadarStats = serde_json::from_value(json!({
            "Liquidity": 80, "Growth": 55, "Profitability": 90,
            "Volatility": 40, "Solvency": 70, "Innovation": 65
        }))
        .unwrap();

        assert_eq!(legacy.schema(), StatsSchema::Legacy);
        assert_eq!(legacy.values(), canonical.values());
        assert_eq!(legacy.get(StatKey::Volatility), 40.0);
        assert_eq!(legacy.get(StatKey::Solvency), 70.0);
    }

    #[test]
    fn test_missing_and_bad_values_default_to_zero() {
        let stats: RadarStats =
            serde_json::from_value(json!({"Liquidity": "high", "Growth": null, "Solvency": 12}))
                .unwrap();
        assert_eq!(stats.get(StatKey::Liquidity), 0.0);
        assert_eq!(stats.get(StatKey::Growth), 0.0);
        assert_eq!(stats.get(StatKey::Profitability), 0.0);
        assert_eq!(stats.get(StatKey::Solvency), 12.0);

        let empty: RadarStats = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(empty.values(), [0.0; 6]);
    }

    #[test]
    fn test_serializes_with_canonical_keys() {
        let legacy: RadarStats = serde_json::from_value(json!({"HP": 10, "SpAtk": 20})).unwrap();
        let value = serde_json::to_value(&legacy).unwrap();

        assert_eq!(value["Liquidity"], json!(10.0));
        assert_eq!(value["Innovation"], json!(20.0));
        assert!(value.get("HP").is_none());
    }
}
