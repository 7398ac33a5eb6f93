//! The user-curated team and its derived aggregate
//!
//! [`aggregate`] is a pure function of the members; the controller calls it
//! after every mutation instead of maintaining running totals.

use crate::error::{DashboardError, Result, Slot};
use crate::model::{RadarStats, RawValue, SectorShare, StatKey, StockRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Default maximum number of team members
pub const DEFAULT_TEAM_CAPACITY: usize = 6;

/// Sector label for members that do not report one
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Ordered set of records, unique by ticker, bounded by capacity
#[derive(Debug, Clone)]
pub struct Team {
    members: Vec<Arc<StockRecord>>,
    capacity: usize,
}

impl Default for Team {
    fn default() -> Self {
        Self::new(DEFAULT_TEAM_CAPACITY)
    }
}

impl Team {
    /// Create an empty team with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a member; the team is unchanged on error
    pub fn add(&mut self, record: Arc<StockRecord>) -> Result<()> {
        if self.is_full() {
            return Err(DashboardError::TeamFull {
                capacity: self.capacity,
            });
        }
        if self.contains(&record.ticker) {
            return Err(DashboardError::DuplicateTicker {
                ticker: record.ticker.clone(),
                slot: Slot::Team,
            });
        }
        self.members.push(record);
        Ok(())
    }

    /// Remove a member by ticker, keeping the order of the rest
    pub fn remove(&mut self, ticker: &str) -> Option<Arc<StockRecord>> {
        let pos = self.members.iter().position(|m| m.is_ticker(ticker))?;
        Some(self.members.remove(pos))
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.members.iter().any(|m| m.is_ticker(ticker))
    }

    pub fn get(&self, ticker: &str) -> Option<&Arc<StockRecord>> {
        self.members.iter().find(|m| m.is_ticker(ticker))
    }

    /// Members in insertion order
    pub fn members(&self) -> &[Arc<StockRecord>] {
        &self.members
    }

    /// Member tickers in insertion order
    pub fn tickers(&self) -> Vec<String> {
        self.members.iter().map(|m| m.ticker.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Aggregate of the current members
    pub fn aggregate(&self) -> Option<TeamAggregate> {
        aggregate(&self.members)
    }
}

/// Averaged fundamentals of the team
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAverages {
    /// Mean P/E over members with a usable value, 0 if none
    pub pe_ratio: f64,
    /// Mean dividend yield, in the unit the API reports
    pub dividend_yield: f64,
}

/// Team averages, derived from the members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAggregate {
    /// Per-key mean, rounded to the nearest integer
    pub stats: RadarStats,
    pub raw: RawAverages,
    /// Sector breakdown, largest first
    pub composition: Vec<SectorShare>,
    pub member_count: usize,
}

/// Round to the nearest integer, ties toward positive infinity
pub fn round_half_up(value: f64) -> f64 {
    // adding 0.5 first would carry the largest double below 0.5 up to 1.0
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Compute the team aggregate; `None` for an empty team
pub fn aggregate<R>(members: &[R]) -> Option<TeamAggregate>
where
    R: AsRef<StockRecord>,
{
    if members.is_empty() {
        return None;
    }
    let count = members.len() as f64;

    let mut sums = [0.0; 6];
    for member in members {
        for (slot, value) in sums.iter_mut().zip(member.as_ref().stats.values()) {
            *slot += value;
        }
    }
    let stats = RadarStats::from_values(sums.map(|sum| round_half_up(sum / count)));

    let raw = RawAverages {
        pe_ratio: mean_of_parsable(members, "pe_ratio", |m| m.raw_stats.pe_ratio.as_ref()),
        dividend_yield: mean_of_parsable(members, "dividend_yield", |m| {
            m.raw_stats.dividend_yield.as_ref()
        }),
    };

    Some(TeamAggregate {
        stats,
        raw,
        composition: composition(members),
        member_count: members.len(),
    })
}

/// Mean over values that parse to a finite number; 0 when none do
fn mean_of_parsable<R, F>(members: &[R], field: &str, select: F) -> f64
where
    R: AsRef<StockRecord>,
    F: Fn(&StockRecord) -> Option<&RawValue>,
{
    let mut sum = 0.0;
    let mut used = 0_usize;
    for member in members {
        let member = member.as_ref();
        match select(member).and_then(RawValue::parse) {
            Some(value) => {
                sum += value;
                used += 1;
            }
            None => {
                tracing::debug!(ticker = %member.ticker, field, "excluding unparsable value from team average");
            }
        }
    }
    if used == 0 { 0.0 } else { sum / used as f64 }
}

/// Sector counts, sorted by count descending then sector name
fn composition<R>(members: &[R]) -> Vec<SectorShare>
where
    R: AsRef<StockRecord>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for member in members {
        let sector = member
            .as_ref()
            .sector
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN_SECTOR);
        *counts.entry(sector).or_default() += 1;
    }

    let total = members.len() as f64;
    let mut shares: Vec<SectorShare> = counts
        .into_iter()
        .map(|(sector, count)| SectorShare {
            sector: sector.to_string(),
            count,
            percentage: (count as f64 / total * 1000.0).round() / 10.0,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.sector.cmp(&b.sector)));
    shares
}

impl TeamAggregate {
    /// Rounded average for one key
    pub fn stat(&self, key: StatKey) -> f64 {
        self.stats.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(ticker: &str, stats: serde_json::Value, raw: serde_json::Value) -> Arc<StockRecord> {
        Arc::new(
            serde_json::from_value(json!({
                "ticker": ticker,
                "name": format!("{ticker} Corp"),
                "stats": stats,
                "raw_stats": raw,
            }))
            .unwrap(),
        )
    }

    fn plain(ticker: &str) -> Arc<StockRecord> {
        record(ticker, json!({}), json!({}))
    }

    fn with_sector(ticker: &str, sector: Option<&str>) -> Arc<StockRecord> {
        let mut rec = (*plain(ticker)).clone();
        rec.sector = sector.map(str::to_string);
        Arc::new(rec)
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        let members: Vec<Arc<StockRecord>> = Vec::new();
        assert!(aggregate(&members).is_none());
        assert!(Team::default().aggregate().is_none());
    }

    #[test]
    fn test_aggregate_mean_of_stats() {
        let members = vec![
            record("A", json!({"Liquidity": 80}), json!({})),
            record("B", json!({"Liquidity": 60}), json!({})),
        ];
        let agg = aggregate(&members).unwrap();

        assert_eq!(agg.stat(StatKey::Liquidity), 70.0);
        for key in &StatKey::ALL[1..] {
            assert_eq!(agg.stat(*key), 0.0);
        }
        assert_eq!(agg.member_count, 2);
    }

    #[test]
    fn test_aggregate_matches_rounded_mean_for_every_key() {
        let members = vec![
            record("A", json!({"Liquidity": 81, "Growth": 10, "Profitability": 33,
                "Volatility": 50, "Solvency": 99, "Innovation": 1}), json!({})),
            record("B", json!({"Liquidity": 60, "Growth": 11, "Profitability": 34,
                "Volatility": 51, "Solvency": 98}), json!({})),
            record("C", json!({"HP": 7, "Attack": 12, "Defense": 35,
                "Speed": 52, "SpDef": 97, "SpAtk": 2}), json!({})),
        ];
        let agg = aggregate(&members).unwrap();

        for key in StatKey::ALL {
            let sum: f64 = members.iter().map(|m| m.stats.get(key)).sum();
            assert_eq!(agg.stat(key), round_half_up(sum / 3.0), "key {key}");
        }
    }

    #[test]
    fn test_rounding_ties_go_up() {
        assert_eq!(round_half_up(70.5), 71.0);
        assert_eq!(round_half_up(70.49), 70.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(0.499_999_999_999_999_94), 0.0);
        assert_eq!(round_half_up(-0.499_999_999_999_999_94), 0.0);

        let members = vec![
            record("A", json!({"Growth": 70}), json!({})),
            record("B", json!({"Growth": 71}), json!({})),
        ];
        assert_eq!(aggregate(&members).unwrap().stat(StatKey::Growth), 71.0);
    }

    #[test]
    fn test_raw_averages_skip_unparsable() {
        let members = vec![
            record("A", json!({}), json!({"pe_ratio": 20.0, "dividend_yield": 0.5})),
            record("B", json!({}), json!({"pe_ratio": "abc", "dividend_yield": null})),
            record("C", json!({}), json!({"pe_ratio": "30", "dividend_yield": 1.5})),
        ];
        let agg = aggregate(&members).unwrap();

        assert_eq!(agg.raw.pe_ratio, 25.0);
        assert_eq!(agg.raw.dividend_yield, 1.0);
    }

    #[test]
    fn test_raw_averages_zero_when_nothing_parses() {
        let members = vec![
            record("A", json!({}), json!({"pe_ratio": "n/a"})),
            record("B", json!({}), json!({"pe_ratio": null})),
            record("C", json!({}), json!({})),
        ];
        let agg = aggregate(&members).unwrap();
        assert_eq!(agg.raw.pe_ratio, 0.0);
        assert_eq!(agg.raw.dividend_yield, 0.0);
    }

    #[test]
    fn test_aggregate_is_stateless() {
        let members = vec![record("A", json!({"Liquidity": 40}), json!({"pe_ratio": 10}))];
        let first = aggregate(&members).unwrap();
        let second = aggregate(&members).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_composition_sorted_by_count() {
        let members = vec![
            with_sector("A", Some("Technology")),
            with_sector("B", Some("Energy")),
            with_sector("C", Some("Technology")),
            with_sector("D", None),
        ];
        let agg = aggregate(&members).unwrap();

        assert_eq!(agg.composition[0].sector, "Technology");
        assert_eq!(agg.composition[0].count, 2);
        assert_eq!(agg.composition[0].percentage, 50.0);
        assert_eq!(agg.composition[1].sector, "Energy");
        assert_eq!(agg.composition[2].sector, UNKNOWN_SECTOR);
        assert_eq!(agg.composition[2].percentage, 25.0);
    }

    #[test]
    fn test_composition_rounds_to_one_decimal() {
        let members = vec![
            with_sector("A", Some("Technology")),
            with_sector("B", Some("Energy")),
            with_sector("C", Some("Utilities")),
        ];
        let agg = aggregate(&members).unwrap();
        assert!(agg.composition.iter().all(|s| s.percentage == 33.3));
    }

    #[test]
    fn test_team_rejects_duplicates_and_overflow() {
        let mut team = Team::new(2);
        team.add(plain("AAPL")).unwrap();

        let err = team.add(plain("aapl")).unwrap_err();
        assert!(matches!(err, DashboardError::DuplicateTicker { slot: Slot::Team, .. }));
        assert_eq!(team.len(), 1);

        team.add(plain("MSFT")).unwrap();
        let err = team.add(plain("NVDA")).unwrap_err();
        assert!(matches!(err, DashboardError::TeamFull { capacity: 2 }));
        assert_eq!(team.tickers(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_full_team_reports_full_before_duplicate() {
        let mut team = Team::new(1);
        team.add(plain("AAPL")).unwrap();
        let err = team.add(plain("AAPL")).unwrap_err();
        assert!(matches!(err, DashboardError::TeamFull { .. }));
    }

    #[test]
    fn test_add_then_remove_round_trips() {
        let mut team = Team::default();
        team.add(plain("MSFT")).unwrap();
        team.add(plain("NVDA")).unwrap();
        let before = team.tickers();

        team.add(plain("AAPL")).unwrap();
        let removed = team.remove("AAPL").unwrap();

        assert_eq!(removed.ticker, "AAPL");
        assert_eq!(team.tickers(), before);
        assert!(team.remove("AAPL").is_none());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut team = Team::default();
        for t in ["A", "B", "C", "D"] {
            team.add(plain(t)).unwrap();
        }
        team.remove("B");
        assert_eq!(team.tickers(), vec!["A", "C", "D"]);
    }
}
