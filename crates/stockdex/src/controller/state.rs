//! Dashboard state and its synchronous transitions
//!
//! Every mutation of [`DashboardState`] goes through one of the methods here.
//! A failed transition leaves the state exactly as it was.

use crate::error::{DashboardError, Result, Slot};
use crate::histogram::Histogram;
use crate::model::{CorrelationMatrix, RiskMetrics, StockRecord};
use crate::team::{Team, TeamAggregate};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// What a successful fetch does with the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// One record at a time
    #[default]
    Single,
    /// Primary record plus one record to compare against
    Compare,
    /// Up to the team capacity of records, aggregated
    Team,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Single, Mode::Compare, Mode::Team];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Single => "single",
            Mode::Compare => "compare",
            Mode::Team => "team",
        }
    }

    /// Parse a mode name, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            DashboardError::Command(format!("unknown mode '{s}' (expected single, compare or team)"))
        })
    }
}

/// Progress of the most recent ticker fetch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// User-facing message of the last failure
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Risk metrics of one ticker with the histogram derived from them
#[derive(Debug, Clone, PartialEq)]
pub struct RiskView {
    pub ticker: String,
    pub metrics: Arc<RiskMetrics>,
    /// `None` when there were no usable returns
    pub histogram: Option<Histogram>,
}

impl RiskView {
    pub fn new(ticker: impl Into<String>, metrics: Arc<RiskMetrics>, bin_count: usize) -> Self {
        let histogram = Histogram::build(&metrics.returns, metrics.var, bin_count);
        Self {
            ticker: ticker.into(),
            metrics,
            histogram,
        }
    }
}

/// Everything the dashboard renders
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub mode: Mode,
    pub fetch: FetchState,
    pub primary: Option<Arc<StockRecord>>,
    pub compare: Option<Arc<StockRecord>>,
    pub team: Team,
    /// Always equal to `team.aggregate()`
    pub team_aggregate: Option<TeamAggregate>,
    /// Correlation of the team members, once fetched
    pub team_risk: Option<CorrelationMatrix>,
    pub risk: Option<RiskView>,
}

impl DashboardState {
    pub fn new(team_capacity: usize) -> Self {
        Self {
            team: Team::new(team_capacity),
            ..Self::default()
        }
    }

    /// A fetch has started; any previous error is dropped
    pub fn begin_fetch(&mut self) {
        self.fetch = FetchState::Loading;
    }

    /// A fetch failed; records are left alone
    pub fn fail(&mut self, err: &DashboardError) {
        self.fetch = FetchState::Error(err.user_message());
    }

    /// Place a fetched record according to the current mode
    ///
    /// On error nothing but the fetch state changes.
    pub fn apply_record(&mut self, record: Arc<StockRecord>) -> Result<()> {
        let result = match self.mode {
            Mode::Single => {
                self.primary = Some(record);
                self.compare = None;
                Ok(())
            }
            Mode::Compare => self.apply_compare(record),
            Mode::Team => self.team.add(record).map(|()| self.refresh_team()),
        };

        match &result {
            Ok(()) => self.fetch = FetchState::Loaded,
            Err(err) => self.fail(err),
        }
        result
    }

    fn apply_compare(&mut self, record: Arc<StockRecord>) -> Result<()> {
        if self.primary.is_none() {
            self.primary = Some(record);
            return Ok(());
        }

        let clashes = self
            .primary
            .as_ref()
            .is_some_and(|p| p.is_ticker(&record.ticker))
            || self
                .compare
                .as_ref()
                .is_some_and(|c| c.is_ticker(&record.ticker));
        if clashes {
            return Err(DashboardError::DuplicateTicker {
                ticker: record.ticker.clone(),
                slot: Slot::Compare,
            });
        }

        self.compare = Some(record);
        Ok(())
    }

    /// Remove a team member by ticker; returns whether one was removed
    pub fn remove_from_team(&mut self, ticker: &str) -> bool {
        let removed = self.team.remove(ticker).is_some();
        if removed {
            self.refresh_team();
        }
        removed
    }

    /// Switching to single mode drops the compare record
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode == Mode::Single {
            self.compare = None;
        }
    }

    /// Forget the last error
    pub fn clear_error(&mut self) {
        if matches!(self.fetch, FetchState::Error(_)) {
            self.fetch = if self.has_records() {
                FetchState::Loaded
            } else {
                FetchState::Idle
            };
        }
    }

    pub fn has_records(&self) -> bool {
        self.primary.is_some() || !self.team.is_empty()
    }

    /// True when the team is large enough to have a correlation matrix
    pub fn wants_team_risk(&self) -> bool {
        self.team.len() >= 2
    }

    fn refresh_team(&mut self) {
        self.team_aggregate = self.team.aggregate();
        if !self.wants_team_risk() {
            self.team_risk = None;
        }
    }
}

/// Trim and upper-case a ticker, rejecting anything that cannot be one
pub fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_uppercase();
    let valid = !ticker.is_empty()
        && ticker.len() <= 15
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if valid {
        Ok(ticker)
    } else {
        Err(DashboardError::InvalidTicker(raw.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(ticker: &str) -> Arc<StockRecord> {
        Arc::new(serde_json::from_value(json!({"ticker": ticker, "stats": {"Growth": 50}})).unwrap())
    }

    fn tickers(state: &DashboardState) -> Vec<String> {
        state.team.tickers()
    }

    #[test]
    fn test_single_mode_replaces_and_clears_compare() {
        let mut state = DashboardState::new(6);
        state.set_mode(Mode::Compare);
        state.apply_record(record("AAPL")).unwrap();
        state.apply_record(record("MSFT")).unwrap();
        assert!(state.compare.is_some());

        state.set_mode(Mode::Single);
        state.apply_record(record("GOOG")).unwrap();
        assert_eq!(state.primary.as_ref().unwrap().ticker, "GOOG");
        assert!(state.compare.is_none());
        assert_eq!(state.fetch, FetchState::Loaded);
    }

    #[test]
    fn test_compare_fills_primary_first() {
        let mut state = DashboardState::new(6);
        state.set_mode(Mode::Compare);

        state.apply_record(record("AAPL")).unwrap();
        assert_eq!(state.primary.as_ref().unwrap().ticker, "AAPL");
        assert!(state.compare.is_none());

        state.apply_record(record("MSFT")).unwrap();
        assert_eq!(state.compare.as_ref().unwrap().ticker, "MSFT");

        state.apply_record(record("NVDA")).unwrap();
        assert_eq!(state.compare.as_ref().unwrap().ticker, "NVDA");
        assert_eq!(state.primary.as_ref().unwrap().ticker, "AAPL");
    }

    #[test]
    fn test_compare_rejects_duplicate_and_keeps_state() {
        let mut state = DashboardState::new(6);
        state.set_mode(Mode::Compare);
        state.apply_record(record("AAPL")).unwrap();
        state.apply_record(record("MSFT")).unwrap();

        for ticker in ["AAPL", "MSFT"] {
            let err = state.apply_record(record(ticker)).unwrap_err();
            assert!(matches!(
                err,
                DashboardError::DuplicateTicker {
                    slot: Slot::Compare,
                    ..
                }
            ));
            assert_eq!(state.primary.as_ref().unwrap().ticker, "AAPL");
            assert_eq!(state.compare.as_ref().unwrap().ticker, "MSFT");
            assert_eq!(state.fetch.error(), Some("Cannot compare same stock"));
        }
    }

    #[test]
    fn test_team_add_updates_aggregate() {
        let mut state = DashboardState::new(6);
        state.set_mode(Mode::Team);

        state.apply_record(record("AAPL")).unwrap();
        assert_eq!(state.team_aggregate.as_ref().unwrap().member_count, 1);
        assert!(!state.wants_team_risk());

        state.apply_record(record("MSFT")).unwrap();
        assert_eq!(state.team_aggregate.as_ref().unwrap().member_count, 2);
        assert!(state.wants_team_risk());
        assert!(state.primary.is_none());
    }

    #[test]
    fn test_team_full_leaves_state_unchanged() {
        let mut state = DashboardState::new(2);
        state.set_mode(Mode::Team);
        state.apply_record(record("AAPL")).unwrap();
        state.apply_record(record("MSFT")).unwrap();
        let before = state.team_aggregate.clone();

        let err = state.apply_record(record("GOOG")).unwrap_err();
        assert!(matches!(err, DashboardError::TeamFull { capacity: 2 }));
        assert_eq!(tickers(&state), vec!["AAPL", "MSFT"]);
        assert_eq!(state.team_aggregate, before);
        assert_eq!(state.fetch.error(), Some("Team is full (max 2)"));
    }

    #[test]
    fn test_team_duplicate_leaves_state_unchanged() {
        let mut state = DashboardState::new(6);
        state.set_mode(Mode::Team);
        state.apply_record(record("AAPL")).unwrap();

        let err = state.apply_record(record("AAPL")).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::DuplicateTicker {
                slot: Slot::Team,
                ..
            }
        ));
        assert_eq!(tickers(&state), vec!["AAPL"]);
    }

    #[test]
    fn test_remove_below_two_clears_team_risk() {
        let mut state = DashboardState::new(6);
        state.set_mode(Mode::Team);
        state.apply_record(record("AAPL")).unwrap();
        state.apply_record(record("MSFT")).unwrap();
        state.team_risk = Some(CorrelationMatrix::default());

        assert!(state.remove_from_team("msft"));
        assert!(state.team_risk.is_none());
        assert_eq!(state.team_aggregate.as_ref().unwrap().member_count, 1);

        assert!(state.remove_from_team("AAPL"));
        assert!(state.team_aggregate.is_none());
        assert!(!state.remove_from_team("AAPL"));
    }

    #[test]
    fn test_set_mode_single_never_touches_primary_or_team() {
        for start in Mode::ALL {
            let mut state = DashboardState::new(6);
            state.set_mode(Mode::Team);
            state.apply_record(record("TSLA")).unwrap();
            state.set_mode(Mode::Compare);
            state.apply_record(record("AAPL")).unwrap();
            state.apply_record(record("MSFT")).unwrap();
            state.set_mode(start);

            state.set_mode(Mode::Single);
            assert!(state.compare.is_none());
            assert_eq!(state.primary.as_ref().unwrap().ticker, "AAPL");
            assert_eq!(tickers(&state), vec!["TSLA"]);
        }
    }

    #[test]
    fn test_clear_error() {
        let mut state = DashboardState::new(6);
        state.fail(&DashboardError::InvalidTicker("!!".to_string()));
        state.clear_error();
        assert_eq!(state.fetch, FetchState::Idle);

        state.apply_record(record("AAPL")).unwrap();
        state.fail(&DashboardError::Other("boom".to_string()));
        state.clear_error();
        assert_eq!(state.fetch, FetchState::Loaded);
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_ticker("brk.b").unwrap(), "BRK.B");
        assert_eq!(normalize_ticker("^gspc").unwrap(), "^GSPC");
        assert!(normalize_ticker("").is_err());
        assert!(normalize_ticker("   ").is_err());
        assert!(normalize_ticker("AA PL").is_err());
        assert!(normalize_ticker("../etc").is_err());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("Team"), Some(Mode::Team));
        assert_eq!("compare".parse::<Mode>().unwrap(), Mode::Compare);
        assert!("solo".parse::<Mode>().is_err());
        assert_eq!(Mode::Single.to_string(), "single");
    }

    #[test]
    fn test_risk_view_builds_histogram() {
        let metrics: RiskMetrics = serde_json::from_value(json!({
            "var": -0.02, "cvar": -0.03, "returns": [-0.05, -0.03, 0.0, 0.02, 0.04]
        }))
        .unwrap();
        let view = RiskView::new("AAPL", Arc::new(metrics), 5);
        let histogram = view.histogram.unwrap();
        assert_eq!(histogram.buckets.len(), 5);
        assert_eq!(histogram.var_threshold, -0.02);
    }
}
