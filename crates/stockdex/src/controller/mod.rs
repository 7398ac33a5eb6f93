//! Fetch and mode controller
//!
//! [`DashboardController`] owns the [`DashboardState`] and drives it from
//! async fetches. Each transition runs under a single write guard, so a
//! [`DashboardController::snapshot`] never sees a half-applied update. The
//! guard is never held across an await.

pub mod state;

pub use state::{normalize_ticker, DashboardState, FetchState, Mode, RiskView};

use crate::api::DashboardApi;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::schedule::Debouncer;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

pub struct DashboardController {
    api: Arc<dyn DashboardApi>,
    state: Arc<RwLock<DashboardState>>,
    team_risk_refetch: Debouncer,
    histogram_bins: usize,
}

impl DashboardController {
    pub fn new(api: Arc<dyn DashboardApi>, config: &DashboardConfig) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(DashboardState::new(config.team_capacity))),
            team_risk_refetch: Debouncer::new(config.risk_refetch_debounce),
            histogram_bins: config.histogram_bins,
        }
    }

    /// Fetch a ticker and place it according to the current mode
    ///
    /// The mode is read when the response arrives. On any error the state
    /// moves to [`FetchState::Error`] and loaded records are left untouched.
    pub async fn search(&self, ticker: &str) -> Result<()> {
        let ticker = match normalize_ticker(ticker) {
            Ok(ticker) => ticker,
            Err(err) => {
                self.write().fail(&err);
                return Err(err);
            }
        };

        self.write().begin_fetch();
        info!("Fetching {}", ticker);

        let record = match self.api.analyze(&ticker).await {
            Ok(record) => record,
            Err(err) => {
                warn!("Fetching {} failed: {}", ticker, err);
                self.write().fail(&err);
                return Err(err);
            }
        };

        let mut state = self.write();
        let mode = state.mode;
        state.apply_record(record)?;
        info!("Loaded {} in {} mode", ticker, mode);
        if mode == Mode::Team {
            self.sync_team_risk(&state);
        }
        Ok(())
    }

    pub fn set_mode(&self, mode: Mode) {
        self.write().set_mode(mode);
        debug!("Mode set to {}", mode);
    }

    /// Remove a team member; returns whether the ticker was in the team
    pub fn remove_from_team(&self, ticker: &str) -> bool {
        let mut state = self.write();
        let removed = state.remove_from_team(ticker);
        if removed {
            info!("Removed {} from team", ticker.to_uppercase());
            self.sync_team_risk(&state);
        }
        removed
    }

    /// Fetch risk metrics for one ticker and bucket its returns
    pub async fn load_risk(&self, ticker: &str) -> Result<()> {
        let ticker = normalize_ticker(ticker)?;
        match self.api.risk_metrics(&ticker).await {
            Ok(metrics) => {
                let view = RiskView::new(ticker, metrics, self.histogram_bins);
                self.write().risk = Some(view);
                Ok(())
            }
            Err(err) => {
                warn!("Risk metrics for {} failed: {}", ticker, err);
                self.write().fail(&err);
                Err(err)
            }
        }
    }

    pub fn close_risk(&self) {
        self.write().risk = None;
    }

    pub fn clear_error(&self) {
        self.write().clear_error();
    }

    /// Consistent copy of the current state
    pub fn snapshot(&self) -> DashboardState {
        self.read().clone()
    }

    pub fn mode(&self) -> Mode {
        self.read().mode
    }

    /// True while a team risk refetch is scheduled or running
    pub fn is_team_risk_pending(&self) -> bool {
        self.team_risk_refetch.is_pending()
    }

    /// Schedule or cancel the correlation refetch after a team change
    ///
    /// Called with the write guard held so a running refetch cannot publish
    /// between the team change and the generation bump.
    fn sync_team_risk(&self, state: &DashboardState) {
        if !state.wants_team_risk() {
            self.team_risk_refetch.cancel();
            return;
        }

        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.state);
        self.team_risk_refetch.schedule(move |ticket| async move {
            let tickers = read_state(&shared).team.tickers();
            if tickers.len() < 2 {
                return;
            }

            debug!("Refetching team risk for {:?}", tickers);
            let result = api.analyze_team(&tickers).await;
            let mut state = write_state(&shared);
            if !ticket.is_current() {
                debug!("Discarding stale team risk for {:?}", tickers);
                return;
            }
            match result {
                Ok(analysis) => state.team_risk = Some(analysis.risk_analysis),
                Err(err) => {
                    // the old matrix describes a different member set
                    warn!("Team risk refetch failed: {}", err);
                    state.team_risk = None;
                }
            }
        });
    }

    fn read(&self) -> RwLockReadGuard<'_, DashboardState> {
        read_state(&self.state)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardState> {
        write_state(&self.state)
    }
}

fn read_state(state: &RwLock<DashboardState>) -> RwLockReadGuard<'_, DashboardState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_state(state: &RwLock<DashboardState>) -> RwLockWriteGuard<'_, DashboardState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}
