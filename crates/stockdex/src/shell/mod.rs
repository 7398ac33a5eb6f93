//! Interactive dashboard shell
//!
//! A line-oriented front end over [`DashboardController`] and
//! [`SearchResolver`]. Typing a ticker fetches it into the current mode;
//! slash commands switch modes, manage the team and open the risk panel.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockdex::{DashboardConfig, HttpDashboardClient};
//! use stockdex::shell::{DashboardShell, Outcome};
//! use std::sync::Arc;
//!
//! let config = DashboardConfig::default().with_env();
//! let api = Arc::new(HttpDashboardClient::new(&config)?);
//! let shell = DashboardShell::new(api, &config);
//! if let Outcome::Reply(text) = shell.process_input("AAPL").await? {
//!     println!("{text}");
//! }
//! ```

pub mod commands;
pub mod render;

pub use commands::Command;

use crate::api::DashboardApi;
use crate::config::DashboardConfig;
use crate::controller::DashboardController;
use crate::error::Result;
use crate::search::SearchResolver;
use std::sync::Arc;

/// What the caller should do after a line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Exit,
}

pub struct DashboardShell {
    controller: DashboardController,
    resolver: SearchResolver,
}

impl DashboardShell {
    pub fn new(api: Arc<dyn DashboardApi>, config: &DashboardConfig) -> Self {
        Self {
            controller: DashboardController::new(Arc::clone(&api), config),
            resolver: SearchResolver::new(api, config),
        }
    }

    pub fn controller(&self) -> &DashboardController {
        &self.controller
    }

    pub fn resolver(&self) -> &SearchResolver {
        &self.resolver
    }

    pub fn welcome(&self) -> &'static str {
        "Stockdex - type a ticker, or /help for commands"
    }

    /// Prompt showing the current mode
    pub fn prompt(&self) -> String {
        format!("[{}] >>> ", self.controller.mode())
    }

    /// Parse and run one line of input
    pub async fn process_input(&self, input: &str) -> Result<Outcome> {
        let command = Command::parse(input)?;
        tracing::debug!("Executing: {}", command.description());
        self.execute(command).await
    }

    pub async fn execute(&self, command: Command) -> Result<Outcome> {
        let reply = match command {
            Command::Search { ticker } => {
                self.resolver.clear();
                self.controller.search(&ticker).await?;
                render::dashboard(&self.controller.snapshot())
            }
            Command::Suggest { query } => {
                let mut updates = self.resolver.subscribe();
                self.resolver.on_query(&query);
                // every lookup that is not superseded publishes, even on failure
                if updates.changed().await.is_err() {
                    return Ok(Outcome::Reply(render::suggestions(&[])));
                }
                let list = updates.borrow().clone();
                render::suggestions(&list)
            }
            Command::Mode { mode } => {
                self.controller.set_mode(mode);
                format!("Mode: {mode}\n{}", render::dashboard(&self.controller.snapshot()))
            }
            Command::Remove { ticker } => {
                if self.controller.remove_from_team(&ticker) {
                    render::team(&self.controller.snapshot())
                } else {
                    format!("{ticker} is not in your team")
                }
            }
            Command::Team => render::team(&self.controller.snapshot()),
            Command::Risk { ticker: Some(ticker) } => {
                self.controller.load_risk(&ticker).await?;
                match &self.controller.snapshot().risk {
                    Some(view) => render::risk(view),
                    None => String::new(),
                }
            }
            Command::Risk { ticker: None } => {
                self.controller.close_risk();
                "Risk panel closed.".to_string()
            }
            Command::Show => render::dashboard(&self.controller.snapshot()),
            Command::Help => Command::help_text().to_string(),
            Command::Exit => return Ok(Outcome::Exit),
        };
        Ok(Outcome::Reply(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::controller::Mode;
    use crate::error::DashboardError;
    use crate::model::{StockRecord, Suggestion};
    use serde_json::json;
    use tokio_test::assert_err;

    fn api() -> MockDashboardApi {
        let mut api = MockDashboardApi::new();
        api.expect_analyze().returning(|t| {
            if t == "ZZZZ" {
                return Err(DashboardError::Api {
                    endpoint: "/analyze/ZZZZ".to_string(),
                    status: 404,
                });
            }
            let record: StockRecord =
                serde_json::from_value(json!({"ticker": t, "stats": {"Growth": 60}})).unwrap();
            Ok(Arc::new(record))
        });
        api.expect_search().returning(|_| {
            Ok(vec![Suggestion {
                symbol: "AAPL".to_string(),
                shortname: "Apple Inc.".to_string(),
            }])
        });
        api
    }

    fn shell() -> DashboardShell {
        DashboardShell::new(Arc::new(api()), &DashboardConfig::default())
    }

    fn reply(outcome: Outcome) -> String {
        match outcome {
            Outcome::Reply(text) => text,
            Outcome::Exit => panic!("unexpected exit"),
        }
    }

    #[tokio::test]
    async fn test_bare_ticker_searches() {
        let shell = shell();
        let out = reply(shell.process_input("aapl").await.unwrap());
        assert!(out.contains("AAPL"));
        assert_eq!(
            shell.controller().snapshot().primary.unwrap().ticker,
            "AAPL"
        );
    }

    #[tokio::test]
    async fn test_mode_and_team_commands() {
        let shell = shell();
        reply(shell.process_input("/mode team").await.unwrap());
        assert_eq!(shell.prompt(), "[team] >>> ");

        shell.process_input("TSLA").await.unwrap();
        let out = reply(shell.process_input("/team").await.unwrap());
        assert!(out.contains("Team 1/6"));

        let out = reply(shell.process_input("/rm NVDA").await.unwrap());
        assert_eq!(out, "NVDA is not in your team");
        shell.process_input("/rm tsla").await.unwrap();
        assert!(shell.controller().snapshot().team.is_empty());
        assert_eq!(shell.controller().mode(), Mode::Team);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let shell = shell();
        let err = assert_err!(shell.process_input("ZZZZ").await);
        assert_eq!(err.user_message(), "Stock not found or API error");
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggest_waits_for_debounce() {
        let shell = shell();
        let out = reply(shell.process_input("/suggest app").await.unwrap());
        assert!(out.contains("Apple Inc."));
    }

    #[tokio::test]
    async fn test_exit() {
        assert_eq!(shell().process_input("/exit").await.unwrap(), Outcome::Exit);
    }
}
