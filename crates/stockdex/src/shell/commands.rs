//! Command parsing for the dashboard shell

use crate::controller::Mode;
use crate::error::{DashboardError, Result};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch a ticker into the current mode
    Search { ticker: String },
    /// Show ticker suggestions for a partial query
    Suggest { query: String },
    /// Switch between single, compare and team
    Mode { mode: Mode },
    /// Remove a ticker from the team
    Remove { ticker: String },
    /// Show the team, its averages and correlation
    Team,
    /// Open the risk panel for a ticker, or close it without one
    Risk { ticker: Option<String> },
    /// Show the current dashboard
    Show,
    /// Show help
    Help,
    /// Exit the shell
    Exit,
}

impl Command {
    /// Parse a command from user input
    ///
    /// Input without a leading `/` is a ticker search.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(DashboardError::Command("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Search {
                ticker: input.to_string(),
            });
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(DashboardError::Command("Empty command".to_string()));
        };
        let cmd = cmd.to_lowercase();

        match cmd.as_str() {
            "search" | "s" => Ok(Command::Search {
                ticker: required(args, "search")?.to_string(),
            }),
            "suggest" | "find" => {
                if args.is_empty() {
                    return Err(DashboardError::Command(
                        "Missing query for suggest command".to_string(),
                    ));
                }
                Ok(Command::Suggest {
                    query: args.join(" "),
                })
            }
            "mode" | "m" => {
                let mode = required(args, "mode")?.parse()?;
                Ok(Command::Mode { mode })
            }
            "single" => Ok(Command::Mode { mode: Mode::Single }),
            "compare" | "cmp" => Ok(Command::Mode { mode: Mode::Compare }),
            "remove" | "rm" => Ok(Command::Remove {
                ticker: required(args, "remove")?.to_uppercase(),
            }),
            "team" => Ok(Command::Team),
            "risk" | "r" => Ok(Command::Risk {
                ticker: args.first().map(|t| t.to_uppercase()),
            }),
            "show" | "ls" => Ok(Command::Show),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(DashboardError::Command(format!("Unknown command: {cmd}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Stockdex Commands
=================

Fetching:
  <ticker>               Fetch a ticker into the current mode
  /search <ticker>       Same as typing the ticker
  /suggest <query>       Look up matching tickers

Modes:
  /mode <single|compare|team>
                         single: one stock; compare: two side by side;
                         team: up to six stocks, averaged

Team:
  /team                  Show members, averages, sectors and correlation
  /remove <ticker>       Remove a member

Risk:
  /risk <ticker>         Value-at-risk and return distribution
  /risk                  Close the risk panel

Other:
  /show                  Show the dashboard
  /help                  Show help
  /exit                  Exit

Aliases:
  /s = /search   /m = /mode   /rm = /remove   /r = /risk
  /cmp = /mode compare        /single = /mode single
  /q = /exit
"
    }

    /// Get a short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Search { .. } => "Fetch a ticker",
            Command::Suggest { .. } => "Ticker suggestions",
            Command::Mode { .. } => "Switch mode",
            Command::Remove { .. } => "Remove from team",
            Command::Team => "Show team",
            Command::Risk { ticker: Some(_) } => "Open risk panel",
            Command::Risk { ticker: None } => "Close risk panel",
            Command::Show => "Show dashboard",
            Command::Help => "Show help",
            Command::Exit => "Exit the shell",
        }
    }
}

fn required<'a>(args: &[&'a str], command: &str) -> Result<&'a str> {
    args.first().copied().ok_or_else(|| {
        DashboardError::Command(format!("Missing argument for {command} command"))
    })
}
