//! Stockdex dashboard shell
//!
//! An interactive command-line front end for the Stockdex analytics API.
//!
//! # Usage
//!
//! ```bash
//! # Point at a different API deployment
//! export STOCKDEX_API_URL="http://localhost:8000"
//!
//! # Run the shell
//! cargo run --bin stockdex -p stockdex -- --mode team
//! ```

use clap::Parser;
use stockdex::shell::{DashboardShell, Outcome};
use stockdex::{DashboardConfig, HttpDashboardClient, Mode};
use stockdex_utils::AppConfig;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stockdex")]
#[command(about = "Interactive stock dashboard", long_about = None)]
struct Args {
    /// Base URL of the analytics API (overrides STOCKDEX_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Mode to start in: single, compare or team
    #[arg(short, long, default_value = "single")]
    mode: Mode,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let app = AppConfig::from_env();
    if args.json_logs {
        stockdex_utils::init_json_tracing(&app.log_filter);
    } else {
        stockdex_utils::init_tracing_with(&app.log_filter);
    }

    let mut builder = DashboardConfig::builder().with_env();
    if let Some(url) = args.api_url {
        builder = builder.api_base_url(url);
    }
    let config = builder.build()?;

    info!(
        "Starting {} ({}) against {}",
        app.app_name, app.environment, config.api_base_url
    );

    let api = Arc::new(HttpDashboardClient::new(&config)?);
    let shell = DashboardShell::new(api, &config);
    shell.controller().set_mode(args.mode);

    println!("{}\n", shell.welcome());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", shell.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match shell.process_input(input).await {
            Ok(Outcome::Reply(text)) => println!("{}\n", text),
            Ok(Outcome::Exit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                tracing::debug!("Command failed: {}", e);
                eprintln!("Error: {}\n", e.user_message());
            }
        }
    }

    Ok(())
}
