//! Fintrack CLI - Personal finance tracking backend
//!
//! Usage:
//!   fintrack init                     Initialize database
//!   fintrack serve --port 5000        Start web server
//!   fintrack stats --user 1           Show aggregate figures
//!   fintrack ask "Can I afford it?"   Ask a question

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use fintrack_core::ai::AdvisorClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, cli.no_encrypt).await,
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Stats { user, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_stats(&db, user, json)
        }
        Commands::Insights { user } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let advisor = AdvisorClient::from_env();
            commands::cmd_insights(&db, user, advisor.as_ref()).await
        }
        Commands::Ask { user, question } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let advisor = AdvisorClient::from_env();
            commands::cmd_ask(&db, user, &question, advisor.as_ref()).await
        }
    }
}
