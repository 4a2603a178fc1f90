//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fintrack - Track spending and get advice on it
#[derive(Parser)]
#[command(name = "fintrack")]
#[command(about = "Personal finance tracking backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "fintrack.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set FINTRACK_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// Every request acts as a single local development user.
        #[arg(long)]
        no_auth: bool,
    },

    /// Show database status (encryption, size, row counts)
    Status,

    /// Show income, expenses and category totals for a user
    Stats {
        /// User ID (defaults to the local development user)
        #[arg(short, long)]
        user: Option<i64>,

        /// Print the raw JSON returned by the stats endpoint
        #[arg(long)]
        json: bool,
    },

    /// Show spending insights for a user
    Insights {
        /// User ID (defaults to the local development user)
        #[arg(short, long)]
        user: Option<i64>,
    },

    /// Ask a question about a user's finances
    Ask {
        /// User ID (defaults to the local development user)
        #[arg(short, long)]
        user: Option<i64>,

        /// The question, e.g. "Can I afford a $50 purchase?"
        question: String,
    },
}
