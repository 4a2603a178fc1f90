//! Fintrack Core Library
//!
//! Shared functionality for the Fintrack personal finance backend:
//! - Database access and migrations (SQLCipher-encrypted SQLite)
//! - Transaction aggregation into income, expense, category and monthly totals
//! - Rule-based insights and question answering
//! - Remote advisor client with local fallback
//! - Password hashing and input validation

pub mod advisor;
pub mod ai;
pub mod auth;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod stats;

/// Test utilities including a mock advisor server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advisor, Answer, Insights, Source};
pub use ai::{AdvisorBackend, AdvisorClient, AdvisorConfig, MockAdvisor, RemoteAdvisor};
pub use db::{Database, DatabaseCounts};
pub use error::{Error, Result};
pub use models::*;
pub use stats::{aggregate, AggregateResult, CategoryTotal, MonthlyTotal};
