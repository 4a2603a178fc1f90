//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, resolve_user)
//! - `advice` - Stats, insights and question answering for one user
//! - `serve` - Web server command
//! - `status` - Database status

pub mod advice;
pub mod core;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use advice::*;
pub use core::*;
pub use serve::*;
pub use status::*;
