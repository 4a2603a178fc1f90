//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod ai;
pub mod auth;
pub mod contact;
pub mod health;
pub mod transactions;
pub mod users;

// Re-export all handlers for use in router
pub use ai::*;
pub use auth::*;
pub use contact::*;
pub use health::*;
pub use transactions::*;
pub use users::*;
