//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `resolve_user` - Pick the user a command acts for
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{bail, Context, Result};
use fintrack_core::db::Database;
use fintrack_core::models::User;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let Some(path_str) = db_path.to_str() else {
        bail!("Database path must be valid UTF-8: {}", db_path.display());
    };
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// The user a command acts for: an explicit ID, or the local development user
pub fn resolve_user(db: &Database, user_id: Option<i64>) -> Result<User> {
    match user_id {
        Some(id) => match db.get_user(id)? {
            Some(user) => Ok(user),
            None => bail!("User {} not found", id),
        },
        None => db
            .ensure_local_user()
            .context("Failed to create local development user"),
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    // Opening runs the migrations
    let db = open_db(db_path, no_encrypt)?;
    let local = db
        .ensure_local_user()
        .context("Failed to create local development user")?;
    println!("   Local development user: {} (id {})", local.email, local.id);

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Set FINTRACK_JWT_SECRET, then start the API: fintrack serve");
    println!("  2. Or try it locally: fintrack serve --no-auth");

    Ok(())
}
