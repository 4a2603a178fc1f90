//! Status command implementation

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    use fintrack_core::db::DB_KEY_ENV;
    use std::fs;

    println!();
    println!("📊 Fintrack Status");
    println!("   ─────────────────────────────────────────────────────────────");

    // Database path
    println!("   Database: {}", db_path.display());

    // Check if database file exists and get size
    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            println!("   Size: {}", format_size(metadata.len()));
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    // Check encryption status
    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    // Try to open the database and show counts
    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                if db.is_encrypted() {
                    println!("   🔒 Opened with encryption key");
                } else {
                    println!("   ⚠️  Opened without encryption");
                }
                if let Ok(counts) = db.counts() {
                    println!();
                    println!("   Users: {}", counts.users);
                    println!("   Transactions: {}", counts.transactions);
                    println!("   Contact messages: {}", counts.contact_messages);
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    Ok(())
}

/// Human-readable file size
pub fn format_size(bytes: u64) -> String {
    let size_kb = bytes as f64 / 1024.0;
    if size_kb < 1024.0 {
        format!("{:.1} KB", size_kb)
    } else {
        format!("{:.1} MB", size_kb / 1024.0)
    }
}
