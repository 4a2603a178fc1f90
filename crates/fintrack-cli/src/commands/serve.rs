//! Server command implementation

use std::path::Path;

use anyhow::Result;
use fintrack_core::ai::{ADVISOR_URL_ENV, ADVISOR_TIMEOUT_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting Fintrack API server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    let config = fintrack_server::ServerConfig::from_env(!no_auth);

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if config.jwt_secret.trim().is_empty() {
        println!(
            "   ❌ Authentication: {} is not set",
            fintrack_server::JWT_SECRET_ENV
        );
    } else {
        println!("   🔒 Authentication: JWT sessions");
    }
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} ({})",
            config.allowed_origins.join(", "),
            fintrack_server::ALLOWED_ORIGINS_ENV
        );
    }
    match std::env::var(ADVISOR_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => {
            println!("   🤖 Advisor: {}", url.trim());
            if let Ok(secs) = std::env::var(ADVISOR_TIMEOUT_ENV) {
                println!("      Timeout: {}s ({})", secs, ADVISOR_TIMEOUT_ENV);
            }
        }
        _ => println!("   💡 Tip: Set {} to enable the remote advisor", ADVISOR_URL_ENV),
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;
    fintrack_server::serve_with_config(db, host, port, config).await?;

    Ok(())
}
