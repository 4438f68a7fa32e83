//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Startup configuration summary

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup
pub fn log_startup_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🏫 {}: configuration", *config::SCHOOL_NAME);
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("  • Database: {}", *config::DATABASE_PATH);
    log::info!("  • Mini App URL: {}", *config::WEBAPP_URL);

    match *config::CATALOG_PATH {
        Some(ref path) => log::info!("  • Catalog: {}", path),
        None => log::info!("  • Catalog: built-in content"),
    }

    match config::session::state_ttl() {
        Some(ttl) => log::info!("  • Feedback state TTL: {}s", ttl.as_secs()),
        None => log::warn!("⚠️  Feedback state TTL disabled, abandoned flows never expire"),
    }

    if config::BOT_TOKEN.is_empty() {
        log::error!("❌ BOT_TOKEN / TELOXIDE_TOKEN is not set");
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
