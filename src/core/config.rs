use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot
/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: school.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "school.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// URL of the school Mini App opened from the greeting button
/// Read from WEBAPP_URL environment variable
pub static WEBAPP_URL: Lazy<String> =
    Lazy::new(|| env::var("WEBAPP_URL").unwrap_or_else(|_| "https://example.org/school-app".to_string()));

/// School name shown in the greeting
/// Read from SCHOOL_NAME environment variable
pub static SCHOOL_NAME: Lazy<String> = Lazy::new(|| env::var("SCHOOL_NAME").unwrap_or_else(|_| "нашу школу".to_string()));

/// Optional JSON file overriding the built-in section content
/// Read from CATALOG_PATH environment variable
/// Example: catalog.json with `{"schedule": "...", "grades": "..."}`
pub static CATALOG_PATH: Lazy<Option<String>> = Lazy::new(|| env::var("CATALOG_PATH").ok().filter(|p| !p.is_empty()));

/// Conversation state configuration
pub mod session {
    use super::{env, Duration, Lazy};

    /// Default lifetime of an unfinished feedback flow (in seconds)
    pub const DEFAULT_STATE_TTL_SECS: u64 = 30 * 60;

    /// Lifetime of an unfinished feedback flow
    /// Read from FEEDBACK_STATE_TTL_SECS environment variable, 0 disables expiry
    pub static STATE_TTL_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("FEEDBACK_STATE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_STATE_TTL_SECS)
    });

    /// State TTL duration, `None` when expiry is disabled
    pub fn state_ttl() -> Option<Duration> {
        ttl_from_secs(*STATE_TTL_SECS)
    }

    /// Interval between sweeps of expired conversation state (in seconds)
    pub const PURGE_INTERVAL_SECS: u64 = 300;

    /// Expired state sweep interval duration
    pub fn purge_interval() -> Duration {
        Duration::from_secs(PURGE_INTERVAL_SECS)
    }

    pub(crate) fn ttl_from_secs(secs: u64) -> Option<Duration> {
        (secs > 0).then_some(Duration::from_secs(secs))
    }
}

/// Database configuration
pub mod db {
    use super::Duration;

    /// Maximum number of pooled SQLite connections
    pub const POOL_MAX_SIZE: u32 = 10;

    /// How long to wait for a free pooled connection (in seconds)
    pub const POOL_TIMEOUT_SECS: u64 = 5;

    /// SQLite busy timeout (in seconds)
    pub const BUSY_TIMEOUT_SECS: u64 = 30;

    /// Pool connection timeout duration
    pub fn pool_timeout() -> Duration {
        Duration::from_secs(POOL_TIMEOUT_SECS)
    }

    /// SQLite busy timeout duration
    pub fn busy_timeout() -> Duration {
        Duration::from_secs(BUSY_TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API requests (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}
