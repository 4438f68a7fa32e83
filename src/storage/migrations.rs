use rusqlite::Connection;
use std::sync::{Mutex, OnceLock};

use crate::core::config;
use crate::core::error::{AppError, AppResult};

mod embedded {
    use refinery::embed_migrations;

    embed_migrations!("./migrations");
}

static MIGRATION_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Applies all pending schema migrations.
///
/// refinery opens its own transaction per migration, so the only thing added
/// here is a per-process lock against two pools migrating the same file.
pub fn run_migrations(conn: &mut Connection) -> AppResult<()> {
    let mutex = MIGRATION_LOCK.get_or_init(|| Mutex::new(()));
    // Recover from a poisoned lock, migrations are idempotent
    let _guard = match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Migration lock was poisoned, recovering...");
            poisoned.into_inner()
        }
    };

    conn.busy_timeout(config::db::busy_timeout())?;

    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| AppError::Migration(e.to_string()))?;

    for migration in report.applied_migrations() {
        log::info!("Applied migration {}", migration);
    }

    Ok(())
}
