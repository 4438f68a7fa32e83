use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use crate::core::config;
use crate::core::error::AppResult;
use crate::storage::migrations::run_migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a new database connection pool
///
/// Initializes a connection pool and brings the schema up to date.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Returns
///
/// Returns a `DbPool` on success, or an error if the pool cannot be built or
/// the migrations fail.
///
/// # Example
///
/// ```no_run
/// use schooldesk::storage::db;
///
/// let pool = db::create_pool("school.sqlite")?;
/// # Ok::<(), schooldesk::core::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(|conn| conn.busy_timeout(config::db::busy_timeout()));
    let pool = Pool::builder()
        .max_size(config::db::POOL_MAX_SIZE)
        .connection_timeout(config::db::pool_timeout())
        .build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;

    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_pool_runs_migrations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("school.sqlite");
        let pool = create_pool(path.to_str().unwrap()).unwrap();

        let conn = get_connection(&pool).unwrap();
        let users: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0)).unwrap();
        assert_eq!(users, 0);
    }

    #[test]
    fn test_create_pool_twice_on_same_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("school.sqlite");
        let path = path.to_str().unwrap();

        create_pool(path).unwrap();
        assert!(create_pool(path).is_ok());
    }
}
