//! User directory: Telegram account id → local profile

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::core::error::AppResult;
use crate::storage::db::{get_connection, DbConnection, DbPool};

/// Role of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, AsRefStr, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Student,
    Teacher,
    Parent,
    Admin,
}

impl UserRole {
    /// Parses a stored role, falling back to `Student` for values this build doesn't know.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            log::warn!("Unknown stored role '{}', treating as student", value);
            UserRole::Student
        })
    }
}

/// Fields written on every registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    pub telegram_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

/// A user as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    /// Telegram ID пользователя
    pub telegram_id: i64,
    /// Username in Telegram, empty if the account has none
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    /// Set on first registration, never overwritten
    pub registered_at: DateTime<Utc>,
}

/// Durable lookup of registered users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Inserts the user or replaces the mutable fields of an existing record.
    async fn upsert(&self, registration: &UserRegistration) -> AppResult<()>;

    /// Point read by Telegram id. A missing user is `Ok(None)`.
    async fn lookup(&self, telegram_id: i64) -> AppResult<Option<UserProfile>>;
}

/// Inserts a user or refreshes the profile of an existing one.
///
/// `created_at` is only written on insert, so repeated registrations keep the
/// original registration time.
pub fn upsert_user(conn: &DbConnection, registration: &UserRegistration) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users (telegram_id, username, first_name, last_name, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(telegram_id) DO UPDATE SET
             username = excluded.username,
             first_name = excluded.first_name,
             last_name = excluded.last_name,
             role = excluded.role",
        params![
            registration.telegram_id,
            registration.username,
            registration.first_name,
            registration.last_name,
            registration.role.as_ref(),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Получает пользователя из базы данных по Telegram ID.
///
/// Returns `Ok(None)` when the user is not registered.
pub fn get_user(conn: &DbConnection, telegram_id: i64) -> AppResult<Option<UserProfile>> {
    let user = conn
        .query_row(
            "SELECT telegram_id, username, first_name, last_name, role, created_at FROM users WHERE telegram_id = ?1",
            [telegram_id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

/// Number of registered users.
pub fn count_users(conn: &DbConnection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let role: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let registered_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(UserProfile {
        telegram_id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        role: UserRole::from_stored(&role),
        registered_at,
    })
}

/// SQLite-backed user directory sharing the application pool.
#[derive(Clone)]
pub struct SqliteUserDirectory {
    pool: Arc<DbPool>,
}

impl SqliteUserDirectory {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn upsert(&self, registration: &UserRegistration) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;
        upsert_user(&conn, registration)?;
        log::debug!("Registered user {}", registration.telegram_id);
        Ok(())
    }

    async fn lookup(&self, telegram_id: i64) -> AppResult<Option<UserProfile>> {
        let conn = get_connection(&self.pool)?;
        get_user(&conn, telegram_id)
    }
}
