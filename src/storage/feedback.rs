//! Persistent log of feedback messages collected from users

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::core::error::AppResult;
use crate::storage::db::{get_connection, DbConnection, DbPool};

/// Kind of feedback the user picked from the category menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    Suggestion,
    Complaint,
    Question,
    Compliment,
}

/// A stored feedback message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEntry {
    pub id: i64,
    pub telegram_id: i64,
    pub category: Option<FeedbackCategory>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Sink for captured feedback.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Stores a message and returns its id.
    async fn save(&self, telegram_id: i64, category: Option<FeedbackCategory>, message: &str) -> AppResult<i64>;

    /// All feedback left by one user, oldest first.
    async fn list_for(&self, telegram_id: i64) -> AppResult<Vec<FeedbackEntry>>;
}

/// Сохраняет отзыв пользователя в базу данных.
pub fn save_feedback(
    conn: &DbConnection,
    telegram_id: i64,
    category: Option<FeedbackCategory>,
    message: &str,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO feedback (telegram_id, category, message, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            telegram_id,
            category.map(|c| c.to_string()),
            message,
            Utc::now().to_rfc3339()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_feedback_for_user(conn: &DbConnection, telegram_id: i64) -> AppResult<Vec<FeedbackEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, telegram_id, category, message, created_at FROM feedback WHERE telegram_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map([telegram_id], entry_from_row)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<FeedbackEntry> {
    let category: Option<String> = row.get(2)?;
    let created_at: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(FeedbackEntry {
        id: row.get(0)?,
        telegram_id: row.get(1)?,
        category: category.and_then(|c| c.parse().ok()),
        message: row.get(3)?,
        created_at,
    })
}

#[derive(Clone)]
pub struct SqliteFeedbackStore {
    pool: Arc<DbPool>,
}

impl SqliteFeedbackStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedbackStore for SqliteFeedbackStore {
    async fn save(&self, telegram_id: i64, category: Option<FeedbackCategory>, message: &str) -> AppResult<i64> {
        let conn = get_connection(&self.pool)?;
        let id = save_feedback(&conn, telegram_id, category, message)?;
        log::info!(
            "💾 Feedback #{} saved for user {} (category: {})",
            id,
            telegram_id,
            category.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string())
        );
        Ok(id)
    }

    async fn list_for(&self, telegram_id: i64) -> AppResult<Vec<FeedbackEntry>> {
        let conn = get_connection(&self.pool)?;
        get_feedback_for_user(&conn, telegram_id)
    }
}
