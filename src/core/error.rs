use thiserror::Error;

/// Centralized error types for the application
///
/// All errors in the application are converted to this enum for consistent error handling.
/// Uses `thiserror` for automatic error conversion and display formatting.
///
/// # Example
///
/// ```no_run
/// use schooldesk::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(String),

    /// Client payload could not be decoded
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Section catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error means the backing store could not serve the request
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::DatabasePool(_) | AppError::Migration(_)
        )
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_is_storage_unavailable() {
        let err = AppError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.is_storage_unavailable());
        assert!(err.to_string().starts_with("Database error"));
    }

    #[test]
    fn test_malformed_payload_is_not_storage() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err = AppError::from(json_err);
        assert!(!err.is_storage_unavailable());
        assert!(err.to_string().starts_with("Malformed payload"));
    }

    #[test]
    fn test_telegram_error_is_not_storage() {
        let err = AppError::from(teloxide::RequestError::Api(teloxide::ApiError::BotBlocked));
        assert!(matches!(err, AppError::Telegram(_)));
        assert!(!err.is_storage_unavailable());
        assert!(err.to_string().starts_with("Telegram error"));
    }

    #[test]
    fn test_catalog_error_display() {
        let err = AppError::Catalog("unknown section 'music'".to_string());
        assert_eq!(err.to_string(), "Catalog error: unknown section 'music'");
    }
}
