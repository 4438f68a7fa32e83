//! Database storage: connection pool, migrations, users and feedback

pub mod db;
pub mod feedback;
pub mod migrations;
pub mod users;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool};
pub use feedback::{FeedbackCategory, FeedbackEntry, FeedbackStore, SqliteFeedbackStore};
pub use users::{SqliteUserDirectory, UserDirectory, UserProfile, UserRegistration, UserRole};
