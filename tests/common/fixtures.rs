//! Test fixtures for dispatcher integration tests
//!
//! Provides TestEnvironment with a real SQLite database in a temp directory,
//! the built-in catalog and an in-memory session store.

#![allow(dead_code)]

use std::sync::Arc;

use schooldesk::school::{
    Account, ActionDispatcher, GreetingConfig, InMemorySessionStore, InboundEvent, ResponseDescriptor, StaticCatalog,
};
use schooldesk::storage::{create_pool, DbPool, SqliteFeedbackStore, SqliteUserDirectory};
use tempfile::TempDir;

pub const WEBAPP_URL: &str = "https://school.example/app";
pub const SCHOOL_NAME: &str = "Школа №1";

/// Complete test environment
///
/// # Example
/// ```ignore
/// let env = TestEnvironment::new();
/// let reply = env.dispatch(InboundEvent::greeting(student(42))).await;
/// assert!(env.users.lookup(42).await?.is_some());
/// ```
pub struct TestEnvironment {
    pub dispatcher: ActionDispatcher,
    pub users: Arc<SqliteUserDirectory>,
    pub sessions: Arc<InMemorySessionStore>,
    pub feedback: Arc<SqliteFeedbackStore>,
    pub catalog: Arc<StaticCatalog>,
    pub db_pool: Arc<DbPool>,
    // Keeps the database file alive for the lifetime of the environment
    _dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_sessions(InMemorySessionStore::new())
    }

    pub fn with_sessions(sessions: InMemorySessionStore) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("school.sqlite");
        let db_pool = Arc::new(create_pool(path.to_str().expect("utf-8 path")).expect("create pool"));

        let users = Arc::new(SqliteUserDirectory::new(Arc::clone(&db_pool)));
        let feedback = Arc::new(SqliteFeedbackStore::new(Arc::clone(&db_pool)));
        let sessions = Arc::new(sessions);
        let catalog = Arc::new(StaticCatalog::builtin());

        let dispatcher = ActionDispatcher::new(
            users.clone(),
            catalog.clone(),
            sessions.clone(),
            feedback.clone(),
            GreetingConfig::new(SCHOOL_NAME, WEBAPP_URL),
        );

        Self {
            dispatcher,
            users,
            sessions,
            feedback,
            catalog,
            db_pool,
            _dir: dir,
        }
    }

    pub async fn dispatch(&self, event: InboundEvent) -> ResponseDescriptor {
        self.dispatcher.handle(event).await
    }

    pub async fn send_payload(&self, user_id: i64, raw: &str) -> ResponseDescriptor {
        self.dispatch(InboundEvent::client_payload(student(user_id), raw)).await
    }

    pub fn user_count(&self) -> i64 {
        let conn = schooldesk::storage::get_connection(&self.db_pool).expect("connection");
        schooldesk::storage::users::count_users(&conn).expect("count users")
    }
}

pub fn student(id: i64) -> Account {
    Account::new(id).with_names("masha", "Маша", "Иванова")
}

/// Builds a Mini App payload.
pub fn payload(action: &str, section: Option<&str>) -> String {
    let mut value = serde_json::json!({ "action": action, "role": "student" });
    if let Some(section) = section {
        value["section"] = serde_json::Value::String(section.to_string());
    }
    value.to_string()
}
