//! Per-user conversation state for multi-step flows.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::core::error::AppResult;
use crate::storage::FeedbackCategory;

/// What the bot expects from the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationMode {
    #[default]
    None,
    /// Feedback menu was shown; the next free-text message is the feedback body.
    AwaitingFeedback { category: Option<FeedbackCategory> },
}

impl ConversationMode {
    pub fn is_awaiting_feedback(&self) -> bool {
        matches!(self, ConversationMode::AwaitingFeedback { .. })
    }
}

/// Storage for conversation state, one mode per user.
///
/// Implementations own their consistency: callers never lock around these
/// calls. Setting `ConversationMode::None` is the same as `clear`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn set(&self, user_id: i64, mode: ConversationMode) -> AppResult<()>;

    /// Current mode, `ConversationMode::None` when nothing is stored.
    async fn get(&self, user_id: i64) -> AppResult<ConversationMode>;

    async fn clear(&self, user_id: i64) -> AppResult<()>;
}

#[derive(Debug, Clone, Copy)]
struct StateEntry {
    mode: ConversationMode,
    updated_at: Instant,
}

/// Process-local session store.
///
/// Every operation takes the same lock, so a `set` and a `clear` for one user
/// never interleave. With a TTL, entries untouched for longer than the TTL
/// read as `None` and are evicted.
#[derive(Clone)]
pub struct InMemorySessionStore {
    states: Arc<Mutex<HashMap<i64, StateEntry>>>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    /// Store whose entries never expire.
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            states: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn is_expired(&self, entry: &StateEntry, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.duration_since(entry.updated_at) >= ttl)
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut states = self.states.lock().await;
        let now = Instant::now();
        let before = states.len();
        states.retain(|_, entry| !self.is_expired(entry, now));
        before - states.len()
    }

    /// Number of users with an active flow, expired entries included until purged.
    pub async fn len(&self) -> usize {
        self.states.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.lock().await.is_empty()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn set(&self, user_id: i64, mode: ConversationMode) -> AppResult<()> {
        let mut states = self.states.lock().await;
        if mode == ConversationMode::None {
            states.remove(&user_id);
        } else {
            states.insert(
                user_id,
                StateEntry {
                    mode,
                    updated_at: Instant::now(),
                },
            );
        }
        Ok(())
    }

    async fn get(&self, user_id: i64) -> AppResult<ConversationMode> {
        let mut states = self.states.lock().await;
        let Some(entry) = states.get(&user_id).copied() else {
            return Ok(ConversationMode::None);
        };

        if self.is_expired(&entry, Instant::now()) {
            log::info!("Conversation state {:?} for user {} expired", entry.mode, user_id);
            states.remove(&user_id);
            return Ok(ConversationMode::None);
        }

        Ok(entry.mode)
    }

    async fn clear(&self, user_id: i64) -> AppResult<()> {
        self.states.lock().await.remove(&user_id);
        Ok(())
    }
}
