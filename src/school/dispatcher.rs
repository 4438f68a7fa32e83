//! Action dispatcher: routes one inbound event to exactly one reply.
//!
//! The dispatcher owns no state of its own. Users, section content,
//! conversation state and feedback all live behind the traits it is
//! constructed with, so the same instance is shared by every handler task.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use crate::core::config;
use crate::core::error::AppResult;
use crate::school::action::{parse_category_callback, Action, ActionRequest};
use crate::school::catalog::{ContentCatalog, SectionId};
use crate::school::event::{Account, EventKind, InboundEvent};
use crate::school::replies;
use crate::school::response::ResponseDescriptor;
use crate::school::session::{ConversationMode, SessionStore};
use crate::storage::{FeedbackStore, UserDirectory, UserRegistration, UserRole};

/// Settings for the welcome screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingConfig {
    pub school_name: String,
    pub webapp_url: String,
}

impl GreetingConfig {
    pub fn new(school_name: impl Into<String>, webapp_url: impl Into<String>) -> Self {
        Self {
            school_name: school_name.into(),
            webapp_url: webapp_url.into(),
        }
    }

    /// Reads `SCHOOL_NAME` and `WEBAPP_URL`.
    pub fn from_env() -> Self {
        Self::new(config::SCHOOL_NAME.as_str(), config::WEBAPP_URL.as_str())
    }
}

#[derive(Clone)]
pub struct ActionDispatcher {
    users: Arc<dyn UserDirectory>,
    catalog: Arc<dyn ContentCatalog>,
    sessions: Arc<dyn SessionStore>,
    feedback: Arc<dyn FeedbackStore>,
    greeting: GreetingConfig,
}

impl ActionDispatcher {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        catalog: Arc<dyn ContentCatalog>,
        sessions: Arc<dyn SessionStore>,
        feedback: Arc<dyn FeedbackStore>,
        greeting: GreetingConfig,
    ) -> Self {
        Self {
            users,
            catalog,
            sessions,
            feedback,
            greeting,
        }
    }

    /// Handles an event and always produces a reply.
    ///
    /// Errors and panics raised while building the reply are logged here and
    /// turned into the generic internal-error message.
    pub async fn handle(&self, event: InboundEvent) -> ResponseDescriptor {
        let user_id = event.account.id;
        let kind = event.kind.name();

        match AssertUnwindSafe(self.route(event)).catch_unwind().await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_storage_unavailable() => {
                log::error!("Storage unavailable while handling {} for user {}: {}", kind, user_id, e);
                replies::internal_error()
            }
            Ok(Err(e)) => {
                log::error!("Failed to handle {} for user {}: {:?}", kind, user_id, e);
                replies::internal_error()
            }
            Err(panic) => {
                log::error!(
                    "Panic while handling {} for user {}: {}",
                    kind,
                    user_id,
                    panic_message(panic.as_ref())
                );
                replies::internal_error()
            }
        }
    }

    async fn route(&self, event: InboundEvent) -> AppResult<ResponseDescriptor> {
        let InboundEvent { account, kind } = event;
        match kind {
            EventKind::Greeting => self.handle_greeting(&account).await,
            EventKind::ClientPayload(raw) => self.handle_client_payload(&raw, &account).await,
            EventKind::FreeText(text) => self.handle_free_text(&text, &account).await,
            EventKind::CategorySelection(data) => self.handle_category_selection(&data, &account).await,
        }
    }

    /// Registers the account and shows the welcome screen.
    ///
    /// The greeting doubles as the main menu, so any unfinished flow is dropped.
    /// Profile fields are refreshed, a role assigned outside the bot is kept.
    pub async fn handle_greeting(&self, account: &Account) -> AppResult<ResponseDescriptor> {
        let role = match self.users.lookup(account.id).await? {
            Some(existing) => existing.role,
            None => {
                log::info!("New user {} registered", account.id);
                UserRole::default()
            }
        };
        let registration = UserRegistration {
            telegram_id: account.id,
            username: account.username.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            role,
        };
        self.users.upsert(&registration).await?;
        self.sessions.clear(account.id).await?;

        Ok(replies::welcome(
            &account.first_name,
            &self.greeting.school_name,
            &self.greeting.webapp_url,
        ))
    }

    /// Handles `web_app_data` sent by the Mini App.
    pub async fn handle_client_payload(&self, raw: &str, account: &Account) -> AppResult<ResponseDescriptor> {
        if raw.trim().is_empty() {
            log::warn!("Empty Mini App payload from user {}", account.id);
            return Ok(replies::no_app_data());
        }

        let request = match ActionRequest::decode(raw) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Malformed Mini App payload from user {}: {}", account.id, e);
                return Ok(replies::malformed_request());
            }
        };

        let action = request.classify();
        log::info!(
            "Mini App action from user {}: {:?}, role: {}",
            account.id,
            action,
            request.role()
        );

        match action {
            Action::OpenSection => {
                self.sessions.clear(account.id).await?;
                match request.section.as_deref() {
                    Some(section) => Ok(self.resolve_section(section, request.role())),
                    None => {
                        log::warn!("open_section without section from user {}", account.id);
                        Ok(replies::section_not_found())
                    }
                }
            }
            Action::Feedback => {
                self.sessions
                    .set(account.id, ConversationMode::AwaitingFeedback { category: None })
                    .await?;
                Ok(replies::feedback_menu())
            }
            Action::MainMenu => self.handle_greeting(account).await,
            Action::Unrecognized(_) => Ok(replies::unknown_action()),
        }
    }

    /// Looks up section content.
    ///
    /// `role` is accepted so per-role content can be added later; the current
    /// catalog serves everyone the same text.
    pub fn resolve_section(&self, section: &str, _role: &str) -> ResponseDescriptor {
        let body = section
            .parse::<SectionId>()
            .ok()
            .and_then(|id| self.catalog.get(id));

        match body {
            Some(body) => ResponseDescriptor::markdown(body),
            None => {
                log::info!("Section '{}' not found", section);
                replies::section_not_found()
            }
        }
    }

    /// Captures the feedback body when the user is in the feedback flow.
    pub async fn handle_free_text(&self, text: &str, account: &Account) -> AppResult<ResponseDescriptor> {
        let ConversationMode::AwaitingFeedback { category } = self.sessions.get(account.id).await? else {
            log::debug!("Free text from user {} outside of any flow", account.id);
            return Ok(replies::use_app_hint(&self.greeting.webapp_url));
        };

        let message = text.trim();
        if message.is_empty() {
            return Ok(replies::feedback_empty());
        }
        // Unhandled slash commands are never taken as the feedback body
        if message.starts_with('/') {
            log::debug!("Command '{}' from user {} while awaiting feedback", message, account.id);
            return Ok(replies::feedback_not_command());
        }

        // Saved before clearing: if storage fails the user can simply resend.
        let feedback_id = self.feedback.save(account.id, category, message).await?;
        self.sessions.clear(account.id).await?;

        log::info!("💬 Feedback #{} received from user {}", feedback_id, account.id);
        Ok(replies::feedback_thanks())
    }

    /// Handles a press on one of the feedback category buttons.
    pub async fn handle_category_selection(&self, data: &str, account: &Account) -> AppResult<ResponseDescriptor> {
        let Some(category) = parse_category_callback(data) else {
            log::warn!("Unknown callback data '{}' from user {}", data, account.id);
            return Ok(replies::unknown_action());
        };

        if !self.sessions.get(account.id).await?.is_awaiting_feedback() {
            return Ok(replies::feedback_expired());
        }

        self.sessions
            .set(
                account.id,
                ConversationMode::AwaitingFeedback {
                    category: Some(category),
                },
            )
            .await?;
        Ok(replies::feedback_prompt(category))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic payload"
    }
}
