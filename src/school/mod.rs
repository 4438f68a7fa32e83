//! School information service: action dispatch and conversation state
//!
//! This module has no teloxide dependency. The Telegram layer converts
//! updates into [`InboundEvent`]s and renders the returned
//! [`ResponseDescriptor`]s.

pub mod action;
pub mod catalog;
pub mod dispatcher;
pub mod event;
pub mod replies;
pub mod response;
pub mod session;

// Re-exports for convenience
pub use action::{Action, ActionRequest};
pub use catalog::{ContentCatalog, SectionId, StaticCatalog};
pub use dispatcher::{ActionDispatcher, GreetingConfig};
pub use event::{Account, EventKind, InboundEvent};
pub use response::{ActionButton, ButtonAction, Formatting, ResponseDescriptor};
pub use session::{ConversationMode, InMemorySessionStore, SessionStore};
