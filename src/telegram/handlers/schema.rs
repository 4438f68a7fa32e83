//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{account_from_message, account_from_user, HandlerDeps, HandlerError};
use crate::school::InboundEvent;
use crate::telegram::bot::Command;
use crate::telegram::render::send_response;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Every branch converts the update into an [`InboundEvent`], hands it to the
/// action dispatcher and sends back whatever it answers.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_webapp = deps.clone();
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        // Web App Data handler must run FIRST to process Mini App data
        .branch(webapp_handler(deps_webapp))
        .branch(command_handler(deps_commands))
        // Any other message, text or not
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

async fn dispatch_and_reply(bot: &Bot, chat_id: ChatId, deps: &HandlerDeps, event: InboundEvent) -> Result<(), HandlerError> {
    let response = deps.dispatcher.handle(event).await;
    send_response(bot, chat_id, &response).await?;
    Ok(())
}

/// Handler for Web App data from Telegram Mini Apps
fn webapp_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.web_app_data().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let data = msg.web_app_data().map(|d| d.data.clone()).unwrap_or_default();
                log::debug!("Web App Data from chat {}: {}", msg.chat.id, data);

                let event = InboundEvent::client_payload(account_from_message(&msg), data);
                dispatch_and_reply(&bot, msg.chat.id, &deps, event).await
            }
        })
}

/// Handler for /start and /menu
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("Command {:?} from chat {}", cmd, msg.chat.id);
                let event = InboundEvent::greeting(account_from_message(&msg));
                dispatch_and_reply(&bot, msg.chat.id, &deps, event).await
            }
        },
    ))
}

/// Handler for plain messages. Non-text messages arrive as empty text so they
/// still get an answer.
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let deps = deps.clone();
        async move {
            let text = msg.text().or_else(|| msg.caption()).unwrap_or_default().to_string();
            let event = InboundEvent::free_text(account_from_message(&msg), text);
            dispatch_and_reply(&bot, msg.chat.id, &deps, event).await
        }
    })
}

/// Handler for callback queries (inline keyboard buttons)
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move { handle_callback(bot, q, deps).await }
    })
}

async fn handle_callback(bot: Bot, q: CallbackQuery, deps: HandlerDeps) -> Result<(), HandlerError> {
    // Stop the client-side spinner regardless of what happens next
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        log::warn!("Failed to answer callback query: {}", e);
    }

    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        log::warn!("Callback query from user {} without a message, ignoring", q.from.id);
        return Ok(());
    };

    let data = q.data.clone().unwrap_or_default();
    let event = InboundEvent::category_selection(account_from_user(&q.from), data);
    dispatch_and_reply(&bot, chat_id, &deps, event).await
}
