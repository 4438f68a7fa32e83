use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::interval;

use schooldesk::cli::{Cli, Commands};
use schooldesk::core::{config, init_logger, log_startup_configuration};
use schooldesk::school::{ActionDispatcher, GreetingConfig, InMemorySessionStore, StaticCatalog};
use schooldesk::storage::{create_pool, SqliteFeedbackStore, SqliteUserDirectory};
use schooldesk::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, catalog, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env before any config value is read
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::CheckCatalog { path }) => check_catalog(&path),
        Some(Commands::Run) | None => run_bot().await,
    }
}

/// Validates a catalog file and logs the sections it provides
fn check_catalog(path: &str) -> Result<()> {
    let catalog = StaticCatalog::from_json_file(path)?;
    for section in catalog.sections() {
        log::info!("✅ {}", section);
    }
    log::info!("Catalog {} is valid", path);
    Ok(())
}

fn load_catalog() -> Result<StaticCatalog> {
    match *config::CATALOG_PATH {
        Some(ref path) => Ok(StaticCatalog::from_json_file(path)?),
        None => Ok(StaticCatalog::builtin()),
    }
}

/// Run the bot with long polling until Ctrl+C
async fn run_bot() -> Result<()> {
    log_startup_configuration();

    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);
    let catalog = load_catalog()?;
    let sessions = Arc::new(InMemorySessionStore::with_ttl(config::session::state_ttl()));

    if config::session::state_ttl().is_some() {
        let sessions = Arc::clone(&sessions);
        tokio::spawn(async move {
            let mut ticker = interval(config::session::purge_interval());
            loop {
                ticker.tick().await;
                let purged = sessions.purge_expired().await;
                if purged > 0 {
                    log::info!("Dropped {} abandoned feedback flow(s)", purged);
                }
            }
        });
    }

    let dispatcher = Arc::new(ActionDispatcher::new(
        Arc::new(SqliteUserDirectory::new(Arc::clone(&db_pool))),
        Arc::new(catalog),
        sessions,
        Arc::new(SqliteFeedbackStore::new(db_pool)),
        GreetingConfig::from_env(),
    ));

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    log::info!("🚀 Starting bot for {}...", *config::SCHOOL_NAME);

    // Create polling listener that drops pending updates on start
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, schema(HandlerDeps::new(dispatcher)))
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
