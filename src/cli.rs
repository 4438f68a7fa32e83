use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "schooldesk")]
#[command(author, version, about = "Telegram front-end for the school information Mini App", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling
    Run,

    /// Validate a section catalog JSON file and list its sections
    CheckCatalog {
        /// Path to the catalog file
        path: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
