//! Roster CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! roster migrate
//!
//! # Replace all users with the sample set
//! roster seed
//!
//! # Add the sample users without truncating
//! roster seed --keep --file ./more-users.yaml
//!
//! # Print the number of stored users
//! roster users count
//! ```
//!
//! # Environment Variables
//!
//! - `ROSTER_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about = "Roster CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load sample users
    Seed {
        /// Keep existing users instead of truncating first
        #[arg(long)]
        keep: bool,

        /// YAML file with users to load (defaults to the bundled sample set)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Inspect stored users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// Print the number of stored users
    Count,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { keep, file } => commands::seed::run(keep, file.as_deref()).await?,
        Commands::Users { action } => match action {
            UsersAction::Count => commands::users::count().await?,
        },
    }
    Ok(())
}
