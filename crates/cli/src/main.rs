//! JagMart CLI - database migrations and back-office tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply all pending migrations
//! jm-cli migrate
//!
//! # Create a new admin account
//! jm-cli admin create -e owner@jagmart.in -p 'a long passphrase' --first-name Asha
//!
//! # Promote an existing shopper
//! jm-cli admin grant -e manager@jagmart.in
//!
//! # Import a catalog spreadsheet, or only validate it
//! jm-cli import catalog.xlsx --dry-run
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "jm-cli")]
#[command(author, version, about = "JagMart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Import categories, subcategories and products from an .xlsx file
    Import {
        /// Path to the workbook
        path: PathBuf,

        /// Validate only; write nothing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new user with admin rights
    Create {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },
    /// Give an existing user admin rights
    Grant {
        #[arg(short, long)]
        email: String,
    },
    /// List users with admin rights
    List,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jm_cli=info,jagmart_admin=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                first_name,
                last_name,
            } => {
                commands::admin::create(
                    &email,
                    &password,
                    first_name.as_deref(),
                    last_name.as_deref(),
                )
                .await?;
            }
            AdminAction::Grant { email } => {
                commands::admin::grant(&email).await?;
            }
            AdminAction::List => commands::admin::list().await?,
        },
        Commands::Import { path, dry_run } => {
            let report = commands::import::run(&path, dry_run).await?;
            if !report.applied && !report.errors.is_empty() {
                return Err(format!("{} row(s) failed validation", report.errors.len()).into());
            }
        }
    }
    Ok(())
}
