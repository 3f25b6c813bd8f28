//! Rollcall CLI - Browse and manage the member and user lists.
//!
//! # Usage
//!
//! ```bash
//! # List members whose name, ID or phone contains "rao", richest first
//! rollcall members list --search rao --sort money --desc
//!
//! # Rename a member and set their balance
//! rollcall members edit 65f1c0ffee123456 --name "Asha Rao" --money 120.50
//!
//! # Delete a user without the confirmation prompt
//! rollcall users delete 65f1c0ffee654321 --yes
//!
//! # Talk to a staging service
//! rollcall --base-url http://localhost:4000 users list
//! ```
//!
//! # Commands
//!
//! - `members list|edit|delete` - Member list
//! - `users list|edit|delete` - User list

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;

use clap::{Args, Parser, Subcommand};
use rollcall_admin::{AdminConfig, RecordClient};
use rollcall_core::{Member, MemberField, SortKey, User, UserField};

mod commands;
mod telemetry;

use commands::CliError;

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(author, version, about = "Rollcall admin lists")]
struct Cli {
    /// Record service origin, overriding `ROLLCALL_API_BASE_URL`
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage club members
    Members {
        #[command(subcommand)]
        action: MemberAction,
    },
    /// Manage app users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum MemberAction {
    /// Show the member list
    List(ListArgs),
    /// Edit a member's name, phone or balance
    Edit {
        /// Member record ID
        id: String,

        /// New full name
        #[arg(short, long)]
        name: Option<String>,

        /// New phone number
        #[arg(short, long)]
        phone: Option<String>,

        /// New balance, e.g. 120.50
        #[arg(short, long)]
        money: Option<String>,
    },
    /// Delete a member
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
enum UserAction {
    /// Show the user list
    List(ListArgs),
    /// Edit a user's name or phone
    Edit {
        /// User record ID
        id: String,

        /// New full name
        #[arg(short, long)]
        name: Option<String>,

        /// New phone number
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Delete a user
    Delete(DeleteArgs),
}

/// Search and sort options for list commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show records whose name, ID or phone contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort by `name`, `money`, `total-bets` or `created`
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Show every column, including full record IDs
    #[arg(short, long)]
    pub wide: bool,
}

/// Options for delete commands.
#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Record ID
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be initialized before the tracing subscriber
    let config = AdminConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(telemetry::init_sentry);
    telemetry::init_tracing();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AdminConfig) -> Result<(), CliError> {
    let config = match &cli.base_url {
        Some(url) => config.with_base_url(url)?,
        None => config,
    };
    let client = RecordClient::new(&config)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Members { action } => {
            let store = commands::open::<Member>(&client).await?;
            match action {
                MemberAction::List(args) => commands::list::run(&store, &args, &mut out)?,
                MemberAction::Edit {
                    id,
                    name,
                    phone,
                    money,
                } => {
                    let fields = name
                        .map(MemberField::FullName)
                        .into_iter()
                        .chain(phone.map(MemberField::Phone))
                        .chain(money.map(MemberField::Money))
                        .collect();
                    commands::edit::run(&store, id, fields, &mut out).await?;
                }
                MemberAction::Delete(args) => {
                    commands::delete::run(&store, &args, &mut out).await?;
                }
            }
            commands::print_notices(&store, &mut out)?;
        }
        Commands::Users { action } => {
            let store = commands::open::<User>(&client).await?;
            match action {
                UserAction::List(args) => commands::list::run(&store, &args, &mut out)?,
                UserAction::Edit { id, name, phone } => {
                    let fields = name
                        .map(UserField::FullName)
                        .into_iter()
                        .chain(phone.map(UserField::Phone))
                        .collect();
                    commands::edit::run(&store, id, fields, &mut out).await?;
                }
                UserAction::Delete(args) => {
                    commands::delete::run(&store, &args, &mut out).await?;
                }
            }
            commands::print_notices(&store, &mut out)?;
        }
    }
    Ok(())
}
