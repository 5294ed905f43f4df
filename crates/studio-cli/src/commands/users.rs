//! App user commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::GlobalArgs;
use crate::commands::templates::{IdArgs, ListArgs};
use crate::output;
use crate::session::CliContext;

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List app users
    List(ListArgs),

    /// Fetch a single user
    Get(IdArgs),

    /// Grant credits to a user (negative amounts revoke)
    GrantCredits(GrantCreditsArgs),
}

#[derive(Args, Debug)]
pub struct GrantCreditsArgs {
    /// User id
    pub id: String,

    /// Credits to add
    #[arg(long, allow_negative_numbers = true)]
    pub amount: i64,

    /// Reason recorded in the ledger
    #[arg(long)]
    pub reason: Option<String>,
}

pub async fn handle(global: &GlobalArgs, cmd: UsersCommand) -> Result<()> {
    let ctx = CliContext::open(global)?;
    ctx.require_session()?;
    let users = ctx.registry().users(None)?;

    match cmd {
        UsersCommand::List(args) => {
            let page = ctx.check(users.list(&args.params()?).await, "Failed to list users")?;
            if args.json {
                return output::json_pretty(&page);
            }
            for user in &page.items {
                let email = user.email.as_deref().unwrap_or("-");
                println!("{}  {}  credits={}", user.id, email, user.credits);
            }
            output::field("Total", &page.total.to_string());
        }
        UsersCommand::Get(args) => {
            let user = ctx.check(users.get(&args.id).await, "Failed to get user")?;
            output::json_pretty(&user)?;
        }
        UsersCommand::GrantCredits(args) => {
            let grant = ctx.check(
                users
                    .grant_credits(&args.id, args.amount, args.reason.as_deref())
                    .await,
                "Failed to grant credits",
            )?;
            output::success(&format!("Granted {} credit(s) to {}", args.amount, args.id));
            output::field("Balance", &grant.balance.to_string());
            if let Some(tx) = &grant.transaction_id {
                output::field("Transaction", tx);
            }
        }
    }

    Ok(())
}
