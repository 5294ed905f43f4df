//! Session commands: login, logout, whoami, verify.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use studio_core::Credentials;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Admin account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "STUDIO_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the session as JSON (token omitted)
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {}

pub async fn login(global: &GlobalArgs, args: LoginArgs) -> Result<()> {
    let ctx = CliContext::open(global)?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let session = ctx
        .manager()
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("User", &session.user.email);
    output::field("Expires", &session.expires_at.to_rfc3339());
    output::field("API", &global.api_root);

    Ok(())
}

pub fn logout(global: &GlobalArgs, _args: LogoutArgs) -> Result<()> {
    let ctx = CliContext::open(global)?;
    ctx.manager().logout().context("Failed to clear session")?;
    output::success("Logged out");
    Ok(())
}

pub fn whoami(global: &GlobalArgs, args: WhoamiArgs) -> Result<()> {
    let ctx = CliContext::open(global)?;
    let session = ctx.require_session()?;

    if args.json {
        return output::json_pretty(&serde_json::json!({
            "user": session.user,
            "permissions": session.permissions,
            "expires_at": session.expires_at,
        }));
    }

    output::field("User", &session.user.email);
    output::field("ID", &session.user.id);
    if let Some(name) = session.user.name() {
        output::field("Name", name);
    }
    if !session.permissions.is_empty() {
        output::field("Permissions", &session.permissions.join(", "));
    }
    output::field("Expires", &session.expires_at.to_rfc3339());

    Ok(())
}

pub async fn verify(global: &GlobalArgs, _args: VerifyArgs) -> Result<()> {
    let ctx = CliContext::open(global)?;
    ctx.require_session()?;

    let valid = ctx
        .manager()
        .verify()
        .await
        .context("Failed to verify session")?;

    if valid {
        output::success("Session is valid");
        Ok(())
    } else {
        ctx.manager().logout().context("Failed to clear session")?;
        anyhow::bail!("Session was rejected by the server and has been cleared")
    }
}
