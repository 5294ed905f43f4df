//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::analytics::{AttributionCommand, DashboardArgs};
use crate::commands::auth::{LoginArgs, LogoutArgs, VerifyArgs, WhoamiArgs};
use crate::commands::templates::TemplatesCommand;
use crate::commands::triage::TriageCommand;
use crate::commands::users::UsersCommand;

/// Admin client for the studio backend.
#[derive(Parser, Debug)]
#[command(name = "studio-admin")]
#[command(author, version = env!("STUDIO_ADMIN_VERSION"), about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Backend root URL
    #[arg(
        long,
        global = true,
        env = "STUDIO_API_ROOT",
        default_value = "https://api.studio.app"
    )]
    pub api_root: String,

    /// Request timeout in seconds (transport default when unset)
    #[arg(long, global = true, env = "STUDIO_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout(LogoutArgs),

    /// Display the active session
    Whoami(WhoamiArgs),

    /// Check the stored token against the server
    Verify(VerifyArgs),

    /// Generation templates
    #[command(subcommand)]
    Templates(TemplatesCommand),

    /// App users and credits
    #[command(subcommand)]
    Users(UsersCommand),

    /// Generation jobs
    #[command(subcommand)]
    Jobs(TriageCommand),

    /// Operational alerts
    #[command(subcommand)]
    Alerts(TriageCommand),

    /// Dashboard summary
    Dashboard(DashboardArgs),

    /// Acquisition attribution analytics
    #[command(subcommand)]
    Attribution(AttributionCommand),
}
