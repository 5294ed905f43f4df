//! studio-admin - command-line admin client for the studio backend.
//!
//! A thin wrapper over `studio-http`: every command restores the stored
//! session, calls one endpoint and prints the payload.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{analytics, auth, templates, triage, users};
use studio_core::ResourceFamily;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.json_logs);

    let global = cli.global;
    match cli.command {
        Commands::Login(args) => auth::login(&global, args).await,
        Commands::Logout(args) => auth::logout(&global, args),
        Commands::Whoami(args) => auth::whoami(&global, args),
        Commands::Verify(args) => auth::verify(&global, args).await,
        Commands::Templates(cmd) => templates::handle(&global, cmd).await,
        Commands::Users(cmd) => users::handle(&global, cmd).await,
        Commands::Jobs(cmd) => triage::handle(&global, ResourceFamily::Jobs, cmd).await,
        Commands::Alerts(cmd) => triage::handle(&global, ResourceFamily::Alerts, cmd).await,
        Commands::Dashboard(args) => analytics::dashboard(&global, args).await,
        Commands::Attribution(cmd) => analytics::handle(&global, cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
