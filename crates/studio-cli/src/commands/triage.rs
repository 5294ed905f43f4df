//! Job and alert commands. Both families share one triage workflow.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use studio_core::ResourceFamily;
use studio_core::models::TicketRequest;
use studio_http::Triage;

use crate::cli::GlobalArgs;
use crate::commands::templates::{IdArgs, ListArgs};
use crate::output;
use crate::session::CliContext;

#[derive(Subcommand, Debug)]
pub enum TriageCommand {
    /// List items
    List(ListArgs),

    /// Fetch a single item
    Get(IdArgs),

    #[command(flatten)]
    Workflow(WorkflowCommand),
}

/// Commands shared by every triage family.
#[derive(Subcommand, Debug)]
pub enum WorkflowCommand {
    /// Show aggregate counters
    Stats,

    /// Acknowledge one item
    Ack(AckArgs),

    /// Acknowledge several items
    AckBatch(AckBatchArgs),

    /// Open a ticket for an item
    Ticket(TicketArgs),
}

#[derive(Args, Debug)]
pub struct AckArgs {
    /// Item id
    pub id: String,

    /// Note stored with the acknowledgement
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args, Debug)]
pub struct AckBatchArgs {
    /// Item ids
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Note stored with the acknowledgement
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args, Debug)]
pub struct TicketArgs {
    /// Item id
    pub id: String,

    /// Ticket title
    #[arg(long)]
    pub title: String,

    /// Ticket description
    #[arg(long)]
    pub description: Option<String>,

    /// Assignee
    #[arg(long)]
    pub assignee: Option<String>,
}

pub async fn handle(global: &GlobalArgs, family: ResourceFamily, cmd: TriageCommand) -> Result<()> {
    let ctx = CliContext::open(global)?;
    ctx.require_session()?;

    match family {
        ResourceFamily::Jobs => {
            let jobs = ctx.registry().jobs(None)?;
            match cmd {
                TriageCommand::List(args) => {
                    let page = ctx.check(jobs.list(&args.params()?).await, "Failed to list jobs")?;
                    output::json_pretty(&page)
                }
                TriageCommand::Get(args) => {
                    let job = ctx.check(jobs.get(&args.id).await, "Failed to get job")?;
                    output::json_pretty(&job)
                }
                TriageCommand::Workflow(cmd) => run_workflow(&ctx, &jobs, family, cmd).await,
            }
        }
        ResourceFamily::Alerts => {
            let alerts = ctx.registry().alerts(None)?;
            match cmd {
                TriageCommand::List(args) => {
                    let page =
                        ctx.check(alerts.list(&args.params()?).await, "Failed to list alerts")?;
                    output::json_pretty(&page)
                }
                TriageCommand::Get(args) => {
                    let alert = ctx.check(alerts.get(&args.id).await, "Failed to get alert")?;
                    output::json_pretty(&alert)
                }
                TriageCommand::Workflow(cmd) => run_workflow(&ctx, &alerts, family, cmd).await,
            }
        }
        other => bail!("{} has no triage workflow", other),
    }
}

async fn run_workflow(
    ctx: &CliContext,
    workflow: &dyn Triage,
    family: ResourceFamily,
    cmd: WorkflowCommand,
) -> Result<()> {
    match cmd {
        WorkflowCommand::Stats => {
            let stats = ctx.check(workflow.stats().await, "Failed to fetch stats")?;
            output::field("Total", &stats.total.to_string());
            output::field("Unacknowledged", &stats.unacknowledged.to_string());
            for (key, value) in &stats.extra {
                output::field(key, &value.to_string());
            }
        }
        WorkflowCommand::Ack(args) => {
            ctx.check(
                workflow.acknowledge(&args.id, args.note.as_deref()).await,
                "Failed to acknowledge",
            )?;
            output::success(&format!("Acknowledged {} {}", family, args.id));
        }
        WorkflowCommand::AckBatch(args) => {
            let result = ctx.check(
                workflow
                    .acknowledge_batch(&args.ids, args.note.as_deref())
                    .await,
                "Failed to acknowledge",
            )?;
            output::success(&format!("Acknowledged {} item(s)", result.acknowledged));
        }
        WorkflowCommand::Ticket(args) => {
            let request = TicketRequest {
                title: args.title,
                description: args.description,
                assignee: args.assignee,
            };
            let ticket = ctx.check(
                workflow.create_ticket(&args.id, &request).await,
                "Failed to create ticket",
            )?;
            output::success("Ticket created");
            output::field("Ticket", &ticket.id);
            if let Some(url) = &ticket.url {
                output::field("URL", url);
            }
        }
    }

    Ok(())
}
