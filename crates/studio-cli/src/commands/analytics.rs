//! Dashboard and attribution commands.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use studio_core::models::{AttributionQuery, MatchTestRequest, NewMatchingRule};

use crate::cli::GlobalArgs;
use crate::commands::{parse_pairs, read_json};
use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Print the raw summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum AttributionCommand {
    /// Attribution counters
    Stats(QueryArgs),

    /// Acquisition funnel
    Funnel(QueryArgs),

    /// List matching rules
    Rules,

    /// Show the active matching rule
    ActiveRule,

    /// Create a matching rule
    CreateRule(CreateRuleArgs),

    /// Make a matching rule the active one
    ActivateRule(RuleIdArgs),

    /// Dry-run matching between a visit and an install
    TestRule(TestRuleArgs),
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Traffic source
    #[arg(long)]
    pub source: Option<String>,
}

impl From<QueryArgs> for AttributionQuery {
    fn from(args: QueryArgs) -> Self {
        Self {
            start_date: args.start_date,
            end_date: args.end_date,
            source: args.source,
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateRuleArgs {
    /// Rule name
    #[arg(long)]
    pub name: String,

    /// Signal weight (signal=weight), repeatable
    #[arg(long = "weight", value_name = "SIGNAL=WEIGHT", required = true)]
    pub weights: Vec<String>,

    /// Minimum score for a match
    #[arg(long)]
    pub threshold: f64,

    /// Maximum hours between visit and install
    #[arg(long)]
    pub time_window_hours: Option<u32>,
}

#[derive(Args, Debug)]
pub struct RuleIdArgs {
    /// Rule id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct TestRuleArgs {
    /// Rule to test (active rule when omitted)
    #[arg(long)]
    pub rule_id: Option<String>,

    /// JSON file with web-visit signals
    #[arg(long)]
    pub visit: PathBuf,

    /// JSON file with install signals
    #[arg(long)]
    pub install: PathBuf,
}

pub async fn dashboard(global: &GlobalArgs, args: DashboardArgs) -> Result<()> {
    let ctx = CliContext::open(global)?;
    ctx.require_session()?;
    let dashboard = ctx.registry().dashboard(None)?;

    let summary = ctx.check(dashboard.summary().await, "Failed to fetch dashboard")?;
    if args.json {
        return output::json_pretty(&summary);
    }

    output::field("Users", &summary.total_users.to_string());
    output::field("Active users", &summary.active_users.to_string());
    output::field("Jobs today", &summary.jobs_today.to_string());
    output::field("Failed jobs today", &summary.failed_jobs_today.to_string());
    output::field("Credits spent today", &summary.credits_spent_today.to_string());

    Ok(())
}

pub async fn handle(global: &GlobalArgs, cmd: AttributionCommand) -> Result<()> {
    let ctx = CliContext::open(global)?;
    ctx.require_session()?;
    let attribution = ctx.registry().attribution(None)?;

    match cmd {
        AttributionCommand::Stats(args) => {
            let stats = ctx.check(
                attribution.stats(&args.into()).await,
                "Failed to fetch attribution stats",
            )?;
            output::json_pretty(&stats)?;
        }
        AttributionCommand::Funnel(args) => {
            let funnel = ctx.check(attribution.funnel(&args.into()).await, "Failed to fetch funnel")?;
            for step in &funnel.steps {
                let rate = step
                    .conversion_rate
                    .map(|r| format!("  {:.1}%", r * 100.0))
                    .unwrap_or_default();
                println!("{:<24} {:>10}{}", step.name, step.count, rate);
            }
        }
        AttributionCommand::Rules => {
            let rules = ctx.check(attribution.rules().await, "Failed to list matching rules")?;
            for rule in &rules {
                let marker = if rule.is_active { "*" } else { " " };
                println!("{} {}  {}  threshold={}", marker, rule.id, rule.name, rule.threshold);
            }
        }
        AttributionCommand::ActiveRule => {
            match ctx.check(attribution.active_rule().await, "Failed to fetch active rule")? {
                Some(rule) => output::json_pretty(&rule)?,
                None => output::warning("No active matching rule"),
            }
        }
        AttributionCommand::CreateRule(args) => {
            let weights = parse_weights(&args.weights)?;
            let rule = NewMatchingRule {
                name: args.name,
                weights,
                threshold: args.threshold,
                time_window_hours: args.time_window_hours,
            };
            let created = ctx.check(attribution.create_rule(&rule).await, "Failed to create rule")?;
            output::success("Matching rule created");
            output::field("ID", &created.id);
        }
        AttributionCommand::ActivateRule(args) => {
            let rule = ctx.check(
                attribution.activate_rule(&args.id).await,
                "Failed to activate rule",
            )?;
            output::success(&format!("Activated rule {}", rule.name));
        }
        AttributionCommand::TestRule(args) => {
            let request = MatchTestRequest {
                rule_id: args.rule_id,
                visit: read_json(&args.visit)?,
                install: read_json(&args.install)?,
            };
            let result = ctx.check(attribution.test_rule(&request).await, "Failed to test rule")?;
            output::field("Score", &format!("{:.3}", result.score));
            output::field("Matched", &result.matched.to_string());
            for (signal, score) in &result.breakdown {
                output::field(signal, &format!("{:.3}", score));
            }
        }
    }

    Ok(())
}

fn parse_weights(pairs: &[String]) -> Result<BTreeMap<String, f64>> {
    let mut weights = BTreeMap::new();
    for (signal, raw) in parse_pairs(pairs)? {
        let weight: f64 = raw
            .parse()
            .with_context(|| format!("Invalid weight for {}: '{}'", signal, raw))?;
        if !weight.is_finite() || weight < 0.0 {
            bail!("Weight for {} must be a non-negative number", signal);
        }
        weights.insert(signal, weight);
    }
    Ok(weights)
}
