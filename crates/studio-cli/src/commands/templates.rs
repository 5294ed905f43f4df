//! Template commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use studio_core::models::{ListParams, Page, Template};

use crate::cli::GlobalArgs;
use crate::commands::{parse_pairs, read_json};
use crate::output;
use crate::session::CliContext;

#[derive(Subcommand, Debug)]
pub enum TemplatesCommand {
    /// List templates
    List(ListArgs),

    /// Fetch a single template
    Get(IdArgs),

    /// List template categories
    Categories,

    /// Create a template from a JSON document
    Create(CreateArgs),

    /// Apply a JSON patch document to a template
    Update(UpdateArgs),

    /// Delete a template
    Delete(IdArgs),

    /// Copy a template
    Duplicate(IdArgs),

    /// Apply the same changes to several templates
    BatchUpdate(BatchUpdateArgs),

    /// Upload a preview asset
    Upload(UploadArgs),
}

/// Paging and filters shared by list commands.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Items per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Status filter
    #[arg(long)]
    pub status: Option<String>,

    /// Extra filter passed through as a query parameter (key=value)
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Print the raw page as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub(crate) fn params(&self) -> Result<ListParams> {
        let mut params = ListParams {
            page: self.page,
            page_size: self.page_size,
            search: self.search.clone(),
            status: self.status.clone(),
            ..ListParams::default()
        };
        for (key, value) in parse_pairs(&self.filters)? {
            params = params.filter(key, value);
        }
        Ok(params)
    }
}

#[derive(Args, Debug)]
pub struct IdArgs {
    /// Resource id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// JSON file with the template body (`-` for stdin)
    #[arg(long)]
    pub json: PathBuf,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Template id
    pub id: String,

    /// JSON file with the fields to change (`-` for stdin)
    #[arg(long)]
    pub json: PathBuf,
}

#[derive(Args, Debug)]
pub struct BatchUpdateArgs {
    /// Template ids
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// JSON file with the fields to change (`-` for stdin)
    #[arg(long)]
    pub json: PathBuf,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// File to upload
    pub file: PathBuf,

    /// MIME type of the file
    #[arg(long, default_value = "image/png")]
    pub content_type: String,
}

pub async fn handle(global: &GlobalArgs, cmd: TemplatesCommand) -> Result<()> {
    let ctx = CliContext::open(global)?;
    ctx.require_session()?;
    let templates = ctx.registry().templates(None)?;

    match cmd {
        TemplatesCommand::List(args) => {
            let page = ctx.check(templates.list(&args.params()?).await, "Failed to list templates")?;
            if args.json {
                output::json_pretty(&page)?;
            } else {
                print_page(&page);
            }
        }
        TemplatesCommand::Get(args) => {
            let template = ctx.check(templates.get(&args.id).await, "Failed to get template")?;
            output::json_pretty(&template)?;
        }
        TemplatesCommand::Categories => {
            let categories = ctx.check(templates.categories().await, "Failed to list categories")?;
            for category in &categories {
                let count = category
                    .template_count
                    .map(|c| format!(" ({})", c))
                    .unwrap_or_default();
                println!("{}  {}{}", category.id, category.name, count);
            }
        }
        TemplatesCommand::Create(args) => {
            let body = read_json(&args.json)?;
            let template = ctx.check(templates.create(&body).await, "Failed to create template")?;
            output::success("Template created");
            output::field("ID", &template.id);
        }
        TemplatesCommand::Update(args) => {
            let changes = read_json(&args.json)?;
            let template = ctx.check(
                templates.update(&args.id, &changes).await,
                "Failed to update template",
            )?;
            output::success("Template updated");
            output::json_pretty(&template)?;
        }
        TemplatesCommand::Delete(args) => {
            ctx.check(templates.delete(&args.id).await, "Failed to delete template")?;
            output::success(&format!("Deleted template {}", args.id));
        }
        TemplatesCommand::Duplicate(args) => {
            let copy = ctx.check(templates.duplicate(&args.id).await, "Failed to duplicate template")?;
            output::success("Template duplicated");
            output::field("ID", &copy.id);
        }
        TemplatesCommand::BatchUpdate(args) => {
            let updates = read_json(&args.json)?;
            let result = ctx.check(
                templates.batch_update(&args.ids, &updates).await,
                "Failed to batch update templates",
            )?;
            output::success(&format!("Updated {} template(s)", result.updated));
            if !result.failed.is_empty() {
                output::warning(&format!("Failed: {}", result.failed.join(", ")));
            }
        }
        TemplatesCommand::Upload(args) => {
            let bytes = std::fs::read(&args.file)
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let file_name = args
                .file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();
            let uploaded = ctx.check(
                templates.upload(&file_name, &args.content_type, bytes).await,
                "Failed to upload file",
            )?;
            output::success("Uploaded");
            output::field("URL", &uploaded.url);
        }
    }

    Ok(())
}

fn print_page(page: &Page<Template>) {
    for template in &page.items {
        let state = if template.is_active { "active" } else { "inactive" };
        let category = template.category.as_deref().unwrap_or("-");
        println!("{}  {}  [{}] {}", template.id, template.name, category, state);
    }
    output::field("Total", &page.total.to_string());
}
