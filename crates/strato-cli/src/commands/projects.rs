//! `strato projects` — list and inspect projects.

use clap::{Args, Subcommand};
use colored::Colorize;
use strato_core::{ManagementApi, Project};

use super::CommandContext;

#[derive(Subcommand)]
pub enum ProjectsCommands {
    /// List projects you have access to.
    List,
    /// Show a project (defaults to the active project).
    Get(GetArgs),
}

impl ProjectsCommands {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectsCommands::List => "list",
            ProjectsCommands::Get(_) => "get",
        }
    }
}

#[derive(Args)]
pub struct GetArgs {
    /// Project ID.
    pub id: Option<String>,
}

pub async fn execute(cmd: ProjectsCommands, ctx: &CommandContext) -> anyhow::Result<()> {
    match cmd {
        ProjectsCommands::List => list(ctx).await,
        ProjectsCommands::Get(args) => get(args, ctx).await,
    }
}

async fn list(ctx: &CommandContext) -> anyhow::Result<()> {
    let client = ctx.authenticated_client()?;
    let projects = ctx
        .with_spinner("Fetching projects...", client.list_projects())
        .await?;
    if ctx.is_json() {
        return ctx.print_json(&projects);
    }

    let active = ctx.project().ok().flatten();
    println!("\n  {}\n", "Projects:".bold());
    if projects.is_empty() {
        println!("  (no projects)");
        return Ok(());
    }

    println!(
        "  {:<28} {:<28} {:<14} {}",
        "PROJECT ID".bold(),
        "DISPLAY NAME".bold(),
        "NUMBER".bold(),
        "STATE".bold()
    );
    println!("  {}", "─".repeat(80).dimmed());
    for p in &projects {
        let marker = if active.as_deref() == Some(p.project_id.as_str()) {
            " (current)".green().to_string()
        } else {
            String::new()
        };
        println!(
            "  {:<28} {:<28} {:<14} {}{}",
            p.project_id,
            p.display_name.as_deref().unwrap_or("-"),
            p.project_number.as_deref().unwrap_or("-"),
            p.state,
            marker
        );
    }
    println!("\n  {} {} project(s)", "→".dimmed(), projects.len());
    Ok(())
}

async fn get(args: GetArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let id = match args.id {
        Some(id) => id,
        None => ctx.require_project()?,
    };
    let client = ctx.authenticated_client()?;
    let project = ctx
        .with_spinner("Fetching project...", client.get_project(&id))
        .await?;
    if ctx.is_json() {
        return ctx.print_json(&project);
    }
    print_project(&project);
    Ok(())
}

fn print_project(p: &Project) {
    println!("\n  {} {}\n", "Project:".bold(), p.project_id.cyan());
    println!(
        "  {:<16} {}",
        "Display name:".bold(),
        p.display_name.as_deref().unwrap_or("-")
    );
    println!(
        "  {:<16} {}",
        "Number:".bold(),
        p.project_number.as_deref().unwrap_or("-")
    );
    println!("  {:<16} {}", "Resource:".bold(), p.name.as_deref().unwrap_or("-"));
    println!("  {:<16} {}", "State:".bold(), p.state);
    if let Some(resources) = &p.resources {
        println!("  {:<16}", "Resources:".bold());
        if let Some(map) = resources.as_object() {
            for (key, value) in map {
                println!("    {:<20} {}", key.dimmed(), value.as_str().unwrap_or(&value.to_string()));
            }
        }
    }
    println!();
}
