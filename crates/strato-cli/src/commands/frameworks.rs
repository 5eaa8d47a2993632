//! `strato frameworks` — inspect framework builds for Strato Hosting.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use colored::Colorize;
use strato_frameworks::next::{self, NextBuildReport};

use super::CommandContext;

#[derive(Subcommand)]
pub enum FrameworksCommands {
    /// Next.js adapter.
    #[command(subcommand)]
    Next(NextCommands),
}

impl FrameworksCommands {
    pub fn name(&self) -> String {
        match self {
            FrameworksCommands::Next(cmd) => format!("next {}", cmd.name()),
        }
    }
}

#[derive(Subcommand)]
pub enum NextCommands {
    /// Translate a Next.js build into Strato Hosting routing rules.
    Inspect(InspectArgs),
}

impl NextCommands {
    pub fn name(&self) -> &'static str {
        match self {
            NextCommands::Inspect(_) => "inspect",
        }
    }
}

#[derive(Args)]
pub struct InspectArgs {
    /// App directory (defaults to the current directory).
    pub dir: Option<PathBuf>,

    /// Build output directory, relative to the app directory.
    #[arg(long, default_value = next::DEFAULT_DIST_DIR)]
    pub dist_dir: String,
}

pub async fn execute(cmd: FrameworksCommands, ctx: &CommandContext) -> anyhow::Result<()> {
    match cmd {
        FrameworksCommands::Next(NextCommands::Inspect(args)) => inspect(args, ctx),
    }
}

fn inspect(args: InspectArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let dir = match args.dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => ctx.cwd.join(dir),
        None => ctx.cwd.clone(),
    };
    let report = next::inspect_build(&dir, &args.dist_dir)?;
    if ctx.is_json() {
        return ctx.print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &NextBuildReport) {
    println!(
        "\n  {} {}\n",
        "Next.js build:".bold(),
        report.dist_dir.display().to_string().cyan()
    );
    if !report.base_path.is_empty() {
        println!("  {:<14} {}", "Base path:".bold(), report.base_path);
    }
    println!(
        "  {:<14} {}",
        "Router:".bold(),
        if report.uses_app_directory { "app" } else { "pages" }
    );

    let routes = &report.routes;
    section("Rewrites", routes.rewrites.len());
    for r in &routes.rewrites {
        println!("    {} {} {}", r.source, "→".dimmed(), r.destination);
    }
    section("Redirects", routes.redirects.len());
    for r in &routes.redirects {
        println!(
            "    {} {} {} {}",
            r.source,
            "→".dimmed(),
            r.destination,
            format!("({})", r.status).dimmed()
        );
    }
    section("Headers", routes.headers.len());
    for h in &routes.headers {
        let keys: Vec<&str> = h.headers.iter().map(|e| e.key.as_str()).collect();
        println!("    {} {}", h.source, keys.join(", ").dimmed());
    }

    println!();
    if report.needs_backend() {
        println!(
            "  {} A backend is required in addition to static hosting:",
            "⚠".yellow().bold()
        );
        for reason in &routes.backend_reasons {
            println!("    - {reason}");
        }
        if !report.non_static_routes.is_empty() {
            println!("  {:<14} {}", "Dynamic pages:".bold(), report.non_static_routes.join(", "));
        }
        if !report.middleware_matchers.is_empty() {
            println!("  {:<14} {}", "Middleware:".bold(), report.middleware_matchers.join(", "));
        }
    } else {
        println!("  {} Fully static; Strato Hosting can serve this build directly.", "✔".green());
    }
    println!();
}

fn section(title: &str, count: usize) {
    println!("\n  {} {}", title.bold(), format!("({count})").dimmed());
}
