//! `strato status` — configuration summary and API reachability.

use colored::Colorize;
use serde::Serialize;
use strato_core::{ManagementApi, StratoConfig};

use super::CommandContext;

#[derive(Debug, Serialize)]
struct StatusReport {
    version: &'static str,
    api_url: String,
    authenticated: bool,
    project: Option<String>,
    config_file: Option<String>,
    reachable: Option<bool>,
}

pub async fn execute(ctx: &CommandContext) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let authenticated = client.is_authenticated();

    // Listing projects needs a token; without one reachability is unknown.
    let reachable = if authenticated {
        let probe = ctx.with_spinner("Checking API...", client.list_projects());
        Some(probe.await.is_ok())
    } else {
        None
    };

    let report = StatusReport {
        version: env!("CARGO_PKG_VERSION"),
        api_url: ctx.config.api_url.clone(),
        authenticated,
        project: ctx.project()?,
        config_file: StratoConfig::default_path().map(|p| p.display().to_string()),
        reachable,
    };
    if ctx.is_json() {
        return ctx.print_json(&report);
    }

    println!("\n  {}\n", "Strato".bold());
    println!("  {:<15} {}", "CLI version:".bold(), report.version);
    println!("  {:<15} {}", "API:".bold(), report.api_url);
    match report.reachable {
        Some(true) => println!("  {:<15} {}", "Connection:".bold(), "● connected".green()),
        Some(false) => println!("  {:<15} {}", "Connection:".bold(), "● unreachable".red()),
        None => println!("  {:<15} {}", "Connection:".bold(), "not checked".dimmed()),
    }
    println!(
        "  {:<15} {}",
        "Token:".bold(),
        if authenticated { "configured".green() } else { "missing".yellow() }
    );
    println!(
        "  {:<15} {}",
        "Project:".bold(),
        report.project.as_deref().unwrap_or("(none)")
    );
    if let Some(path) = &report.config_file {
        println!("  {:<15} {}", "Config:".bold(), path.dimmed());
    }
    if !authenticated {
        println!(
            "\n  {} Set STRATO_TOKEN or add `token` to the config file.",
            "Tip:".dimmed()
        );
    }
    println!();
    Ok(())
}
