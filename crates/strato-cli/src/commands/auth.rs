//! `strato auth` — manage auth users.

use clap::{Args, Subcommand};
use colored::Colorize;
use strato_core::{ManagementApi, StratoError, UserRecord};
use tracing::info;

use super::CommandContext;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Look up, disable or enable users.
    #[command(subcommand)]
    Users(UsersCommands),
}

impl AuthCommands {
    pub fn name(&self) -> String {
        match self {
            AuthCommands::Users(cmd) => format!("users {}", cmd.name()),
        }
    }
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Show a user.
    Get(GetArgs),
    /// Disable a user (or re-enable with --enable).
    Disable(DisableArgs),
}

impl UsersCommands {
    pub fn name(&self) -> &'static str {
        match self {
            UsersCommands::Get(_) => "get",
            UsersCommands::Disable(_) => "disable",
        }
    }
}

#[derive(Args)]
pub struct GetArgs {
    /// User UID.
    pub uid: String,
}

#[derive(Args)]
pub struct DisableArgs {
    /// User UID.
    pub uid: String,

    /// Re-enable the user instead.
    #[arg(long)]
    pub enable: bool,

    /// Skip the confirmation prompt.
    #[arg(long, short)]
    pub force: bool,
}

pub async fn execute(cmd: AuthCommands, ctx: &CommandContext) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Users(UsersCommands::Get(args)) => get(args, ctx).await,
        AuthCommands::Users(UsersCommands::Disable(args)) => disable(args, ctx).await,
    }
}

async fn get(args: GetArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let project = ctx.require_project()?;
    let client = ctx.authenticated_client()?;

    let lookup = client.get_user(&project, &args.uid);
    let Some(user) = ctx.with_spinner("Looking up user...", lookup).await? else {
        return Err(StratoError::Invalid(format!(
            "No user with UID {} in project {project}",
            args.uid
        ))
        .into());
    };
    if ctx.is_json() {
        return ctx.print_json(&user);
    }
    print_user(&user);
    Ok(())
}

async fn disable(args: DisableArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    let project = ctx.require_project()?;
    let client = ctx.authenticated_client()?;
    let disabled = !args.enable;
    let verb = if disabled { "Disable" } else { "Enable" };

    if !args.force {
        if !ctx.interactive {
            return Err(StratoError::Invalid(format!(
                "Pass --force to {} users in non-interactive mode",
                verb.to_lowercase()
            ))
            .into());
        }
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("  {verb} user '{}' in {project}?", args.uid))
            .default(false)
            .interact()?;
        if !confirm {
            println!("  {} Cancelled.", "→".dimmed());
            return Ok(());
        }
    }

    info!(uid = %args.uid, disabled, project = %project, "updating user");
    let user = ctx
        .with_spinner(
            "Updating user...",
            client.set_user_disabled(&project, &args.uid, disabled),
        )
        .await?;
    if ctx.is_json() {
        return ctx.print_json(&user);
    }
    let state = if user.disabled { "disabled".red() } else { "enabled".green() };
    println!("  {} User {} is now {}.", "✔".green(), user.local_id.bold(), state);
    Ok(())
}

fn print_user(user: &UserRecord) {
    println!("\n  {} {}\n", "User:".bold(), user.local_id.cyan());
    let created = format_millis(user.created_at.as_deref());
    let last_login = format_millis(user.last_login_at.as_deref());
    let rows = [
        ("Email:", user.email.as_deref()),
        ("Display name:", user.display_name.as_deref()),
        ("Phone:", user.phone_number.as_deref()),
        ("Created:", created.as_deref()),
        ("Last login:", last_login.as_deref()),
        ("Custom claims:", user.custom_attributes.as_deref()),
    ];
    for (label, value) in rows {
        println!("  {:<16} {}", label.bold(), value.unwrap_or("-"));
    }
    let state = if user.disabled { "disabled".red() } else { "enabled".green() };
    println!("  {:<16} {}\n", "Status:".bold(), state);
}

/// Render a string-encoded epoch-millis timestamp; unparseable values pass through.
fn format_millis(value: Option<&str>) -> Option<String> {
    let value = value?;
    let formatted = value
        .parse::<i64>()
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());
    Some(formatted.unwrap_or_else(|| value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis() {
        assert_eq!(
            format_millis(Some("1700000000000")).as_deref(),
            Some("2023-11-14 22:13:20 UTC")
        );
        assert_eq!(format_millis(Some("soon")).as_deref(), Some("soon"));
        assert_eq!(format_millis(None), None);
    }
}
