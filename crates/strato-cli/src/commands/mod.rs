//! CLI command definitions and dispatch.

pub mod auth;
pub mod frameworks;
pub mod mcp;
pub mod projects;
pub mod status;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use strato_core::{resolve_project, StratoClient, StratoConfig, StratoError, StratoResult};

use crate::bootstrap::RunConfig;

/// Strato CLI — manage your Strato projects from the terminal.
#[derive(Parser)]
#[command(
    name = "strato",
    version,
    about = "Strato — manage projects, auth users and framework deploys",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project ID or .stratorc alias to use.
    #[arg(long, short = 'P', global = true)]
    pub project: Option<String>,

    /// Management API URL (overrides config and STRATO_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// API token (overrides config and STRATO_TOKEN).
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Print debug output and keep strato-debug.log.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Never prompt; fail where input would be needed.
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List and inspect projects.
    #[command(subcommand)]
    Projects(projects::ProjectsCommands),

    /// Manage auth users.
    #[command(subcommand)]
    Auth(auth::AuthCommands),

    /// Inspect framework builds for Strato Hosting.
    #[command(subcommand)]
    Frameworks(frameworks::FrameworksCommands),

    /// Serve Strato tools to agents over MCP (stdio).
    Mcp,

    /// Show configuration and API reachability.
    Status,
}

impl Commands {
    /// Subcommand path as typed, e.g. `auth users disable`.
    pub fn path(&self) -> String {
        match self {
            Commands::Projects(cmd) => format!("projects {}", cmd.name()),
            Commands::Auth(cmd) => format!("auth {}", cmd.name()),
            Commands::Frameworks(cmd) => format!("frameworks {}", cmd.name()),
            Commands::Mcp => "mcp".into(),
            Commands::Status => "status".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything a command needs, resolved from flags, env and config.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: StratoConfig,
    pub cwd: PathBuf,
    pub project_flag: Option<String>,
    pub output: OutputFormat,
    pub interactive: bool,
}

impl CommandContext {
    /// Merge the parsed flags over the run configuration.
    pub fn new(cli: &Cli, run: &RunConfig) -> Self {
        let mut config = run.config.clone();
        if let Some(url) = &cli.api_url {
            config.api_url = url.clone();
        }
        if let Some(token) = &cli.token {
            config.token = Some(token.clone());
        }
        Self {
            config,
            cwd: run.cwd.clone(),
            project_flag: cli.project.clone(),
            output: cli.output,
            interactive: run.interactive,
        }
    }

    pub fn client(&self) -> StratoResult<StratoClient> {
        StratoClient::from_config(&self.config)
    }

    /// A client with credentials; fails early when there are none.
    pub fn authenticated_client(&self) -> StratoResult<StratoClient> {
        let client = self.client()?;
        if !client.is_authenticated() {
            return Err(StratoError::NotAuthenticated);
        }
        Ok(client)
    }

    /// The active project, if any.
    pub fn project(&self) -> StratoResult<Option<String>> {
        resolve_project(self.project_flag.as_deref(), &self.config, &self.cwd)
    }

    /// The active project, or `NoProject`.
    pub fn require_project(&self) -> StratoResult<String> {
        self.project()?.ok_or(StratoError::NoProject)
    }

    pub fn is_json(&self) -> bool {
        self.output == OutputFormat::Json
    }

    /// Show a spinner on stderr while `fut` runs. Hidden for JSON output
    /// and non-interactive runs.
    pub async fn with_spinner<T>(&self, message: &str, fut: impl Future<Output = T>) -> T {
        let pb = if self.interactive && !self.is_json() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        let out = fut.await;
        pb.finish_and_clear();
        out
    }

    /// Print `value` as pretty JSON on stdout.
    pub fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Execute the CLI command. Without a subcommand, print help.
pub async fn execute(cli: Cli, run: &RunConfig) -> anyhow::Result<()> {
    let ctx = CommandContext::new(&cli, run);
    match cli.command {
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
        Some(Commands::Projects(cmd)) => projects::execute(cmd, &ctx).await,
        Some(Commands::Auth(cmd)) => auth::execute(cmd, &ctx).await,
        Some(Commands::Frameworks(cmd)) => frameworks::execute(cmd, &ctx).await,
        Some(Commands::Mcp) => mcp::execute(&ctx).await,
        Some(Commands::Status) => status::execute(&ctx).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_paths() {
        let cli = Cli::try_parse_from(["strato", "auth", "users", "disable", "u1", "--force"])
            .unwrap();
        assert_eq!(cli.command.unwrap().path(), "auth users disable");

        let cli = Cli::try_parse_from(["strato", "frameworks", "next", "inspect"]).unwrap();
        assert_eq!(cli.command.unwrap().path(), "frameworks next inspect");

        let cli = Cli::try_parse_from(["strato", "--output", "json", "status"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.command.unwrap().path(), "status");
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["strato"]).unwrap();
        assert!(cli.command.is_none());
    }
}
