//! Strato CLI — manage Strato projects, auth users and framework deploys
//! from the terminal.

mod bootstrap;
mod commands;
mod shutdown;
mod update;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use strato_core::StratoError;
use strato_frameworks::FrameworkError;
use tokio::task::JoinHandle;
use tracing::debug;

use bootstrap::{install_panic_hook, start_logging, EarlyFlags, RunConfig};
use commands::{Cli, Commands};
use shutdown::shutdown;
use update::UpdateNotifier;

/// How long a finished command waits for an in-flight update check.
const UPDATE_GRACE: Duration = Duration::from_millis(750);

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let flags = EarlyFlags::scan(&args, |key| std::env::var(key).ok());

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => return fatal(&e),
    };
    let log_file = match RunConfig::log_file_for(&cwd) {
        Ok(path) => path,
        Err(e) => return fatal(&e),
    };
    let run = match RunConfig::load(flags, log_file, cwd) {
        Ok(run) => run,
        Err(e) => {
            report_error(&e.into());
            return ExitCode::from(1);
        }
    };
    if let Err(e) = start_logging(&run, &args) {
        return fatal(&e);
    }
    install_panic_hook(run.shutdown_context(None));
    bootstrap::force_panic_if_requested();

    let (code, command) = match Cli::try_parse_from(&args) {
        Err(e) => {
            // --help and --version arrive here too.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            (code, None)
        }
        Ok(cli) => {
            let command = cli.command.as_ref().map(Commands::path);
            debug!(command = ?command, "dispatching");
            let pending = run.update_enabled().then(|| spawn_update_check(&run));

            let code = match commands::execute(cli, &run).await {
                Ok(()) => 0,
                Err(e) => {
                    report_error(&e);
                    exit_code_for(&e)
                }
            };
            if let Some(handle) = pending {
                if tokio::time::timeout(UPDATE_GRACE, handle).await.is_err() {
                    debug!("update check still running, leaving it for the next run");
                }
            }
            (code, command)
        }
    };

    shutdown(code, &run.shutdown_context(command));
    ExitCode::from(code)
}

fn spawn_update_check(run: &RunConfig) -> JoinHandle<()> {
    let notifier = UpdateNotifier::new(run.config.update.clone(), run.state.clone());
    tokio::spawn(async move {
        if let Err(e) = notifier.refresh().await {
            debug!(error = %e, "update check failed");
        }
    })
}

/// Map a command error to the process exit code.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<StratoError>() {
        return u8::try_from(e.exit_code()).unwrap_or(2);
    }
    if err.downcast_ref::<FrameworkError>().is_some() {
        return 1;
    }
    2
}

fn report_error(err: &anyhow::Error) {
    debug!("{err:?}");
    eprintln!("\n  {} {err:#}", "Error:".red().bold());
}

/// Startup failed before logging was available.
fn fatal(err: &dyn std::fmt::Display) -> ExitCode {
    eprintln!("{} {err}", "Error:".red().bold());
    ExitCode::from(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&StratoError::NoProject.into()), 1);
        assert_eq!(
            exit_code_for(&StratoError::LogFileUnavailable(PathBuf::from("x")).into()),
            2
        );
        assert_eq!(
            exit_code_for(&FrameworkError::MissingManifest(PathBuf::from(".next")).into()),
            1
        );
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), 2);
    }
}
