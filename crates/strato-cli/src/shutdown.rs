//! Shutdown routine run once on every exit path.
//!
//! Decides whether the debug log is kept, prints the "having trouble"
//! hint after repeated failures and shows the update notification.

use std::path::PathBuf;

use chrono::Utc;
use colored::Colorize;
use strato_core::logging::LOG_FILE_NAME;
use strato_core::StateStore;
use tracing::debug;

use crate::update;

/// Two failures closer together than this trigger the help hint.
pub const TROUBLE_WINDOW_MS: i64 = 120_000;

/// What the shutdown routine needs to know about the run.
#[derive(Debug, Clone)]
pub struct ShutdownContext {
    pub log_file: PathBuf,
    pub debug: bool,
    pub interactive: bool,
    /// Subcommand path (e.g. `auth users disable`) once arguments parsed.
    pub command: Option<String>,
    pub state: StateStore,
    pub update_enabled: bool,
    pub version: &'static str,
}

/// The log is only worth keeping for debug runs and unexpected failures.
pub fn should_remove_log(exit_code: u8, debug: bool) -> bool {
    !debug && exit_code < 2
}

/// The hint printed after a failure that closely follows another one.
pub fn trouble_hint(
    exit_code: u8,
    command: Option<&str>,
    last_error: Option<i64>,
    now_ms: i64,
) -> Option<String> {
    if exit_code == 0 {
        return None;
    }
    let last = last_error?;
    if now_ms.saturating_sub(last) >= TROUBLE_WINDOW_MS {
        return None;
    }
    Some(match (exit_code, command) {
        (1, Some(command)) => format!("Having trouble? Try `strato {command} --help`"),
        _ => format!(
            "Having trouble? Try again or contact support with contents of {LOG_FILE_NAME}"
        ),
    })
}

/// Run the shutdown routine for `exit_code`.
pub fn shutdown(exit_code: u8, ctx: &ShutdownContext) {
    debug!(exit_code, "shutting down");

    if should_remove_log(exit_code, ctx.debug) && ctx.log_file.exists() {
        if let Err(e) = std::fs::remove_file(&ctx.log_file) {
            debug!(path = %ctx.log_file.display(), error = %e, "could not remove debug log");
        }
    }

    let state = ctx.state.load();

    if exit_code == 0 {
        if state.last_error.is_some() {
            record_last_error(ctx, None);
        }
        if ctx.interactive && ctx.update_enabled {
            if let Some(latest) = update::newer_version(ctx.version, state.update_check.as_ref()) {
                eprintln!("\n  {}\n", update::notification(ctx.version, latest));
            }
        }
        return;
    }

    if !ctx.interactive {
        return;
    }
    let now = Utc::now().timestamp_millis();
    if let Some(hint) = trouble_hint(exit_code, ctx.command.as_deref(), state.last_error, now) {
        eprintln!("\n  {}", hint.bold());
    }
    record_last_error(ctx, Some(now));
}

fn record_last_error(ctx: &ShutdownContext, value: Option<i64>) {
    if let Err(e) = ctx.state.update(|state| state.last_error = value) {
        debug!(error = %e, "could not persist CLI state");
    }
}
