//! Startup wiring: run configuration, logging and the panic handler.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use colored::Colorize;
use strato_core::logging::{log_session_header, SessionHeader};
use strato_core::{
    init_logging, select_log_file, LoggingOptions, StateStore, StratoConfig, StratoResult,
};
use tracing::{debug, error};

use crate::shutdown::{shutdown, ShutdownContext};
use crate::update;

/// Enables debug logging, same as `--debug`.
pub const ENV_DEBUG: &str = "STRATO_DEBUG";

/// Console log filter (EnvFilter syntax).
pub const ENV_LOG: &str = "STRATO_LOG";

/// Panics right after startup in debug builds, to exercise the panic hook.
pub const ENV_FORCE_PANIC: &str = "STRATO_FORCE_PANIC";

/// Flags read before argument parsing so logging covers parse errors too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EarlyFlags {
    pub debug: bool,
    pub non_interactive: bool,
}

impl EarlyFlags {
    /// Scan raw arguments (stopping at `--`) and the environment.
    pub fn scan<F>(args: &[String], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut flags = Self::default();
        for arg in args.iter().skip(1).take_while(|a| a.as_str() != "--") {
            match arg.as_str() {
                "--debug" => flags.debug = true,
                "--non-interactive" => flags.non_interactive = true,
                _ => {}
            }
        }
        if lookup(ENV_DEBUG).is_some_and(|v| truthy(&v)) {
            flags.debug = true;
        }
        flags
    }
}

fn truthy(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "no")
}

/// Explicit configuration for one CLI run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub debug: bool,
    pub interactive: bool,
    pub log_file: PathBuf,
    pub config: StratoConfig,
    pub env_overrides: Vec<&'static str>,
    pub state: StateStore,
    pub cwd: PathBuf,
}

impl RunConfig {
    /// Pick the log file in `cwd`. This is the one fatal startup step.
    pub fn log_file_for(cwd: &Path) -> StratoResult<PathBuf> {
        select_log_file(cwd)
    }

    /// Load configuration and state for a run.
    pub fn load(flags: EarlyFlags, log_file: PathBuf, cwd: PathBuf) -> StratoResult<Self> {
        let mut config = StratoConfig::load()?;
        let env_overrides = config.apply_env();
        let state = match StratoConfig::config_dir() {
            Some(dir) => StateStore::new(dir.join("state.json")),
            None => StateStore::ephemeral(),
        };
        Ok(Self {
            debug: flags.debug,
            interactive: !flags.non_interactive && std::io::stdout().is_terminal(),
            log_file,
            config,
            env_overrides,
            state,
            cwd,
        })
    }

    pub fn logging_options(&self) -> LoggingOptions {
        LoggingOptions {
            log_file: self.log_file.clone(),
            debug: self.debug,
            console_filter: std::env::var(ENV_LOG).ok(),
        }
    }

    /// Whether the background update check should run.
    pub fn update_enabled(&self) -> bool {
        self.interactive
            && update::notifier_enabled(&self.config.update, |key| std::env::var(key).ok())
    }

    /// Snapshot for the shutdown routine.
    pub fn shutdown_context(&self, command: Option<String>) -> ShutdownContext {
        ShutdownContext {
            log_file: self.log_file.clone(),
            debug: self.debug,
            interactive: self.interactive,
            command,
            state: self.state.clone(),
            update_enabled: self.update_enabled(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Install logging and write the session header.
pub fn start_logging(run: &RunConfig, args: &[String]) -> StratoResult<()> {
    init_logging(&run.logging_options())?;
    log_session_header(&SessionHeader {
        command: &args.join(" "),
        version: env!("CARGO_PKG_VERSION"),
        env_overrides: &run.env_overrides,
    });
    Ok(())
}

/// Report panics, run the shutdown routine with exit code 2 and exit.
pub fn install_panic_hook(ctx: ShutdownContext) {
    std::panic::set_hook(Box::new(move |info| {
        error!("{info}");
        eprintln!(
            "\n  {} An unexpected error has occurred.\n  {}",
            "Error:".red().bold(),
            info
        );
        eprintln!(
            "\n  Please check {} for more info.",
            ctx.log_file.display().to_string().bold()
        );
        debug!(backtrace = %std::backtrace::Backtrace::force_capture(), "panic");
        shutdown(2, &ctx);
        std::process::exit(2);
    }));
}

/// Panic when [`ENV_FORCE_PANIC`] is set. A no-op in release builds.
pub fn force_panic_if_requested() {
    if cfg!(debug_assertions) && std::env::var_os(ENV_FORCE_PANIC).is_some() {
        panic!("{ENV_FORCE_PANIC} is set");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("strato")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_early_flags_from_args() {
        let flags = EarlyFlags::scan(&args(&["projects", "list", "--debug"]), |_| None);
        assert_eq!(
            flags,
            EarlyFlags {
                debug: true,
                non_interactive: false
            }
        );

        let flags = EarlyFlags::scan(&args(&["--non-interactive", "status"]), |_| None);
        assert!(flags.non_interactive);
        assert!(!flags.debug);
    }

    #[test]
    fn test_early_flags_stop_at_separator() {
        let flags = EarlyFlags::scan(&args(&["mcp", "--", "--debug"]), |_| None);
        assert!(!flags.debug);
    }

    #[test]
    fn test_debug_from_env() {
        let on = |k: &str| (k == ENV_DEBUG).then(|| "1".to_string());
        assert!(EarlyFlags::scan(&args(&[]), on).debug);

        let off = |k: &str| (k == ENV_DEBUG).then(|| "false".to_string());
        assert!(!EarlyFlags::scan(&args(&[]), off).debug);
    }
}
