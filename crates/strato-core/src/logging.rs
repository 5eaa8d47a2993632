//! Logging — debug log file selection and the tracing pipeline.
//!
//! Every CLI run writes a verbose `[level] message` log to a
//! `strato-debug.log` file in the working directory, while only warnings
//! (or everything, with `--debug`) reach stderr. The shutdown routine in
//! the CLI decides whether the file is kept.

use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use regex::Regex;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{debug, Event, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{StratoError, StratoResult};

/// File name of the first debug log candidate.
pub const LOG_FILE_NAME: &str = "strato-debug.log";

/// Number of numbered candidates tried before giving up.
pub const LOG_FILE_CANDIDATES: usize = 10;

/// Dependencies whose debug output drowns out ours.
const NOISY_TARGETS: [&str; 4] = ["hyper", "reqwest", "h2", "rustls"];

/// Logging options resolved at startup.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// File receiving the `[level] message` log.
    pub log_file: PathBuf,
    /// Verbose console output.
    pub debug: bool,
    /// Console filter directive (EnvFilter syntax), e.g. from `STRATO_LOG`.
    pub console_filter: Option<String>,
}

/// Candidate log file paths in `dir`, in the order they are tried.
pub fn log_file_candidates(dir: &Path) -> Vec<PathBuf> {
    std::iter::once(dir.join(LOG_FILE_NAME))
        .chain((1..LOG_FILE_CANDIDATES).map(|i| dir.join(format!("strato-debug.{i}.log"))))
        .collect()
}

/// Pick the debug log file for this run.
///
/// Returns the first candidate that does not exist yet or can be opened for
/// reading and writing. Any other error skips to the next candidate.
pub fn select_log_file(dir: &Path) -> StratoResult<PathBuf> {
    select_log_file_with(dir, open_read_write)
}

/// [`select_log_file`] with a custom accessibility probe.
pub fn select_log_file_with<F>(dir: &Path, probe: F) -> StratoResult<PathBuf>
where
    F: Fn(&Path) -> io::Result<()>,
{
    for candidate in log_file_candidates(dir) {
        match probe(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(candidate),
            Err(_) => continue,
        }
    }
    Err(StratoError::LogFileUnavailable(dir.join(LOG_FILE_NAME)))
}

fn open_read_write(path: &Path) -> io::Result<()> {
    OpenOptions::new().read(true).write(true).open(path).map(|_| ())
}

/// Install the global subscriber: the debug file layer plus a stderr layer.
pub fn init_logging(options: &LoggingOptions) -> StratoResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&options.log_file)?;

    let console_filter = options
        .console_filter
        .as_deref()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| default_console_filter(options.debug));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer(file))
        .with(console_layer)
        .try_init()
        .map_err(|e| StratoError::Config(format!("failed to initialize logging: {e}")))
}

/// Layer writing `[level] message` lines to `file` at debug verbosity.
pub fn file_layer<S>(file: File) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let targets = NOISY_TARGETS.iter().fold(
        Targets::new().with_default(LevelFilter::DEBUG),
        |targets, target| targets.with_target(*target, LevelFilter::INFO),
    );

    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(BracketFormat)
        .with_writer(Mutex::new(file))
        .with_filter(targets)
}

fn default_console_filter(debug: bool) -> EnvFilter {
    let base = if debug { "debug" } else { "warn" };
    let directive = NOISY_TARGETS
        .iter()
        .fold(base.to_string(), |mut acc, target| {
            let _ = write!(acc, ",{target}=info");
            acc
        });
    EnvFilter::new(directive)
}

/// Event format producing `[level] message` with control sequences removed.
///
/// Fields are read raw through [`LineVisitor`] rather than the layer's field
/// formatter, which escapes control characters before they can be stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketFormat;

impl<S, N> FormatEvent<S, N> for BracketFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let level = event.metadata().level().as_str().to_ascii_lowercase();
        writeln!(writer, "[{level}] {}", visitor.finish())
    }
}

/// Collects an event's message and `key=value` fields as plain text.
#[derive(Debug, Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(self) -> String {
        let line = if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        };
        strip_control_sequences(&line)
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), strip_control_sequences(value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

/// Remove ANSI/VT escape sequences and stray control characters.
///
/// Tabs and newlines survive.
pub fn strip_control_sequences(input: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07]*\x07|[\x00-\x08\x0b-\x1f\x7f]")
            .expect("control sequence pattern is valid")
    });
    re.replace_all(input, "").into_owned()
}

/// What gets written at the top of every debug log.
#[derive(Debug, Clone)]
pub struct SessionHeader<'a> {
    /// The full command line.
    pub command: &'a str,
    /// CLI version.
    pub version: &'a str,
    /// Environment variables that overrode configuration.
    pub env_overrides: &'a [&'a str],
}

/// Log the session header at debug level.
pub fn log_session_header(header: &SessionHeader<'_>) {
    let rule = "-".repeat(70);
    debug!("{rule}");
    debug!("Command:       {}", header.command);
    debug!("CLI Version:   {}", header.version);
    debug!(
        "Platform:      {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    debug!("Time:          {}", chrono::Local::now().to_rfc2822());
    if !header.env_overrides.is_empty() {
        debug!("Env Overrides: {}", header.env_overrides.join(", "));
    }
    debug!("{rule}");
    debug!("");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing::{info, warn};

    fn not_found(_: &Path) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::NotFound))
    }

    #[test]
    fn test_ten_candidates() {
        let dir = Path::new("/work");
        let candidates = log_file_candidates(dir);
        assert_eq!(candidates.len(), 10);
        assert_eq!(candidates[0], dir.join("strato-debug.log"));
        assert_eq!(candidates[1], dir.join("strato-debug.1.log"));
        assert_eq!(candidates[9], dir.join("strato-debug.9.log"));
    }

    #[test]
    fn test_first_candidate_when_absent() {
        let path = select_log_file_with(Path::new("/work"), not_found).unwrap();
        assert_eq!(path, Path::new("/work/strato-debug.log"));
    }

    #[test]
    fn test_skips_inaccessible_candidates() {
        let path = select_log_file_with(Path::new("/work"), |p| {
            let name = p.file_name().unwrap().to_str().unwrap();
            if name == "strato-debug.log" || name == "strato-debug.1.log" {
                Err(io::Error::from(io::ErrorKind::PermissionDenied))
            } else {
                Ok(())
            }
        })
        .unwrap();
        assert_eq!(path, Path::new("/work/strato-debug.2.log"));
    }

    #[test]
    fn test_all_inaccessible_is_fatal() {
        let err = select_log_file_with(Path::new("/work"), |_| {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        })
        .unwrap_err();
        assert!(matches!(err, StratoError::LogFileUnavailable(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_existing_writable_file_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LOG_FILE_NAME), "[debug] old run\n").unwrap();
        let path = select_log_file(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(LOG_FILE_NAME));
    }

    #[test]
    fn test_strip_control_sequences() {
        assert_eq!(
            strip_control_sequences("\x1b[1m\x1b[32m✔\x1b[39m\x1b[22m done"),
            "✔ done"
        );
        assert_eq!(strip_control_sequences("tab\tand\nnewline"), "tab\tand\nnewline");
        assert_eq!(strip_control_sequences("bell\x07"), "bell");
    }

    #[test]
    fn test_bracket_format_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        let file = File::create(&path).unwrap();

        let subscriber = tracing_subscriber::registry().with(file_layer(file));
        tracing::subscriber::with_default(subscriber, || {
            debug!("Command:       strato projects list");
            info!(project = "demo-app", "using project");
            warn!("\x1b[33mheads up\x1b[39m");
            warn!(
                status = "\x1b[1mdone\x1b[22m",
                "{}",
                "\x1b]8;;https://strato.dev\x07link\x1b]8;;\x07"
            );
            debug!(retries = 3);
            tracing::trace!("not written");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "[debug] Command:       strato projects list\n\
             [info] using project project=\"demo-app\"\n\
             [warn] heads up\n\
             [warn] link status=\"done\"\n\
             [debug] retries=3\n"
        );
        assert!(!content.contains('\x1b'));
        assert!(!content.contains("\\x1b"));
    }
}
