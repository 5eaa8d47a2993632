//! Update notifier — background check for newer CLI releases.
//!
//! The latest version is fetched at most once per `interval_hours` and
//! cached in the CLI state; the notification itself is printed at
//! shutdown from the cached value.

use std::cmp::Ordering;
use std::time::Duration;

use chrono::Utc;
use colored::Colorize;
use serde::Deserialize;
use strato_core::state::{CliState, StateStore, UpdateCheck};
use strato_core::{StratoError, StratoResult, UpdateConfig};
use tracing::debug;

/// Set to any value to disable update checks.
pub const ENV_NO_UPDATE_NOTIFIER: &str = "NO_UPDATE_NOTIFIER";

/// Set by most CI providers; update checks are skipped there.
pub const ENV_CI: &str = "CI";

const CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Body served at `check_url`.
#[derive(Debug, Deserialize)]
struct LatestRelease {
    version: String,
}

/// Whether update checks should run at all.
pub fn notifier_enabled<F>(config: &UpdateConfig, lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    config.enabled && lookup(ENV_NO_UPDATE_NOTIFIER).is_none() && lookup(ENV_CI).is_none()
}

/// Whether the cached check is older than `interval_hours`.
pub fn check_due(state: &CliState, now_ms: i64, interval_hours: u64) -> bool {
    let interval_ms = i64::try_from(interval_hours.saturating_mul(3_600_000)).unwrap_or(i64::MAX);
    match &state.update_check {
        Some(check) => now_ms.saturating_sub(check.checked_at) >= interval_ms,
        None => true,
    }
}

/// Fetches and caches the latest released version.
#[derive(Debug, Clone)]
pub struct UpdateNotifier {
    config: UpdateConfig,
    state: StateStore,
}

impl UpdateNotifier {
    pub fn new(config: UpdateConfig, state: StateStore) -> Self {
        Self { config, state }
    }

    /// Refresh the cached version if the last check is stale.
    ///
    /// Returns the fetched version, or `None` when no check was due.
    pub async fn refresh(&self) -> StratoResult<Option<String>> {
        let now = Utc::now().timestamp_millis();
        if !check_due(&self.state.load(), now, self.config.interval_hours) {
            debug!("update check not due");
            return Ok(None);
        }

        let http = reqwest::Client::builder().timeout(CHECK_TIMEOUT).build()?;
        let resp = http.get(&self.config.check_url).send().await?;
        if !resp.status().is_success() {
            return Err(StratoError::Api {
                status: resp.status().as_u16(),
                message: format!("update check at {} failed", self.config.check_url),
            });
        }
        let release: LatestRelease = resp.json().await?;
        debug!(latest = %release.version, "update check complete");

        let latest = release.version.clone();
        self.state.update(|state| {
            state.update_check = Some(UpdateCheck {
                checked_at: now,
                latest_version: release.version,
            });
        })?;
        Ok(Some(latest))
    }
}

/// The cached version, if it is newer than `current`.
pub fn newer_version<'a>(current: &str, cached: Option<&'a UpdateCheck>) -> Option<&'a str> {
    cached
        .map(|c| c.latest_version.as_str())
        .filter(|latest| compare_versions(latest, current) == Ordering::Greater)
}

/// The message shown when an update is available.
pub fn notification(current: &str, latest: &str) -> String {
    format!(
        "Update available {} → {}\nDownload it from {}",
        current.dimmed(),
        latest.green().bold(),
        "https://strato.dev/cli".cyan()
    )
}

/// Compare dotted versions numerically. A pre-release (`1.2.0-beta.1`)
/// sorts before the release it precedes.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_core, a_pre) = split_version(a);
    let (b_core, b_pre) = split_version(b);

    let len = a_core.len().max(b_core.len());
    for i in 0..len {
        let x = a_core.get(i).copied().unwrap_or(0);
        let y = b_core.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    match (a_pre, b_pre) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(y),
    }
}

fn split_version(version: &str) -> (Vec<u64>, Option<&str>) {
    let version = version.trim().trim_start_matches('v');
    let (core, pre) = match version.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (version, None),
    };
    let parts = core
        .split('.')
        .map(|p| p.parse::<u64>().unwrap_or(0))
        .collect();
    (parts, pre)
}
