//! Persistent CLI state kept between invocations (`state.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StratoResult;

/// Values remembered across CLI runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliState {
    /// Unix time (ms) of the last run that exited with an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<i64>,

    /// Result of the most recent update check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_check: Option<UpdateCheck>,
}

/// Cached result of a release check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheck {
    /// Unix time (ms) the check ran.
    pub checked_at: i64,
    /// Latest published version at that time.
    pub latest_version: String,
}

/// File-backed store for [`CliState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: Option<PathBuf>,
}

impl StateStore {
    /// A store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store that keeps nothing; used when there is no config directory.
    pub fn ephemeral() -> Self {
        Self { path: None }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the state. Missing or unreadable state is treated as empty.
    pub fn load(&self) -> CliState {
        let Some(path) = &self.path else {
            return CliState::default();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                debug!(path = %path.display(), error = %e, "discarding corrupt state file");
                CliState::default()
            }),
            Err(_) => CliState::default(),
        }
    }

    /// Persist the state.
    pub fn save(&self, state: &CliState) -> StratoResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(state)?)?;
        Ok(())
    }

    /// Load, modify and save in one step.
    pub fn update<F>(&self, f: F) -> StratoResult<CliState>
    where
        F: FnOnce(&mut CliState),
    {
        let mut state = self.load();
        f(&mut state);
        self.save(&state)?;
        Ok(state)
    }
}
