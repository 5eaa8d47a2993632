//! Project resolution — which project a command operates on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StratoConfig;
use crate::error::{StratoError, StratoResult};

/// Name of the per-directory project alias file.
pub const RC_FILE: &str = ".stratorc";

/// Contents of a `.stratorc` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRc {
    /// Project aliases; `default` is the one commands use.
    #[serde(default)]
    pub projects: BTreeMap<String, String>,
}

impl ProjectRc {
    /// Find the nearest `.stratorc` walking up from `start`.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(RC_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Parse a `.stratorc` file.
    pub fn load(path: &Path) -> StratoResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| StratoError::Config(format!("{}: {e}", path.display())))
    }

    /// The default project, if set.
    pub fn default_project(&self) -> Option<&str> {
        self.projects.get("default").map(String::as_str)
    }

    /// Resolve an alias to a project ID. Unknown aliases are treated as IDs.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.projects.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Resolve the active project.
///
/// Order: explicit flag, `STRATO_PROJECT`, nearest `.stratorc`, then the
/// config file's `default_project`. A flag value that names an alias in the
/// nearest `.stratorc` is expanded to the aliased ID.
pub fn resolve_project(
    flag: Option<&str>,
    config: &StratoConfig,
    cwd: &Path,
) -> StratoResult<Option<String>> {
    let rc = match ProjectRc::discover(cwd) {
        Some(path) => {
            debug!(path = %path.display(), "using project rc file");
            Some(ProjectRc::load(&path)?)
        }
        None => None,
    };

    if let Some(flag) = flag.filter(|f| !f.is_empty()) {
        let id = rc.as_ref().map(|rc| rc.resolve_alias(flag)).unwrap_or(flag);
        return Ok(Some(id.to_string()));
    }
    if let Some(env) = &config.env_project {
        return Ok(Some(env.clone()));
    }
    if let Some(id) = rc.as_ref().and_then(ProjectRc::default_project) {
        return Ok(Some(id.to_string()));
    }
    Ok(config.default_project.clone())
}
