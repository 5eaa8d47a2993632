//! Framework adapter errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a framework build.
#[derive(Debug, Error)]
pub enum FrameworkError {
    /// A manifest the adapter cannot work without is absent.
    #[error("missing manifest {}; run the framework build first", .0.display())]
    MissingManifest(PathBuf),

    /// A manifest could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest is not valid JSON of the expected shape.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Framework adapter Result type alias.
pub type FrameworkResult<T> = Result<T, FrameworkError>;
