//! # strato-core
//!
//! Core SDK library for Strato — the cloud platform behind the `strato` CLI.
//!
//! This crate provides the building blocks for:
//! - Loading configuration and resolving the active project
//! - Talking to the Strato management API
//! - The CLI's debug log (file selection and `[level] message` format)
//! - State remembered between CLI runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strato_core::{ManagementApi, StratoClient, StratoConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = StratoConfig::load()?;
//!     config.apply_env();
//!
//!     let client = StratoClient::from_config(&config)?;
//!     let project = client.get_project("demo-app").await?;
//!     println!("{} is {}", project.project_id, project.state);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod project;
pub mod resources;
pub mod state;

// Re-exports
pub use client::{ManagementApi, StratoClient};
pub use config::{StratoConfig, UpdateConfig};
pub use error::{StratoError, StratoResult};
pub use logging::{init_logging, select_log_file, LoggingOptions};
pub use project::{resolve_project, ProjectRc};
pub use resources::{Project, ProjectState, UserPage, UserRecord};
pub use state::{CliState, StateStore, UpdateCheck};
