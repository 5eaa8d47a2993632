//! # strato-frameworks
//!
//! Framework adapters for Strato Hosting.
//!
//! A framework build leaves JSON manifests describing its routes; the
//! adapters here read them and produce the declarative routing rules
//! Strato Hosting serves, along with the reasons (if any) the site also
//! needs a backend.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use strato_frameworks::next;
//!
//! let report = next::inspect_build(Path::new("."), next::DEFAULT_DIST_DIR)?;
//! for rewrite in &report.routes.rewrites {
//!     println!("{} -> {}", rewrite.source, rewrite.destination);
//! }
//! # Ok::<(), strato_frameworks::FrameworkError>(())
//! ```

pub mod error;
pub mod hosting;
pub mod next;

pub use error::{FrameworkError, FrameworkResult};
pub use hosting::{BackendReason, HostingHeader, HostingRedirect, HostingRewrite, HostingRoutes};
