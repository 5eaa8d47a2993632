//! Strato Hosting routing rules — the declarative config framework
//! adapters produce.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::next::manifest::HeaderEntry;

/// A hosting rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingRewrite {
    pub source: String,
    pub destination: String,
}

/// A hosting redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingRedirect {
    pub source: String,
    pub destination: String,
    /// HTTP status code of the redirect.
    #[serde(rename = "type")]
    pub status: u16,
}

/// A hosting header rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingHeader {
    pub source: String,
    pub headers: Vec<HeaderEntry>,
}

/// Why a site cannot be served from static hosting alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendReason {
    AdvancedRewrites,
    AdvancedRedirects,
    AdvancedHeaders,
    Middleware,
    ImageOptimization,
    NonStaticRoutes,
    NonStaticComponents,
}

impl std::fmt::Display for BackendReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            BackendReason::AdvancedRewrites => "advanced rewrites",
            BackendReason::AdvancedRedirects => "advanced redirects",
            BackendReason::AdvancedHeaders => "advanced headers",
            BackendReason::Middleware => "middleware",
            BackendReason::ImageOptimization => "image optimization",
            BackendReason::NonStaticRoutes => "non-static routes",
            BackendReason::NonStaticComponents => "non-static components",
        };
        f.write_str(reason)
    }
}

/// Routing rules hosting can serve directly, plus the reasons some rules
/// had to be left to a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostingRoutes {
    pub headers: Vec<HostingHeader>,
    pub redirects: Vec<HostingRedirect>,
    pub rewrites: Vec<HostingRewrite>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub backend_reasons: BTreeSet<BackendReason>,
}

impl HostingRoutes {
    /// Whether every rule could be expressed in hosting config.
    pub fn fully_supported(&self) -> bool {
        self.backend_reasons.is_empty()
    }
}
