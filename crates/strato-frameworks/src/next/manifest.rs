//! Serde models of the JSON manifests a Next.js build writes into its
//! dist directory.
//!
//! Only the fields the adapter reads are modelled; everything else is
//! ignored on deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// `routes-manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesManifest {
    #[serde(default)]
    pub version: u32,

    /// `basePath` from `next.config.js`, empty when unset.
    #[serde(default)]
    pub base_path: String,

    #[serde(default)]
    pub redirects: Vec<Redirect>,

    #[serde(default)]
    pub headers: Vec<Header>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrites: Option<Rewrites>,

    #[serde(default)]
    pub dynamic_routes: Vec<DynamicRoute>,

    #[serde(default)]
    pub static_routes: Vec<DynamicRoute>,
}

/// A conditional-match clause (`has` / `missing`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteHas {
    /// `header`, `cookie`, `query` or `host`.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Any value for the key, `null` included, marks the clause as present.
/// Only a missing key yields `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Vec<RouteHas>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<RouteHas>>::deserialize(deserializer).map(|has| Some(has.unwrap_or_default()))
}

/// A rewrite rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rewrite {
    pub source: String,
    pub destination: String,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub has: Option<Vec<RouteHas>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<RouteHas>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<bool>,

    /// Compiled source pattern, as emitted by the build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl Rewrite {
    /// A plain rewrite with no conditions.
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            has: None,
            missing: None,
            base_path: None,
            locale: None,
            regex: None,
        }
    }
}

/// The `rewrites` entry: either a flat list or the phased object form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rewrites {
    List(Vec<Rewrite>),
    Phased(PhasedRewrites),
}

/// Rewrites split by when Next.js applies them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasedRewrites {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_files: Option<Vec<Rewrite>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_files: Option<Vec<Rewrite>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Vec<Rewrite>>,
}

/// A redirect rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub source: String,
    pub destination: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent: Option<bool>,

    /// Set on redirects Next.js generates itself (trailing slash handling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub has: Option<Vec<RouteHas>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<RouteHas>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// A custom header rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub source: String,

    #[serde(default)]
    pub headers: Vec<HeaderEntry>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub has: Option<Vec<RouteHas>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<RouteHas>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// One header name/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

/// A dynamic (or static) route entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRoute {
    pub page: String,

    #[serde(default)]
    pub regex: String,
}

/// `images-manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagesManifest {
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub images: ImagesConfig,
}

/// The `images` section of `next.config.js` as recorded in the build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// `images.unoptimized`: serve originals, no optimizer needed.
    #[serde(default)]
    pub unoptimized: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<String>,
}

/// `export-marker.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMarker {
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub has_export_path_map: bool,

    #[serde(default)]
    pub export_trailing_slash: bool,

    /// Whether any page imports `next/image`.
    #[serde(default)]
    pub is_next_image_imported: bool,
}

/// `server/middleware-manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareManifest {
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub sorted_middleware: Vec<String>,

    #[serde(default)]
    pub middleware: BTreeMap<String, MiddlewareInfo>,

    #[serde(default)]
    pub functions: BTreeMap<String, serde_json::Value>,
}

/// A single middleware entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub page: String,

    #[serde(default)]
    pub files: Vec<String>,

    /// Version 1 manifests carry one pattern per entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regexp: Option<String>,

    /// Version 2+ manifests carry a list of matchers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matchers: Option<Vec<MiddlewareMatcher>>,
}

/// A middleware matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareMatcher {
    pub regexp: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_source: Option<String>,
}

/// `prerender-manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderManifest {
    #[serde(default)]
    pub version: u32,

    /// Prerendered paths keyed by route.
    #[serde(default)]
    pub routes: BTreeMap<String, serde_json::Value>,

    /// Dynamic routes with `getStaticPaths`, keyed by route pattern.
    #[serde(default)]
    pub dynamic_routes: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    pub not_found_routes: Vec<String>,
}

impl PrerenderManifest {
    /// Keys of `routes`.
    pub fn prerendered_routes(&self) -> Vec<String> {
        self.routes.keys().cloned().collect()
    }

    /// Keys of `dynamicRoutes`.
    pub fn dynamic_route_keys(&self) -> Vec<String> {
        self.dynamic_routes.keys().cloned().collect()
    }
}

/// `server/pages-manifest.json`: route → compiled file.
pub type PagesManifest = BTreeMap<String, String>;

/// `server/app-paths-manifest.json`: app path → compiled file.
pub type AppPathsManifest = BTreeMap<String, String>;

/// `app-path-routes-manifest.json`: app path → public route.
pub type AppPathRoutesManifest = BTreeMap<String, String>;

/// The `.meta` file written next to a prerendered app route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_array_form() {
        let manifest: RoutesManifest = serde_json::from_str(
            r#"{"version": 3, "rewrites": [{"source": "/a", "destination": "/b", "regex": "^/a$"}]}"#,
        )
        .unwrap();
        match manifest.rewrites {
            Some(Rewrites::List(list)) => assert_eq!(list[0].destination, "/b"),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_rewrites_phased_form() {
        let manifest: RoutesManifest = serde_json::from_str(
            r#"{
                "basePath": "/docs",
                "rewrites": {
                    "beforeFiles": [{"source": "/x", "destination": "/y"}],
                    "afterFiles": [],
                    "fallback": []
                }
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.base_path, "/docs");
        match manifest.rewrites {
            Some(Rewrites::Phased(phased)) => {
                assert_eq!(phased.before_files.unwrap().len(), 1);
                assert_eq!(phased.after_files.unwrap().len(), 0);
            }
            other => panic!("expected phased, got {other:?}"),
        }
    }

    #[test]
    fn test_null_has_clause_counts_as_present() {
        let rewrite: Rewrite =
            serde_json::from_str(r#"{"source": "/a", "destination": "/b", "has": null}"#).unwrap();
        assert_eq!(rewrite.has, Some(vec![]));

        let redirect: Redirect =
            serde_json::from_str(r#"{"source": "/a", "destination": "/b", "has": null}"#).unwrap();
        assert!(redirect.has.is_some());

        let header: Header = serde_json::from_str(r#"{"source": "/a", "has": null}"#).unwrap();
        assert!(header.has.is_some());

        let rewrite: Rewrite =
            serde_json::from_str(r#"{"source": "/a", "destination": "/b"}"#).unwrap();
        assert_eq!(rewrite.has, None);
    }

    #[test]
    fn test_has_clause_parsed() {
        let rewrite: Rewrite = serde_json::from_str(
            r#"{"source": "/a", "destination": "/b", "has": [{"type": "header", "key": "x-beta"}]}"#,
        )
        .unwrap();
        let has = rewrite.has.unwrap();
        assert_eq!(has[0].kind, "header");
        assert_eq!(has[0].key.as_deref(), Some("x-beta"));
    }

    #[test]
    fn test_middleware_v2_matchers() {
        let manifest: MiddlewareManifest = serde_json::from_str(
            r#"{
                "version": 2,
                "sortedMiddleware": ["/"],
                "middleware": {
                    "/": {"name": "middleware", "page": "/", "files": [],
                          "matchers": [{"regexp": "^/about$", "originalSource": "/about"}]}
                }
            }"#,
        )
        .unwrap();
        let info = &manifest.middleware["/"];
        assert!(info.regexp.is_none());
        assert_eq!(info.matchers.as_ref().unwrap()[0].regexp, "^/about$");
    }
}
