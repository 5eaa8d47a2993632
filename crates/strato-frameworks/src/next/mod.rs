//! Next.js adapter.

pub mod build;
pub mod manifest;
pub mod translate;
pub mod utils;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{FrameworkError, FrameworkResult};

/// Default dist directory of a Next.js build.
pub const DEFAULT_DIST_DIR: &str = ".next";

pub const ROUTES_MANIFEST: &str = "routes-manifest.json";
pub const IMAGES_MANIFEST: &str = "images-manifest.json";
pub const EXPORT_MARKER: &str = "export-marker.json";
pub const PRERENDER_MANIFEST: &str = "prerender-manifest.json";
pub const APP_PATH_ROUTES_MANIFEST: &str = "app-path-routes-manifest.json";
/// Under `server/`.
pub const MIDDLEWARE_MANIFEST: &str = "middleware-manifest.json";
/// Under `server/`.
pub const PAGES_MANIFEST: &str = "pages-manifest.json";
/// Under `server/`.
pub const APP_PATHS_MANIFEST: &str = "app-paths-manifest.json";

/// Read a manifest that must exist.
pub fn read_manifest<T: DeserializeOwned>(path: &Path) -> FrameworkResult<T> {
    read_optional_manifest(path)?.ok_or_else(|| FrameworkError::MissingManifest(path.to_path_buf()))
}

/// Read a manifest that may be absent.
pub fn read_optional_manifest<T: DeserializeOwned>(path: &Path) -> FrameworkResult<Option<T>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(FrameworkError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| FrameworkError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

pub use build::{inspect_build, NextBuildReport};
pub use translate::translate_routes;
pub use utils::{
    clean_escaped_chars, get_nextjs_rewrites_to_use, is_header_supported_by_hosting,
    is_redirect_supported_by_hosting, is_rewrite_supported_by_hosting,
};
