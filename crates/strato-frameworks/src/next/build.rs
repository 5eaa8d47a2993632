//! Inspection of a finished Next.js build.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::FrameworkResult;
use crate::hosting::{BackendReason, HostingRoutes};
use crate::next::manifest::{
    AppPathRoutesManifest, AppPathsManifest, ExportMarker, ImagesManifest, MiddlewareManifest,
    PagesManifest, PrerenderManifest,
};
use crate::next::translate::translate_routes;
use crate::next::utils::{
    get_headers_from_meta_files, get_middleware_matchers, get_non_static_routes,
    get_non_static_server_components, has_unoptimized_image, is_using_app_directory,
    load_routes_manifest, uses_next_image,
};
use crate::next::{
    read_optional_manifest, APP_PATHS_MANIFEST, APP_PATH_ROUTES_MANIFEST, EXPORT_MARKER,
    IMAGES_MANIFEST, MIDDLEWARE_MANIFEST, PAGES_MANIFEST, PRERENDER_MANIFEST,
};

/// Everything the hosting adapter needs to know about a Next.js build.
#[derive(Debug, Clone, Serialize)]
pub struct NextBuildReport {
    /// The dist directory that was inspected.
    pub dist_dir: PathBuf,
    /// `basePath` of the app.
    pub base_path: String,
    /// Hosting rules, including headers from app route `.meta` files.
    pub routes: HostingRoutes,
    pub uses_app_directory: bool,
    pub uses_middleware: bool,
    /// Regex sources the middleware runs on.
    pub middleware_matchers: Vec<String>,
    /// `next/image` is used and images are not `unoptimized`.
    pub uses_image_optimization: bool,
    pub non_static_routes: Vec<String>,
    pub non_static_components: BTreeSet<String>,
}

impl NextBuildReport {
    /// Whether the site needs a backend in addition to static hosting.
    pub fn needs_backend(&self) -> bool {
        !self.routes.backend_reasons.is_empty()
    }
}

/// Load the manifests of the build in `project_dir/dist_dir` and work out
/// the hosting rules and backend requirements.
///
/// Only the routes manifest is mandatory; the others default to "feature
/// not used" when absent.
pub fn inspect_build(project_dir: &Path, dist_dir: &str) -> FrameworkResult<NextBuildReport> {
    let dist = project_dir.join(dist_dir);
    info!(dist = %dist.display(), "inspecting Next.js build");

    let manifest = load_routes_manifest(&dist)?;
    let mut routes = translate_routes(&manifest);

    let export_marker: ExportMarker =
        read_optional_manifest(&dist.join(EXPORT_MARKER))?.unwrap_or_default();
    let images: ImagesManifest =
        read_optional_manifest(&dist.join(IMAGES_MANIFEST))?.unwrap_or_default();
    let middleware: MiddlewareManifest =
        read_optional_manifest(&dist.join("server").join(MIDDLEWARE_MANIFEST))?
            .unwrap_or_default();
    let prerender: PrerenderManifest =
        read_optional_manifest(&dist.join(PRERENDER_MANIFEST))?.unwrap_or_default();
    let pages: PagesManifest =
        read_optional_manifest(&dist.join("server").join(PAGES_MANIFEST))?.unwrap_or_default();

    let prerendered_routes = prerender.prerendered_routes();
    let dynamic_routes = prerender.dynamic_route_keys();

    let uses_app_directory = is_using_app_directory(&dist);
    let mut non_static_components = BTreeSet::new();
    if uses_app_directory {
        let app_path_routes: AppPathRoutesManifest =
            read_optional_manifest(&dist.join(APP_PATH_ROUTES_MANIFEST))?.unwrap_or_default();
        let app_paths: AppPathsManifest =
            read_optional_manifest(&dist.join("server").join(APP_PATHS_MANIFEST))?
                .unwrap_or_default();

        non_static_components = get_non_static_server_components(
            &app_paths,
            &app_path_routes,
            &prerendered_routes,
            &dynamic_routes,
        );
        routes.headers.extend(get_headers_from_meta_files(
            &dist,
            &manifest.base_path,
            &app_path_routes,
        )?);
    }

    let uses_middleware = !middleware.middleware.is_empty();
    let middleware_matchers = get_middleware_matchers(&middleware);
    let uses_image_optimization = uses_next_image(&export_marker) && !has_unoptimized_image(&images);
    let non_static_routes = get_non_static_routes(&pages, &prerendered_routes, &dynamic_routes);

    if uses_middleware {
        routes.backend_reasons.insert(BackendReason::Middleware);
    }
    if uses_image_optimization {
        routes.backend_reasons.insert(BackendReason::ImageOptimization);
    }
    if !non_static_routes.is_empty() {
        routes.backend_reasons.insert(BackendReason::NonStaticRoutes);
    }
    if !non_static_components.is_empty() {
        routes.backend_reasons.insert(BackendReason::NonStaticComponents);
    }

    debug!(reasons = ?routes.backend_reasons, "backend requirements");

    Ok(NextBuildReport {
        dist_dir: dist,
        base_path: manifest.base_path,
        routes,
        uses_app_directory,
        uses_middleware,
        middleware_matchers,
        uses_image_optimization,
        non_static_routes,
        non_static_components,
    })
}
