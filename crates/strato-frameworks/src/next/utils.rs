//! Predicates and helpers over parsed Next.js manifests.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::error::FrameworkResult;
use crate::hosting::HostingHeader;
use crate::next::manifest::{
    AppPathRoutesManifest, AppPathsManifest, ExportMarker, Header, HeaderEntry, ImagesManifest,
    MiddlewareManifest, PagesManifest, Redirect, Rewrite, Rewrites, RouteMeta, RoutesManifest,
};
use crate::next::{
    read_manifest, read_optional_manifest, APP_PATH_ROUTES_MANIFEST, MIDDLEWARE_MANIFEST,
    ROUTES_MANIFEST,
};

/// Characters Next.js escapes in route sources.
const ESCAPABLE: [char; 8] = ['(', ')', '{', '}', ':', '+', '?', '*'];

/// Pages every Next.js build has that never need a backend route.
const BUILTIN_PAGES: [&str; 3] = ["/_app", "/_error", "/_document"];

/// Remove one backslash in front of each of `( ) { } : + ? *`.
///
/// Sources in the routes manifest keep the escaping Next.js needs for its
/// own path-to-regexp parsing; hosting matches them literally.
pub fn clean_escaped_chars(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if ESCAPABLE.contains(&next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Whether a source contains a regex group: a `(` not preceded by `\`.
pub fn path_has_regex(path: &str) -> bool {
    let mut prev = None;
    for c in path.chars() {
        if c == '(' && prev != Some('\\') {
            return true;
        }
        prev = Some(c);
    }
    false
}

/// Whether `s` is an absolute http(s) URL.
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// A rewrite hosting can serve: no `has` clause, no regex in the source
/// and no external destination.
pub fn is_rewrite_supported_by_hosting(rewrite: &Rewrite) -> bool {
    !(rewrite.has.is_some() || path_has_regex(&rewrite.source) || is_url(&rewrite.destination))
}

/// A redirect hosting can serve: no `has` clause, no regex in the source
/// and not generated internally by Next.js.
pub fn is_redirect_supported_by_hosting(redirect: &Redirect) -> bool {
    !(redirect.has.is_some() || path_has_regex(&redirect.source) || redirect.internal.is_some())
}

/// A header rule hosting can serve: no `has` clause and no regex in the source.
pub fn is_header_supported_by_hosting(header: &Header) -> bool {
    !(header.has.is_some() || path_has_regex(&header.source))
}

/// The rewrites that apply before the filesystem is checked.
///
/// A flat list is returned as is; the phased form yields `beforeFiles`;
/// anything else yields nothing.
pub fn get_nextjs_rewrites_to_use(rewrites: Option<&Rewrites>) -> &[Rewrite] {
    match rewrites {
        Some(Rewrites::List(list)) => list,
        Some(Rewrites::Phased(phased)) => phased.before_files.as_deref().unwrap_or(&[]),
        None => &[],
    }
}

/// Whether any page imports `next/image`.
pub fn uses_next_image(export_marker: &ExportMarker) -> bool {
    export_marker.is_next_image_imported
}

/// Whether `images.unoptimized` is set.
pub fn has_unoptimized_image(images: &ImagesManifest) -> bool {
    images.images.unoptimized
}

/// Whether the app uses middleware.
///
/// In dev mode `dir` is the project root and a `middleware.js` or
/// `middleware.ts` file decides; otherwise `dir` is the dist directory and
/// the middleware manifest must list at least one entry.
pub fn is_using_middleware(dir: &Path, dev_mode: bool) -> FrameworkResult<bool> {
    if dev_mode {
        return Ok(dir.join("middleware.js").exists() || dir.join("middleware.ts").exists());
    }
    let manifest: Option<MiddlewareManifest> =
        read_optional_manifest(&dir.join("server").join(MIDDLEWARE_MANIFEST))?;
    Ok(manifest.is_some_and(|m| !m.middleware.is_empty()))
}

/// Whether the build used the `app/` directory router.
pub fn is_using_app_directory(dist_dir: &Path) -> bool {
    dist_dir.join(APP_PATH_ROUTES_MANIFEST).exists()
}

/// Regex sources of every middleware matcher.
///
/// Version 1 manifests have one `regexp` per entry, later versions a list
/// of `matchers`.
pub fn get_middleware_matchers(manifest: &MiddlewareManifest) -> Vec<String> {
    manifest
        .middleware
        .values()
        .flat_map(|info| {
            if manifest.version == 1 {
                info.regexp.clone().into_iter().collect::<Vec<_>>()
            } else {
                info.matchers
                    .iter()
                    .flatten()
                    .map(|m| m.regexp.clone())
                    .collect()
            }
        })
        .collect()
}

fn is_js(file: &str) -> bool {
    Path::new(file).extension().is_some_and(|ext| ext == "js")
}

/// Pages-router routes that render on request.
pub fn get_non_static_routes(
    pages: &PagesManifest,
    prerendered_routes: &[String],
    dynamic_routes: &[String],
) -> Vec<String> {
    pages
        .iter()
        .filter(|(route, file)| {
            is_js(file)
                && !BUILTIN_PAGES.contains(&route.as_str())
                && !prerendered_routes.contains(*route)
                && !dynamic_routes.contains(*route)
        })
        .map(|(route, _)| route.clone())
        .collect()
}

/// App-router server components that render on request.
pub fn get_non_static_server_components(
    app_paths: &AppPathsManifest,
    app_path_routes: &AppPathRoutesManifest,
    prerendered_routes: &[String],
    dynamic_routes: &[String],
) -> BTreeSet<String> {
    app_paths
        .iter()
        .filter(|(app_path, file)| {
            if !is_js(file) {
                return false;
            }
            match app_path_routes.get(*app_path) {
                Some(route) => {
                    !(prerendered_routes.contains(route) || dynamic_routes.contains(route))
                }
                None => true,
            }
        })
        .map(|(app_path, _)| app_path.clone())
        .collect()
}

/// Header rules from the `.meta` files written for prerendered app routes.
pub fn get_headers_from_meta_files(
    dist_dir: &Path,
    base_path: &str,
    app_path_routes: &AppPathRoutesManifest,
) -> FrameworkResult<Vec<HostingHeader>> {
    let mut headers = Vec::new();
    let routes: BTreeSet<&String> = app_path_routes.values().collect();

    for route in routes {
        let name = if route == "/" { "index" } else { route.trim_start_matches('/') };
        let meta_path = dist_dir.join("server").join("app").join(format!("{name}.meta"));
        let Some(meta) = read_optional_manifest::<RouteMeta>(&meta_path)? else {
            continue;
        };
        if let Some(meta_headers) = meta.headers.filter(|h| !h.is_empty()) {
            debug!(route = %route, count = meta_headers.len(), "headers from meta file");
            headers.push(HostingHeader {
                source: join_base_path(base_path, route),
                headers: meta_headers
                    .into_iter()
                    .map(|(key, value)| HeaderEntry { key, value })
                    .collect(),
            });
        }
    }
    Ok(headers)
}

/// Join a route onto `basePath` the way posix path joining does.
pub fn join_base_path(base_path: &str, route: &str) -> String {
    let joined = format!(
        "/{}/{}",
        base_path.trim_matches('/'),
        route.trim_start_matches('/')
    );
    let mut out = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    if out.len() > 1 && out.ends_with('/') && !route.ends_with('/') {
        out.pop();
    }
    out
}

/// Load and parse the routes manifest from a dist directory.
pub fn load_routes_manifest(dist_dir: &Path) -> FrameworkResult<RoutesManifest> {
    read_manifest(&dist_dir.join(ROUTES_MANIFEST))
}
