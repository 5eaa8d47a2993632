//! Translation of Next.js routing rules into hosting rules.

use tracing::debug;

use crate::hosting::{BackendReason, HostingHeader, HostingRedirect, HostingRewrite, HostingRoutes};
use crate::next::manifest::{Redirect, Rewrites, RoutesManifest};
use crate::next::utils::{
    clean_escaped_chars, get_nextjs_rewrites_to_use, is_header_supported_by_hosting,
    is_redirect_supported_by_hosting, is_rewrite_supported_by_hosting,
};

/// Map the headers, redirects and rewrites of a routes manifest onto
/// hosting rules.
///
/// Rules hosting cannot express are dropped and recorded as backend
/// reasons. Redirects Next.js generates internally are dropped silently.
pub fn translate_routes(manifest: &RoutesManifest) -> HostingRoutes {
    let mut routes = HostingRoutes::default();

    for header in &manifest.headers {
        if is_header_supported_by_hosting(header) {
            routes.headers.push(HostingHeader {
                source: clean_escaped_chars(&header.source),
                headers: header.headers.clone(),
            });
        } else {
            debug!(source = %header.source, "header rule needs a backend");
            routes.backend_reasons.insert(BackendReason::AdvancedHeaders);
        }
    }

    for redirect in manifest.redirects.iter().filter(|r| r.internal.is_none()) {
        if is_redirect_supported_by_hosting(redirect) {
            routes.redirects.push(HostingRedirect {
                source: clean_escaped_chars(&redirect.source),
                destination: redirect.destination.clone(),
                status: redirect_status(redirect),
            });
        } else {
            debug!(source = %redirect.source, "redirect needs a backend");
            routes.backend_reasons.insert(BackendReason::AdvancedRedirects);
        }
    }

    for rewrite in get_nextjs_rewrites_to_use(manifest.rewrites.as_ref()) {
        if is_rewrite_supported_by_hosting(rewrite) {
            routes.rewrites.push(HostingRewrite {
                source: clean_escaped_chars(&rewrite.source),
                destination: rewrite.destination.clone(),
            });
        } else {
            debug!(source = %rewrite.source, "rewrite needs a backend");
            routes.backend_reasons.insert(BackendReason::AdvancedRewrites);
        }
    }

    if has_late_rewrites(manifest.rewrites.as_ref()) {
        debug!("afterFiles/fallback rewrites need a backend");
        routes.backend_reasons.insert(BackendReason::AdvancedRewrites);
    }

    routes
}

/// Status code for a redirect: explicit `statusCode`, else 308 for
/// permanent and 307 for temporary redirects.
pub fn redirect_status(redirect: &Redirect) -> u16 {
    match (redirect.status_code, redirect.permanent) {
        (Some(code), _) => code,
        (None, Some(true)) => 308,
        _ => 307,
    }
}

/// `afterFiles` and `fallback` rewrites run after the filesystem check,
/// which hosting rewrites cannot model.
fn has_late_rewrites(rewrites: Option<&Rewrites>) -> bool {
    match rewrites {
        Some(Rewrites::Phased(phased)) => {
            phased.after_files.as_ref().is_some_and(|r| !r.is_empty())
                || phased.fallback.as_ref().is_some_and(|r| !r.is_empty())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::next::manifest::{Header, HeaderEntry, PhasedRewrites, Rewrite};
    use pretty_assertions::assert_eq;

    fn redirect(source: &str, status_code: Option<u16>, permanent: Option<bool>) -> Redirect {
        Redirect {
            source: source.into(),
            destination: "/new".into(),
            status_code,
            permanent,
            internal: None,
            has: None,
            missing: None,
            regex: None,
        }
    }

    #[test]
    fn test_redirect_status() {
        assert_eq!(redirect_status(&redirect("/a", Some(301), Some(true))), 301);
        assert_eq!(redirect_status(&redirect("/a", None, Some(true))), 308);
        assert_eq!(redirect_status(&redirect("/a", None, Some(false))), 307);
        assert_eq!(redirect_status(&redirect("/a", None, None)), 307);
    }

    #[test]
    fn test_translate_mixed_manifest() {
        let manifest = RoutesManifest {
            headers: vec![
                Header {
                    source: r"/assets/\:file".into(),
                    headers: vec![HeaderEntry {
                        key: "cache-control".into(),
                        value: "public, max-age=31536000".into(),
                    }],
                    has: None,
                    missing: None,
                    regex: None,
                },
                Header {
                    source: "/(.*)".into(),
                    headers: vec![],
                    has: None,
                    missing: None,
                    regex: None,
                },
            ],
            redirects: vec![
                Redirect {
                    internal: Some(true),
                    ..redirect("/:path+/", Some(308), None)
                },
                redirect("/old", None, Some(true)),
            ],
            rewrites: Some(Rewrites::Phased(PhasedRewrites {
                before_files: Some(vec![
                    Rewrite::new("/docs", "/documentation"),
                    Rewrite::new("/proxy", "https://api.example.com"),
                ]),
                after_files: Some(vec![]),
                fallback: None,
            })),
            ..RoutesManifest::default()
        };

        let routes = translate_routes(&manifest);

        assert_eq!(
            routes.headers,
            vec![HostingHeader {
                source: "/assets/:file".into(),
                headers: vec![HeaderEntry {
                    key: "cache-control".into(),
                    value: "public, max-age=31536000".into(),
                }],
            }]
        );
        assert_eq!(
            routes.redirects,
            vec![HostingRedirect {
                source: "/old".into(),
                destination: "/new".into(),
                status: 308,
            }]
        );
        assert_eq!(
            routes.rewrites,
            vec![HostingRewrite {
                source: "/docs".into(),
                destination: "/documentation".into(),
            }]
        );
        assert_eq!(
            routes.backend_reasons.into_iter().collect::<Vec<_>>(),
            vec![BackendReason::AdvancedRewrites, BackendReason::AdvancedHeaders]
        );
    }

    #[test]
    fn test_fallback_rewrites_need_backend() {
        let manifest = RoutesManifest {
            rewrites: Some(Rewrites::Phased(PhasedRewrites {
                fallback: Some(vec![Rewrite::new("/:path*", "/legacy/:path*")]),
                ..PhasedRewrites::default()
            })),
            ..RoutesManifest::default()
        };
        let routes = translate_routes(&manifest);
        assert!(routes.rewrites.is_empty());
        assert!(!routes.fully_supported());
    }

    #[test]
    fn test_empty_manifest_is_fully_supported() {
        let routes = translate_routes(&RoutesManifest::default());
        assert!(routes.fully_supported());
        assert!(routes.headers.is_empty());
    }
}
