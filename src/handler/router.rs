//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: matches the request path
//! against the mount table, hands the request to the mount's resolver and
//! writes the access log entry.

use crate::config::AppState;
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use crate::resolver::AssetRequest;
use hyper::body::Body;
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// Generic over the request body, which is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    peer: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let path = req.uri().path();

    let (response, mount) = match state.mounts.match_path(path) {
        Some((resolver, route)) => {
            let request = AssetRequest::new(req.method().clone(), path, route);
            let response = resolver.serve(&request).await;
            (response, Some(resolver.mount().prefix().to_string()))
        }
        None => (http::build_not_found_response(), None),
    };

    if state.access_log_enabled() {
        let mut entry = access_entry(&req, peer, &response);
        entry.mount = mount;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Collect request and response details for the access log
fn access_entry<B>(
    req: &Request<B>,
    peer: SocketAddr,
    response: &Response<ResponseBody>,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    // Streamed bodies have no exact size up front
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mount::MountConfig;
    use crate::resolver::StaticAssetResolver;
    use crate::routing::MountTable;
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_TYPE, LOCATION};
    use hyper::{Method, StatusCode};

    fn state(dir: &std::path::Path) -> Arc<AppState> {
        std::fs::create_dir_all(dir.join("site/docs")).unwrap();
        std::fs::write(dir.join("site/app.js"), "console.log(1);\n").unwrap();
        std::fs::write(dir.join("site/docs/index.html"), "<h1>docs</h1>\n").unwrap();
        std::fs::write(dir.join("site/my file.txt"), "spaced\n").unwrap();

        let mut mounts = MountTable::new();
        mounts.register(StaticAssetResolver::new(
            MountConfig::new("/static", dir.join("site")).unwrap(),
        ));

        let mut config = Config::default();
        config.logging.access_log = false;
        Arc::new(AppState::new(config, mounts))
    }

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_to_mount() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let response = handle_request(request(Method::GET, "/static/app.js"), peer(), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/javascript"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"console.log(1);\n");
    }

    #[tokio::test]
    async fn test_percent_encoded_segment() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let response =
            handle_request(request(Method::GET, "/static/my%20file.txt"), peer(), state)
                .await
                .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_encoded_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let response = handle_request(
            request(Method::GET, "/static/%2e%2e/%2e%2e/etc/passwd"),
            peer(),
            state,
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unmatched_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let response = handle_request(request(Method::GET, "/elsewhere/app.js"), peer(), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_folder_redirect_location() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let response = handle_request(request(Method::HEAD, "/static/docs/"), peer(), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/static/docs/index.html"
        );
    }

    #[tokio::test]
    async fn test_access_log_enabled_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut mounts = MountTable::new();
        mounts.register(StaticAssetResolver::new(
            MountConfig::new("/", dir.path()).unwrap(),
        ));
        let mut config = Config::default();
        config.logging.access_log_format = "json".to_string();
        let state = Arc::new(AppState::new(config, mounts));

        let response = handle_request(request(Method::POST, "/x?y=1"), peer(), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .uri("/static/app.js?v=2")
            .header(USER_AGENT, "curl/8.0")
            .body(())
            .unwrap();
        let response = http::build_not_found_response();

        let entry = access_entry(&req, peer(), &response);
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/static/app.js");
        assert_eq!(entry.query.as_deref(), Some("v=2"));
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, "no such file".len());
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert!(entry.referer.is_none());
    }
}
