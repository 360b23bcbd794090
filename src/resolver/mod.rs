//! Static asset resolver
//!
//! One [`StaticAssetResolver`] per mount. For every request it runs:
//!
//! 1. method check (GET fetches, HEAD tests for existence)
//! 2. path resolution and sandbox check
//! 3. filter hook
//! 4. filesystem probe (open for GET, stat for HEAD)
//! 5. transform hook and response finalization
//!
//! Steps 2-4 form one [`Outcome`]; a miss is retried once with the mount's
//! fallback file, a directory ends in a redirect to its index file or a 403.

pub mod path;
pub mod probe;

use crate::error::ServeError;
use crate::hooks::TransformOutcome;
use crate::http::{self, BodyStream, ResponseBody};
use crate::logger;
use crate::mount::{MountConfig, INDEX_FILE};
use futures::{stream, StreamExt, TryStreamExt};
use hyper::{Method, Response};
use probe::{Opened, Stat};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

/// What the client asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    /// GET: deliver the file
    Fetch,
    /// HEAD: describe the file
    Test,
}

impl Intent {
    fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Fetch),
            Method::HEAD => Some(Self::Test),
            _ => None,
        }
    }
}

/// Request as routed to a mount
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub method: Method,
    /// Path of the request URL, passed on to hooks
    pub url_path: String,
    /// Decoded segments following the mount's prefix
    pub route: Vec<String>,
}

impl AssetRequest {
    pub fn new(method: Method, url_path: impl Into<String>, route: Vec<String>) -> Self {
        Self {
            method,
            url_path: url_path.into(),
            route,
        }
    }
}

/// Result of a single resolution attempt
enum Outcome {
    /// Response is ready (delivered file, metadata or hook-produced)
    Respond(Response<ResponseBody>),
    /// Nothing at the resolved path
    Miss,
    /// Resolved path is a folder
    Directory(PathBuf),
    Failed(ServeError),
}

/// Serves the files of one mount
#[derive(Debug, Clone)]
pub struct StaticAssetResolver {
    mount: Arc<MountConfig>,
}

impl StaticAssetResolver {
    pub fn new(mount: impl Into<Arc<MountConfig>>) -> Self {
        Self {
            mount: mount.into(),
        }
    }

    pub fn mount(&self) -> &MountConfig {
        &self.mount
    }

    /// Answer a request routed to this mount
    pub async fn serve(&self, request: &AssetRequest) -> Response<ResponseBody> {
        let Some(intent) = Intent::from_method(&request.method) else {
            let err = ServeError::MethodNotAllowed(request.method.clone());
            return self.fail(&request.url_path, err);
        };

        let mut outcome = self.attempt(intent, request, &request.route, true).await;

        if matches!(outcome, Outcome::Miss) {
            if let Some(fallback) = self.mount.fallback() {
                outcome = self
                    .attempt(intent, request, std::slice::from_ref(fallback), false)
                    .await;
            }
        }

        match outcome {
            Outcome::Respond(response) => response,
            Outcome::Miss => self.fail(&request.url_path, ServeError::NotFound),
            Outcome::Directory(dir) => self.redirect_to_index(&request.url_path, dir).await,
            Outcome::Failed(err) => self.fail(&request.url_path, err),
        }
    }

    /// Resolve, filter and probe one candidate
    async fn attempt(
        &self,
        intent: Intent,
        request: &AssetRequest,
        segments: &[String],
        is_target: bool,
    ) -> Outcome {
        let path = match path::resolve(self.mount.root(), segments) {
            Ok(path) => path,
            Err(err) => return Outcome::Failed(err),
        };

        if let Some(filter) = self.mount.filter() {
            if let Err(rejection) = filter.check(&request.url_path, &path, is_target).await {
                return Outcome::Failed(rejection.into());
            }
        }

        match intent {
            Intent::Fetch => self.fetch(&request.url_path, path).await,
            Intent::Test => self.test(path).await,
        }
    }

    async fn fetch(&self, url_path: &str, path: PathBuf) -> Outcome {
        let file = match probe::open(&path).await {
            Opened::File(file) => file,
            Opened::Directory => return Outcome::Directory(path),
            Opened::Missing => return Outcome::Miss,
            Opened::Failed(err) => return Outcome::Failed(err.into()),
        };

        let mut body: BodyStream = Box::pin(ReaderStream::new(file));

        if let Some(transform) = self.mount.transform() {
            match transform.transform(url_path, &path, body).await {
                TransformOutcome::Continue(stream) => body = stream,
                TransformOutcome::Handled(response) => return Outcome::Respond(response),
            }
        }

        // Headers go out with the first chunk; until then a read error
        // can still become a 500.
        let first = match body.next().await {
            Some(Err(err)) => return Outcome::Failed(err.into()),
            first => first,
        };

        let content_type = self.mount.mime().resolve(&path);
        let disposition = self.mount.downloads().disposition(content_type, &path);

        let body: BodyStream = Box::pin(stream::iter(first).chain(body).inspect_err(move |err| {
            logger::log_error(&format!(
                "Read error after headers were sent for '{}': {err}",
                path.display()
            ));
        }));

        Outcome::Respond(http::build_file_response(content_type, disposition, body))
    }

    async fn test(&self, path: PathBuf) -> Outcome {
        match probe::stat(&path).await {
            Stat::File(meta) => {
                let content_type = self.mount.mime().resolve(&path);
                Outcome::Respond(http::build_metadata_response(
                    content_type,
                    meta.len(),
                    meta.modified().ok(),
                ))
            }
            Stat::Directory => Outcome::Directory(path),
            Stat::Special | Stat::Missing => Outcome::Miss,
            Stat::Failed(err) => Outcome::Failed(err.into()),
        }
    }

    /// Redirect a folder request to its index file, folders are never listed
    async fn redirect_to_index(&self, url_path: &str, dir: PathBuf) -> Response<ResponseBody> {
        let has_index = matches!(probe::stat(&dir.join(INDEX_FILE)).await, Stat::File(_));
        match self.mount.index_location(&dir) {
            Some(location) if has_index => http::build_redirect_response(&location),
            _ => self.fail(url_path, ServeError::ListingForbidden(dir)),
        }
    }

    fn fail(&self, url_path: &str, err: ServeError) -> Response<ResponseBody> {
        match &err {
            ServeError::Internal(_) => {
                logger::log_error(&format!("{url_path} (mount '{}'): {err}", self.mount.prefix()));
            }
            ServeError::OutsideRoot(_) | ServeError::Rejected(_) => {
                logger::log_warning(&format!("{url_path}: {err}"));
            }
            _ => {}
        }
        http::build_text_response(err.status(), err.public_message())
    }
}

impl From<MountConfig> for StaticAssetResolver {
    fn from(mount: MountConfig) -> Self {
        Self::new(mount)
    }
}
