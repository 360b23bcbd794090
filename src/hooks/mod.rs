//! Filter and transform hooks
//!
//! Optional per-mount extension points. A [`Filter`] runs before every
//! filesystem probe (requested file and fallback alike) and may veto access
//! with a status code. A [`Transform`] receives the byte stream opened for
//! a file and either hands back a stream to deliver or takes over the
//! response entirely.

use crate::http::{BodyStream, ResponseBody};
use async_trait::async_trait;
use hyper::{Response, StatusCode};
use std::path::Path;
use thiserror::Error;

/// Statused error raised by a filter hook
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct HookRejection {
    pub status: StatusCode,
    pub message: String,
}

impl HookRejection {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

/// Access check run before a file is probed
#[async_trait]
pub trait Filter: Send + Sync {
    /// * `url_path` - Path of the request URL
    /// * `path` - Resolved file path inside the mount's root
    /// * `is_target` - `false` when `path` is the mount's fallback file
    async fn check(
        &self,
        url_path: &str,
        path: &Path,
        is_target: bool,
    ) -> Result<(), HookRejection>;
}

/// Result of a transform hook
pub enum TransformOutcome {
    /// Deliver this stream (the original or a rewritten one)
    Continue(BodyStream),
    /// The hook produced the whole response itself
    Handled(Response<ResponseBody>),
}

/// Rewrites or replaces the content of a delivered file
#[async_trait]
pub trait Transform: Send + Sync {
    async fn transform(&self, url_path: &str, path: &Path, body: BodyStream) -> TransformOutcome;
}

/// Synchronous closure used as a [`Filter`]
pub struct FnFilter<F>(pub F);

#[async_trait]
impl<F> Filter for FnFilter<F>
where
    F: Fn(&str, &Path, bool) -> Result<(), HookRejection> + Send + Sync,
{
    async fn check(
        &self,
        url_path: &str,
        path: &Path,
        is_target: bool,
    ) -> Result<(), HookRejection> {
        (self.0)(url_path, path, is_target)
    }
}
