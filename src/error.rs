//! Error types
//!
//! [`ServeError`] is the request-scoped taxonomy every failed resolution
//! ends in; it knows its HTTP status and the short text the client gets.
//! Details (I/O errors, hook messages, offending paths) stay in the
//! diagnostic log.

use crate::hooks::HookRejection;
use hyper::{Method, StatusCode};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Request failure
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("path name beyond document root: {}", .0.display())]
    OutsideRoot(PathBuf),

    #[error("no such file")]
    NotFound,

    #[error("folder without index file requested: {}", .0.display())]
    ListingForbidden(PathBuf),

    #[error("rejected by filter: {0}")]
    Rejected(#[from] HookRejection),

    #[error("IO error: {0}")]
    Internal(#[from] io::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed(_) | Self::OutsideRoot(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ListingForbidden(_) => StatusCode::FORBIDDEN,
            Self::Rejected(rejection) => rejection.status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed(_) => "GET or HEAD method allowed, only",
            Self::OutsideRoot(_) => "invalid path name beyond document root",
            Self::NotFound => "no such file",
            Self::ListingForbidden(_) => "access on folder list forbidden",
            Self::Rejected(rejection) => rejection_message(rejection.status),
            Self::Internal(_) => "error on accessing file",
        }
    }
}

fn rejection_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::FORBIDDEN => "accessing file or folder forbidden",
        StatusCode::NOT_FOUND => "no such file",
        status => status.canonical_reason().unwrap_or("request rejected"),
    }
}

/// Mount construction failure
#[derive(Error, Debug)]
pub enum MountError {
    #[error("static folder '{}' is not inside project folder '{}'", .folder.display(), .project.display())]
    OutsideProject { folder: PathBuf, project: PathBuf },

    #[error("invalid mount prefix '{0}'")]
    InvalidPrefix(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServeError::MethodNotAllowed(Method::POST).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServeError::OutsideRoot(PathBuf::from("/etc")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServeError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServeError::ListingForbidden(PathBuf::from("/srv")).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServeError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejection_keeps_hook_status() {
        let err = ServeError::from(HookRejection::new(StatusCode::UNAUTHORIZED, "token"));
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.public_message(), "Unauthorized");

        let err = ServeError::from(HookRejection::forbidden("this one is hidden"));
        assert_eq!(err.public_message(), "accessing file or folder forbidden");
    }

    #[test]
    fn test_internal_details_not_public() {
        let err = ServeError::from(io::Error::new(
            io::ErrorKind::Other,
            "/srv/secret/path: input/output error",
        ));
        assert!(!err.public_message().contains("/srv"));
        assert!(err.to_string().contains("/srv/secret/path"));
    }
}
