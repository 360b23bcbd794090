//! HTTP response building module
//!
//! Builders for the responses a mount produces, decoupled from the request
//! state machine that decides which one to send.

use super::body::{empty_body, full_body, stream_body, BodyStream, ResponseBody};
use chrono::{DateTime, Utc};
use hyper::header::{
    HeaderValue, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION,
};
use hyper::{Response, StatusCode};
use std::time::SystemTime;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Format a timestamp as an HTTP date (IMF-fixdate)
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Build a short plain-text response
pub fn build_text_response(status: StatusCode, message: &'static str) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_PLAIN)
        .header(CONTENT_LENGTH, message.len())
        .body(full_body(message))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback_response(status)
        })
}

/// Build 404 Not Found response for paths outside every mount
pub fn build_not_found_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, "no such file")
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            fallback_response(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

/// Build 200 response streaming a file's content
pub fn build_file_response(
    content_type: &str,
    disposition: Option<HeaderValue>,
    body: BodyStream,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type);

    if let Some(disposition) = disposition {
        builder = builder.header(CONTENT_DISPOSITION, disposition);
    }

    builder.body(stream_body(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        fallback_response(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// Build 200 response describing a file without sending it (HEAD)
pub fn build_metadata_response(
    content_type: &str,
    content_length: u64,
    modified: Option<SystemTime>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);

    if let Some(modified) = modified {
        builder = builder.header(LAST_MODIFIED, http_date(modified));
    }

    builder.body(empty_body()).unwrap_or_else(|e| {
        log_build_error("HEAD", &e);
        fallback_response(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

fn fallback_response(status: StatusCode) -> Response<ResponseBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
