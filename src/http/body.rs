//! Response body types
//!
//! Every response produced by a mount shares one body type so that fixed
//! payloads (error texts, redirects) and streamed file contents can be
//! returned from the same code path.

use futures::{Stream, TryStreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use std::pin::Pin;

/// Byte stream read from a file, possibly rewritten by a transform hook.
pub type BodyStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Body type of all responses.
///
/// The error type is `io::Error` so a read failure after the headers went
/// out is reported to hyper, which then aborts the connection.
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Body with a fixed payload
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body without payload (HEAD, redirects)
pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body streaming the given chunks
pub fn stream_body(stream: BodyStream) -> ResponseBody {
    StreamBody::new(stream.map_ok(Frame::data)).boxed_unsync()
}
