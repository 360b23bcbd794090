//! HTTP protocol layer module
//!
//! Body types, MIME resolution and response builders shared by every mount,
//! decoupled from the request state machine.

pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::{empty_body, full_body, stream_body, BodyStream, ResponseBody};
pub use mime::{DownloadTable, MimeTable};
pub use response::{
    build_file_response, build_metadata_response, build_not_found_response,
    build_redirect_response, build_text_response,
};
