//! Request handler module
//!
//! Responsible for dispatching requests to the mount that serves them.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
