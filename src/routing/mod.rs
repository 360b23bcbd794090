//! Routing module
//!
//! Maps a request path onto the mount that serves it:
//! - Prefix match on segment boundaries, in registration order
//! - Percent-decoding of the remaining route segments

mod matcher;
mod table;

pub use matcher::{match_prefix, split_route};
pub use table::MountTable;
