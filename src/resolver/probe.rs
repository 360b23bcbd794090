//! Filesystem probes
//!
//! Opening a file for delivery (GET) and stat'ing it for an existence test
//! (HEAD), with OS errors folded into the few cases the resolver branches on.

use std::fs::Metadata;
use std::io;
use std::path::Path;
use tokio::fs::{self, File};

/// Result of opening a path for reading
#[derive(Debug)]
pub enum Opened {
    File(File),
    Directory,
    Missing,
    Failed(io::Error),
}

/// Result of stat'ing a path
#[derive(Debug)]
pub enum Stat {
    File(Metadata),
    Directory,
    /// Exists but is neither a regular file nor a directory
    Special,
    Missing,
    Failed(io::Error),
}

/// Open `path` for streaming
///
/// Special files are reported as missing without being opened: opening a
/// FIFO blocks until a writer shows up.
pub async fn open(path: &Path) -> Opened {
    match stat(path).await {
        Stat::File(_) => {}
        Stat::Directory => return Opened::Directory,
        Stat::Special | Stat::Missing => return Opened::Missing,
        Stat::Failed(e) => return Opened::Failed(e),
    }

    match File::open(path).await {
        Ok(file) => Opened::File(file),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Opened::Missing,
        Err(e) => Opened::Failed(e),
    }
}

/// Stat `path`, following symlinks
pub async fn stat(path: &Path) -> Stat {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Stat::File(meta),
        Ok(meta) if meta.is_dir() => Stat::Directory,
        Ok(_) => Stat::Special,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Stat::Missing,
        Err(e) => Stat::Failed(e),
    }
}
