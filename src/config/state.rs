// Application state module
// Shared, read-only state of a running server

use super::types::Config;
use crate::routing::MountTable;

/// Application state
pub struct AppState {
    pub config: Config,
    pub mounts: MountTable,
}

impl AppState {
    pub fn new(config: Config, mounts: MountTable) -> Self {
        Self { config, mounts }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
