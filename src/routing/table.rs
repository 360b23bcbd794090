//! Mount table
//!
//! Ordered list of resolvers; the first mount whose prefix matches wins.

use super::matcher::{match_prefix, split_route};
use crate::resolver::StaticAssetResolver;

#[derive(Debug, Default)]
pub struct MountTable {
    mounts: Vec<StaticAssetResolver>,
}

impl MountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver, after all previously registered ones
    pub fn register(&mut self, resolver: StaticAssetResolver) {
        self.mounts.push(resolver);
    }

    /// Find the mount serving `path` and the decoded segments below its prefix
    pub fn match_path(&self, path: &str) -> Option<(&StaticAssetResolver, Vec<String>)> {
        self.mounts.iter().find_map(|resolver| {
            match_prefix(resolver.mount().prefix(), path).map(|rest| (resolver, split_route(rest)))
        })
    }

    /// Route patterns in registration order, e.g. `/files/*route`
    pub fn patterns(&self) -> impl Iterator<Item = String> + '_ {
        self.mounts.iter().map(|r| r.mount().route_pattern())
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}
