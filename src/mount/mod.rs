//! Mount configuration
//!
//! A mount pairs a URL prefix with a sandboxed root folder plus optional
//! fallback file, MIME and download overrides, and hooks. It is built once
//! at startup and shared read-only by all requests.

use crate::error::MountError;
use crate::hooks::{Filter, Transform};
use crate::http::{DownloadTable, MimeTable};
use crate::resolver::path::normalize;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the file a folder request is redirected to
pub const INDEX_FILE: &str = "index.html";

/// Characters escaped in a path segment of a `Location` header
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Mount as read from configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MountDescriptor {
    /// URL prefix, `/` mounts at the root
    pub prefix: String,
    /// Folder relative to the project folder
    pub folder: String,
    /// File (relative to `folder`) served when the requested one is missing
    #[serde(default)]
    pub fallback: Option<String>,
    /// Extension to MIME type overrides, e.g. `".vue" = "text/x-vue"`
    #[serde(default)]
    pub mime: HashMap<String, String>,
    /// MIME types sent as attachment
    #[serde(default)]
    pub download: HashMap<String, bool>,
}

impl MountDescriptor {
    pub fn new(prefix: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            folder: folder.into(),
            fallback: None,
            mime: HashMap::new(),
            download: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// Immutable runtime configuration of a mount
pub struct MountConfig {
    prefix: String,
    root: PathBuf,
    fallback: Option<String>,
    mime: MimeTable,
    downloads: DownloadTable,
    filter: Option<Arc<dyn Filter>>,
    transform: Option<Arc<dyn Transform>>,
}

impl MountConfig {
    /// Create a mount serving `root` under `prefix`
    ///
    /// `root` is made absolute and canonicalized when it exists.
    pub fn new(prefix: &str, root: impl AsRef<Path>) -> Result<Self, MountError> {
        let root = normalize(&std::path::absolute(root.as_ref())?);
        let root = match std::fs::canonicalize(&root) {
            Ok(canonical) => canonical,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                crate::logger::log_warning(&format!(
                    "Static folder '{}' does not exist (yet)",
                    root.display()
                ));
                root
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            prefix: normalize_prefix(prefix)?,
            root,
            fallback: None,
            mime: MimeTable::default(),
            downloads: DownloadTable::default(),
            filter: None,
            transform: None,
        })
    }

    /// Create a mount from its configuration, `folder` relative to `project_folder`
    pub fn from_descriptor(
        project_folder: &Path,
        descriptor: &MountDescriptor,
    ) -> Result<Self, MountError> {
        let project = normalize(&std::path::absolute(project_folder)?);
        let folder = normalize(&project.join(&descriptor.folder));
        if !folder.starts_with(&project) {
            return Err(MountError::OutsideProject { folder, project });
        }

        let mut mount = Self::new(&descriptor.prefix, folder)?
            .with_mime_overrides(&descriptor.mime)
            .with_downloads(&descriptor.download);
        if let Some(fallback) = &descriptor.fallback {
            mount = mount.with_fallback(fallback.clone());
        }
        Ok(mount)
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    #[must_use]
    pub fn with_mime_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        self.mime = MimeTable::new(overrides);
        self
    }

    #[must_use]
    pub fn with_downloads(mut self, downloads: &HashMap<String, bool>) -> Self {
        self.downloads = DownloadTable::new(downloads);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Arc<dyn Transform>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// URL prefix without trailing slash, empty for the root mount
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fallback(&self) -> Option<&String> {
        self.fallback.as_ref()
    }

    pub const fn mime(&self) -> &MimeTable {
        &self.mime
    }

    pub const fn downloads(&self) -> &DownloadTable {
        &self.downloads
    }

    pub fn filter(&self) -> Option<&dyn Filter> {
        self.filter.as_deref()
    }

    pub fn transform(&self) -> Option<&dyn Transform> {
        self.transform.as_deref()
    }

    /// Route pattern this mount answers, e.g. `/files/*route`
    pub fn route_pattern(&self) -> String {
        format!("{}/*route", self.prefix)
    }

    /// URL of `path` below this mount, `None` if `path` is outside the root
    pub fn url_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut url = self.prefix.clone();
        for component in relative.components() {
            url.push('/');
            let segment = component.as_os_str().to_string_lossy();
            url.extend(utf8_percent_encode(&segment, PATH_SEGMENT));
        }
        Some(url)
    }

    /// Location of the index file of folder `dir`
    pub fn index_location(&self, dir: &Path) -> Option<String> {
        self.url_for(&dir.join(INDEX_FILE))
    }
}

impl fmt::Debug for MountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountConfig")
            .field("prefix", &self.prefix)
            .field("root", &self.root)
            .field("fallback", &self.fallback)
            .field("filter", &self.filter.is_some())
            .field("transform", &self.transform.is_some())
            .finish_non_exhaustive()
    }
}

/// `/` becomes empty, trailing slashes go, a leading slash is enforced
fn normalize_prefix(prefix: &str) -> Result<String, MountError> {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.contains(['?', '#', '*']) {
        return Err(MountError::InvalidPrefix(prefix.to_string()));
    }
    if trimmed.is_empty() {
        Ok(String::new())
    } else if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{trimmed}"))
    }
}
