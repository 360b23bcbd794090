//! MIME type detection module
//!
//! Maps file name extensions to Content-Type values. Every mount owns a
//! [`MimeTable`] built from the defaults below with its own overrides
//! merged on top, and a [`DownloadTable`] deciding which types are sent as
//! attachments.

use hyper::header::HeaderValue;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::HashMap;
use std::path::Path;

/// Fallback for unknown or missing extensions
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Characters escaped in the `filename` parameter of `Content-Disposition`
const FILENAME: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b';')
    .add(b',')
    .add(b'\\');

const DEFAULT_TYPES: &[(&str, &str)] = &[
    // Text
    (".html", "text/html"),
    (".htm", "text/html"),
    (".css", "text/css"),
    (".txt", "text/plain"),
    (".md", "text/markdown"),
    (".csv", "text/csv"),
    (".xml", "application/xml"),
    // JavaScript/WASM
    (".js", "application/javascript"),
    (".mjs", "application/javascript"),
    (".json", "application/json"),
    (".map", "application/json"),
    (".wasm", "application/wasm"),
    // Images
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
    (".svg", "image/svg+xml"),
    (".ico", "image/x-icon"),
    (".webp", "image/webp"),
    (".avif", "image/avif"),
    (".bmp", "image/bmp"),
    (".tif", "image/tiff"),
    (".tiff", "image/tiff"),
    // Video
    (".mp4", "video/mp4"),
    (".webm", "video/webm"),
    (".ogv", "video/ogg"),
    (".mov", "video/quicktime"),
    (".avi", "video/x-msvideo"),
    // Audio
    (".mp3", "audio/mpeg"),
    (".wav", "audio/wav"),
    (".ogg", "audio/ogg"),
    (".flac", "audio/flac"),
    (".m4a", "audio/mp4"),
    // Fonts
    (".woff", "font/woff"),
    (".woff2", "font/woff2"),
    (".ttf", "font/ttf"),
    (".otf", "font/otf"),
    (".eot", "application/vnd.ms-fontobject"),
    // Documents
    (".pdf", "application/pdf"),
    (".rtf", "application/rtf"),
    (".doc", "application/msword"),
    (
        ".docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (".xls", "application/vnd.ms-excel"),
    (
        ".xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (".odt", "application/vnd.oasis.opendocument.text"),
    (".ods", "application/vnd.oasis.opendocument.spreadsheet"),
    // Archives
    (".zip", "application/zip"),
    (".gz", "application/gzip"),
    (".tar", "application/x-tar"),
    (".7z", "application/x-7z-compressed"),
];

/// Built-in extension table, keys are lowercase with a leading dot
pub fn default_types() -> HashMap<String, String> {
    DEFAULT_TYPES
        .iter()
        .map(|(ext, mime)| ((*ext).to_string(), (*mime).to_string()))
        .collect()
}

/// Extract the extension of a path's file name
///
/// Everything from the last `.` of the file name onward, lowercased.
///
/// # Examples
/// ```
/// use static_mounts::http::mime::extension_of;
/// use std::path::Path;
/// assert_eq!(extension_of(Path::new("/srv/Site.HTML")).as_deref(), Some(".html"));
/// assert_eq!(extension_of(Path::new("/srv/README")), None);
/// ```
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let dot = name.rfind('.')?;
    Some(name[dot..].to_ascii_lowercase())
}

/// Normalize a configured extension key to `.ext` form
fn normalize_key(key: &str) -> String {
    let key = key.trim().to_ascii_lowercase();
    if key.starts_with('.') {
        key
    } else {
        format!(".{key}")
    }
}

/// Extension table of a single mount
#[derive(Debug, Clone)]
pub struct MimeTable {
    types: HashMap<String, String>,
}

impl MimeTable {
    /// Merge `overrides` over the built-in defaults; overrides win
    pub fn new(overrides: &HashMap<String, String>) -> Self {
        let mut types = default_types();
        for (ext, mime) in overrides {
            types.insert(normalize_key(ext), mime.clone());
        }
        Self { types }
    }

    /// Resolve the Content-Type of a file
    pub fn resolve(&self, path: &Path) -> &str {
        extension_of(path)
            .and_then(|ext| self.types.get(&ext))
            .map_or(DEFAULT_CONTENT_TYPE, String::as_str)
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

/// MIME types delivered with `Content-Disposition: attachment`
#[derive(Debug, Clone, Default)]
pub struct DownloadTable {
    types: HashMap<String, bool>,
}

impl DownloadTable {
    pub fn new(types: &HashMap<String, bool>) -> Self {
        Self {
            types: types
                .iter()
                .map(|(mime, flag)| (mime.trim().to_ascii_lowercase(), *flag))
                .collect(),
        }
    }

    pub fn is_attachment(&self, content_type: &str) -> bool {
        self.types
            .get(&content_type.to_ascii_lowercase())
            .copied()
            .unwrap_or(false)
    }

    /// `Content-Disposition` header for `path`, if its type is marked for download
    pub fn disposition(&self, content_type: &str, path: &Path) -> Option<HeaderValue> {
        if !self.is_attachment(content_type) {
            return None;
        }
        let name = path.file_name()?.to_string_lossy();
        let encoded = utf8_percent_encode(&name, FILENAME);
        HeaderValue::from_str(&format!("attachment; filename={encoded}")).ok()
    }
}
