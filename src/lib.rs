//! Static asset mounts over tokio/hyper
//!
//! Each configured mount maps a URL prefix onto a sandboxed folder. A
//! request routed to a mount is resolved to a file inside that folder,
//! passed through the mount's optional filter and transform hooks, and
//! streamed back with its MIME type. Missing files can fall back to a
//! mount-wide default file, folders redirect to their `index.html`.
//!
//! ```no_run
//! use static_mounts::mount::MountConfig;
//! use static_mounts::resolver::{AssetRequest, StaticAssetResolver};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = StaticAssetResolver::new(
//!     MountConfig::new("/assets", "public/assets")?.with_fallback("index.html"),
//! );
//! let request = AssetRequest::new(
//!     hyper::Method::GET,
//!     "/assets/app.js",
//!     vec!["app.js".to_string()],
//! );
//! let response = resolver.serve(&request).await;
//! assert!(response.status().is_success());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod hooks;
pub mod http;
pub mod logger;
pub mod mount;
pub mod resolver;
pub mod routing;
pub mod server;

pub use error::{MountError, ServeError};
pub use hooks::{Filter, HookRejection, Transform, TransformOutcome};
pub use mount::{MountConfig, MountDescriptor};
pub use resolver::{AssetRequest, StaticAssetResolver};
