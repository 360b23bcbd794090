// Configuration module entry point
// Loads configuration and turns mount descriptors into a mount table

mod state;
mod types;

use crate::error::MountError;
use crate::logger;
use crate::mount::MountConfig;
use crate::resolver::StaticAssetResolver;
use crate::routing::MountTable;
use std::net::SocketAddr;
use std::path::Path;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// Environment variables override the file, e.g.
    /// `STATIC_MOUNTS_SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("STATIC_MOUNTS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.project_folder", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Build one resolver per configured mount, in configuration order
    pub fn build_mounts(&self) -> Result<MountTable, MountError> {
        let project = Path::new(&self.server.project_folder);
        let mut table = MountTable::new();
        for descriptor in &self.mounts {
            let mount = MountConfig::from_descriptor(project, descriptor)?;
            logger::log_mount_registered(&mount.route_pattern(), mount.root());
            table.register(StaticAssetResolver::new(mount));
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, content: &str) -> String {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let config = Config::load_from(missing.to_str().unwrap()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.project_folder, ".");
        assert_eq!(config.logging.access_log_format, "combined");
        assert!(config.mounts.is_empty());
    }

    #[test]
    fn test_load_mounts_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[server]
port = 9090
project_folder = "/srv/site"

[[static]]
prefix = "/media"
folder = "assets/media"

[[static]]
prefix = "/"
folder = "public"
fallback = "index.html"
mime = { ".vue" = "text/x-vue" }
download = { "application/pdf" = true }
"#,
        );

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.mounts.len(), 2);
        assert_eq!(config.mounts[0].prefix, "/media");
        assert_eq!(config.mounts[1].fallback.as_deref(), Some("index.html"));
        assert_eq!(
            config.mounts[1].mime.get(".vue").map(String::as_str),
            Some("text/x-vue")
        );
        assert_eq!(config.mounts[1].download.get("application/pdf"), Some(&true));
    }

    #[test]
    fn test_build_mounts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("files")).unwrap();

        let mut config = Config::default();
        config.server.project_folder = dir.path().to_str().unwrap().to_string();
        config.mounts = vec![
            crate::mount::MountDescriptor::new("/files", "files"),
            crate::mount::MountDescriptor::new("/", "."),
        ];

        let table = config.build_mounts().unwrap();
        let patterns: Vec<String> = table.patterns().collect();
        assert_eq!(patterns, vec!["/files/*route", "/*route"]);
    }

    #[test]
    fn test_build_mounts_rejects_escape() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.project_folder = dir.path().to_str().unwrap().to_string();
        config.mounts = vec![crate::mount::MountDescriptor::new("/up", "../")];

        assert!(matches!(
            config.build_mounts(),
            Err(MountError::OutsideProject { .. })
        ));
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::default();
        assert_eq!(
            config.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
    }
}
