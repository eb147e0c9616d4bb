//! Host configuration loading

use anyhow::Result;
use arbor_core::AssetCatalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// URL prefix the model and texture tree is served under
pub const STATIC_PREFIX: &str = "static";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Models the viewer will request, checked at startup
    #[serde(default)]
    pub assets: AssetCatalog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the web server
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory holding index.html and the wasm bundle
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,
    /// Directory served under /static
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            web_dir: default_web_dir(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

/// Load configuration from file, or defaults if it doesn't exist
pub fn load_config(path: &Path) -> Result<HostConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: HostConfig = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(HostConfig::default())
    }
}

impl HostConfig {
    /// Local file backing an asset URL path such as `static/resources/x.glb`
    pub fn asset_file(&self, url_path: &str) -> Option<PathBuf> {
        let relative = url_path
            .trim_start_matches('/')
            .strip_prefix(STATIC_PREFIX)?
            .trim_start_matches('/');
        Some(self.server.static_dir.join(relative))
    }

    /// Asset paths that will 404 when the viewer asks for them
    pub fn missing_assets(&self) -> Vec<String> {
        let catalog = &self.assets;
        let mut paths = vec![
            catalog.unsustainable.as_str(),
            catalog.moderate.as_str(),
            catalog.healthy.as_str(),
        ];
        paths.push(catalog.initial_asset());
        paths.sort_unstable();
        paths.dedup();

        paths
            .into_iter()
            .filter(|p| match self.asset_file(p) {
                Some(file) => !file.is_file(),
                None => {
                    warn!(path = %p, "Asset is not under /{}, cannot check it", STATIC_PREFIX);
                    false
                }
            })
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.server.web_dir, PathBuf::from("web"));
        assert_eq!(config.server.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arbor.toml");
        fs::write(&path, "[server]\nbind = \"0.0.0.0:9000\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.static_dir, PathBuf::from("static"));
        assert!(config.assets.moderate.ends_with(".glb"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arbor.toml");
        fs::write(&path, "[server\nbind = ").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_asset_file_mapping() {
        let mut config = HostConfig::default();
        config.server.static_dir = PathBuf::from("/srv/arbor/static");

        assert_eq!(
            config.asset_file("static/resources/tree.glb"),
            Some(PathBuf::from("/srv/arbor/static/resources/tree.glb"))
        );
        assert_eq!(
            config.asset_file("/static/tree.glb"),
            Some(PathBuf::from("/srv/arbor/static/tree.glb"))
        );
        assert_eq!(config.asset_file("https://cdn.example.com/tree.glb"), None);
    }

    #[test]
    fn test_missing_assets_reports_absent_models() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = HostConfig::default();
        config.server.static_dir = dir.path().to_path_buf();
        config.assets.unsustainable = "static/a.glb".into();
        config.assets.moderate = "static/b.glb".into();
        config.assets.healthy = "static/c.glb".into();
        fs::write(dir.path().join("a.glb"), b"glTF").unwrap();
        fs::write(dir.path().join("c.glb"), b"glTF").unwrap();

        assert_eq!(config.missing_assets(), vec!["static/b.glb".to_string()]);
    }

    #[test]
    fn test_missing_initial_asset_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = HostConfig::default();
        config.server.static_dir = dir.path().to_path_buf();
        config.assets.unsustainable = "static/a.glb".into();
        config.assets.moderate = "static/b.glb".into();
        config.assets.healthy = "static/c.glb".into();
        config.assets.initial = Some("static/a.glb".into());
        fs::write(dir.path().join("c.glb"), b"glTF").unwrap();

        assert_eq!(
            config.missing_assets(),
            vec!["static/a.glb".to_string(), "static/b.glb".to_string()]
        );
    }
}
