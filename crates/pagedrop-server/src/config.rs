use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use pagedrop_records::DeleteMode;
use pagedrop_store::StorageConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 3000))
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

/// Process configuration, read once at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Prefix of every share URL (`{public_base_url}/view/{identifier}`).
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// What deleting a page does to its record.
    #[serde(default)]
    pub delete_mode: DeleteMode,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_base_url: default_public_base_url(),
            delete_mode: DeleteMode::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ServerResult<String> {
        toml::to_string(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> ServerResult<()> {
        let url = self.public_base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ServerError::Config(format!(
                "public_base_url must be an http(s) URL, got {url:?}"
            )));
        }
        self.storage
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Share URL for a stored identifier.
    pub fn share_url(&self, identifier: &pagedrop_types::Identifier) -> String {
        format!("{}/view/{identifier}", self.public_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use pagedrop_types::Identifier;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.public_base_url, "http://localhost:3000");
        assert_eq!(c.delete_mode, DeleteMode::Archive);
        assert_eq!(c.storage.backend(), "chunked-memory");
        c.validate().unwrap();
    }

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ServerConfig::from_toml_str("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"
            public_base_url = "https://pages.example.com/"
            delete_mode = "purge"

            [storage]
            backend = "filesystem"
            root = "/srv/pages"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.delete_mode, DeleteMode::Purge);
        assert_eq!(
            c.storage,
            StorageConfig::Filesystem {
                root: PathBuf::from("/srv/pages")
            }
        );
        let id = Identifier::new("abc123").unwrap();
        assert_eq!(c.share_url(&id), "https://pages.example.com/view/abc123");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ServerConfig::from_toml_str(r#"public_base_url = "pages.example.com""#),
            Err(ServerError::Config(_))
        ));
        assert!(ServerConfig::from_toml_str(
            r#"
            [storage]
            backend = "chunked-memory"
            max_unit = 0
            "#
        )
        .is_err());
    }

    #[test]
    fn toml_roundtrip() {
        let c = ServerConfig::default();
        let text = c.to_toml_string().unwrap();
        assert!(text.contains("backend = \"chunked-memory\""));
        assert_eq!(ServerConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn load_missing_file() {
        let err = ServerConfig::load(Path::new("/nonexistent/pagedrop.toml")).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
