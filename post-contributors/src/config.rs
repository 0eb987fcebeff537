//! Configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::domain::Capability;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContributorsConfig {
    /// Association rules
    #[serde(default)]
    pub association: AssociationConfig,

    /// Front-end rendering
    #[serde(default)]
    pub display: DisplayConfig,

    /// Anti-forgery token settings
    #[serde(default)]
    pub token: TokenConfig,

    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,

    /// Durable storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Users loaded into the identity directory at startup
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl ContributorsConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

/// What `set_association` reports when the token or authorization check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeniedPolicy {
    /// Behave as if the write happened: return the prior association.
    #[default]
    Silent,
    /// Surface `ContributorServiceError::Denied`.
    ExplicitError,
}

/// Association rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationConfig {
    /// Capability a user needs to be listed as a contributor
    #[serde(default = "default_eligible_capability")]
    pub eligible_capability: String,

    /// Capability that allows editing any content item
    #[serde(default = "default_editor_capability")]
    pub editor_capability: String,

    /// Metadata key the association is stored under
    #[serde(default = "default_meta_key")]
    pub meta_key: String,

    #[serde(default)]
    pub on_denied: DeniedPolicy,
}

impl AssociationConfig {
    pub fn capability(&self) -> Capability {
        Capability::new(self.eligible_capability.clone())
    }

    pub fn editor(&self) -> Capability {
        Capability::new(self.editor_capability.clone())
    }
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            eligible_capability: default_eligible_capability(),
            editor_capability: default_editor_capability(),
            meta_key: default_meta_key(),
            on_denied: DeniedPolicy::default(),
        }
    }
}

fn default_eligible_capability() -> String {
    "author".to_string()
}

fn default_editor_capability() -> String {
    "editor".to_string()
}

fn default_meta_key() -> String {
    "post_contributors".to_string()
}

/// Front-end rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Heading printed above the contributor list
    #[serde(default = "default_heading")]
    pub heading: String,

    /// Base URL used for contributor profile links
    #[serde(default = "default_site_url")]
    pub site_url: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            heading: default_heading(),
            site_url: default_site_url(),
        }
    }
}

fn default_heading() -> String {
    "Contributors:".to_string()
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

/// Anti-forgery token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// HMAC secret. A random secret is generated at startup when unset,
    /// which invalidates outstanding tokens on restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// How long an issued token stays valid, in seconds
    #[serde(default = "default_token_lifetime_secs")]
    pub lifetime_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: None,
            lifetime_secs: default_token_lifetime_secs(),
        }
    }
}

fn default_token_lifetime_secs() -> u64 {
    86_400
}

/// HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 4010))
}

/// Durable storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the sled database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Keep metadata in memory only; nothing survives a restart
    #[serde(default)]
    pub in_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            in_memory: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// One user of the identity directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub id: u64,
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ContributorsConfig::default();
        assert_eq!(config.association.eligible_capability, "author");
        assert_eq!(config.association.editor_capability, "editor");
        assert_eq!(config.association.meta_key, "post_contributors");
        assert_eq!(config.association.on_denied, DeniedPolicy::Silent);
        assert!(config.users.is_empty());
        assert_eq!(config.display.heading, "Contributors:");
        assert_eq!(config.token.lifetime_secs, 86_400);
        assert!(config.token.secret.is_none());
        assert_eq!(config.server.listen.port(), 4010);
        assert!(!config.storage.in_memory);
    }

    #[test]
    fn test_config_from_str() {
        let toml_content = r#"
[association]
eligible_capability = "editor"
meta_key = "article_contributors"
on_denied = "explicit_error"

[display]
heading = "Written with"
site_url = "https://blog.example.com"

[token]
secret = "s3cr3t"
lifetime_secs = 3600

[server]
listen = "0.0.0.0:8088"

[storage]
data_dir = "/var/lib/contributors"

[[users]]
id = 3
display_name = "Ada"
email = "ada@example.com"
capabilities = ["author"]

[[users]]
id = 1
display_name = "Root"
capabilities = ["editor", "author"]
"#;

        let config = ContributorsConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.association.capability(), Capability::new("editor"));
        assert_eq!(config.association.meta_key, "article_contributors");
        assert_eq!(config.association.on_denied, DeniedPolicy::ExplicitError);
        assert_eq!(config.display.heading, "Written with");
        assert_eq!(config.display.site_url, "https://blog.example.com");
        assert_eq!(config.token.secret.as_deref(), Some("s3cr3t"));
        assert_eq!(config.token.lifetime_secs, 3600);
        assert_eq!(config.server.listen.port(), 8088);
        assert_eq!(
            config.storage.data_dir,
            PathBuf::from("/var/lib/contributors")
        );
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].capabilities, vec!["author".to_string()]);
        assert_eq!(config.users[1].email, "");
    }

    #[test]
    fn test_config_partial() {
        let toml_content = r#"
[association]
on_denied = "explicit_error"
"#;

        let config = ContributorsConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.association.on_denied, DeniedPolicy::ExplicitError);
        assert_eq!(config.association.eligible_capability, "author");
        assert_eq!(config.display.heading, "Contributors:");
    }

    #[test]
    fn test_config_rejects_unknown_policy() {
        let toml_content = r#"
[association]
on_denied = "loud"
"#;
        assert!(matches!(
            ContributorsConfig::from_toml_str(toml_content),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("contributors.toml");

        let mut config = ContributorsConfig::default();
        config.association.eligible_capability = "contributor".to_string();
        config.to_file(&path).unwrap();

        let loaded = ContributorsConfig::from_file(&path).unwrap();
        assert_eq!(loaded.association.eligible_capability, "contributor");
    }
}
