//! Server configuration — loaded from a TOML context file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Symmetric signing secret.
    pub secret: String,

    /// Access token lifetime in seconds.
    #[serde(default = "default_access_expire")]
    pub access_expire_secs: i64,

    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_expire")]
    pub refresh_expire_secs: i64,
}

fn default_access_expire() -> i64 {
    900
}

fn default_refresh_expire() -> i64 {
    604800
}

/// Bootstrap admin account, created on first start if absent. The
/// password is stored pre-hashed (argon2id) in the config, never in
/// plaintext.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub password_hash: String,
}

impl ServerConfig {
    /// Resolve a context name to `/etc/taskboard/<name>.toml`; anything
    /// containing `/` or `.` is taken as a path directly.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/taskboard/{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/taskboard/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
    }

    #[test]
    fn test_parse_config() {
        let config: ServerConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/var/lib/taskboard"

            [jwt]
            secret = "s3cret"

            [admin]
            email = "admin@example.com"
            password_hash = "$argon2id$..."
            "#,
        )
        .unwrap();
        assert_eq!(config.jwt.access_expire_secs, 900);
        assert_eq!(config.jwt.refresh_expire_secs, 604800);
        assert_eq!(config.admin.email, "admin@example.com");
        assert!(config.admin.name.is_none());
    }
}
