//! Bootstrap — first-start checks and admin account creation.
//!
//! When taskboardd starts:
//! 1. Verify the config carries an admin password hash — refuse to start
//!    without one.
//! 2. Ensure the admin user exists and holds the `admin` role.

use std::sync::Arc;

use tracing::info;

use auth::model::ROLE_ADMIN;
use auth::service::AuthService;
use taskboard_core::now_rfc3339;
use taskboard_sql::Value;

use crate::config::ServerConfig;

/// Verify server configuration is ready for production use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.admin.password_hash.is_empty() {
        anyhow::bail!(
            "No admin password hash found in configuration.\n\
             Generate one with an argon2id tool and set [admin].password_hash."
        );
    }
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

/// Ensure the configured admin user exists with the `admin` role. The
/// password hash comes straight from the config, so the user row is
/// written directly rather than through the plaintext registration path.
pub fn ensure_admin(auth: &Arc<AuthService>, config: &ServerConfig) -> anyhow::Result<()> {
    let user = match auth
        .find_user_by_email(&config.admin.email)
        .map_err(|e| anyhow::anyhow!("admin lookup failed: {}", e))?
    {
        Some(user) => {
            info!("Admin user {} already exists", config.admin.email);
            user
        }
        None => {
            let name = config.admin.name.clone().unwrap_or_else(|| "Admin".into());
            auth.sql()
                .insert(
                    "INSERT INTO users (name, email, password_hash, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    &[
                        Value::Text(name),
                        Value::Text(config.admin.email.clone()),
                        Value::Text(config.admin.password_hash.clone()),
                        Value::Text(now_rfc3339()),
                    ],
                )
                .map_err(|e| anyhow::anyhow!("failed to create admin user: {}", e))?;
            info!("Created admin user {}", config.admin.email);
            auth.find_user_by_email(&config.admin.email)
                .map_err(|e| anyhow::anyhow!("admin lookup failed: {}", e))?
                .ok_or_else(|| anyhow::anyhow!("admin user vanished after insert"))?
        }
    };

    // Idempotent: re-granting an already-held role is a no-op.
    auth.assign_role(user.id, ROLE_ADMIN)
        .map_err(|e| anyhow::anyhow!("failed to grant admin role: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminConfig, JwtConfig, StorageConfig};
    use auth::service::AuthConfig;
    use taskboard_sql::SqliteStore;

    fn test_config() -> ServerConfig {
        ServerConfig {
            storage: StorageConfig {
                data_dir: "/tmp".into(),
            },
            jwt: JwtConfig {
                secret: "test".into(),
                access_expire_secs: 900,
                refresh_expire_secs: 604800,
            },
            admin: AdminConfig {
                email: "admin@example.com".into(),
                name: None,
                password_hash: "$argon2id$fake".into(),
            },
        }
    }

    #[test]
    fn test_verify_config_empty_hash() {
        let mut config = test_config();
        config.admin.password_hash = String::new();
        assert!(verify_config(&config).is_err());
    }

    #[test]
    fn test_ensure_admin_is_idempotent() {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let auth = AuthService::new(sql, AuthConfig::default()).unwrap();
        let config = test_config();

        ensure_admin(&auth, &config).unwrap();
        ensure_admin(&auth, &config).unwrap();

        let admin = auth
            .find_user_by_email("admin@example.com")
            .unwrap()
            .unwrap();
        let permissions = auth.permissions_for_user(admin.id).unwrap();
        assert!(permissions.contains(&"view_all_users".to_string()));
    }
}
