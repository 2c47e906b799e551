use taskboard_sql::{SQLStore, Value};

use crate::model::{admin_permissions, ROLE_ADMIN, ROLE_CONTRIBUTOR, ROLE_OWNER, ROLE_VIEWER};
use crate::service::AuthError;

/// Initialize the schema for auth resources and seed the well-known roles.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), AuthError> {
    let statements = [
        // Users table: core identity.
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",

        // Roles table: permission sets, identified by unique name.
        // Holds both global roles (admin) and board-scoped role markers.
        "CREATE TABLE IF NOT EXISTS roles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            permissions TEXT NOT NULL DEFAULT '[]'
        )",

        // Global role assignment: composite key, one row per (user, role).
        "CREATE TABLE IF NOT EXISTS user_roles (
            user_id INTEGER NOT NULL,
            role_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, role_id),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (role_id) REFERENCES roles(id) ON DELETE CASCADE
        )",

        // Revocation ledger: refresh tokens no longer honored. The UNIQUE
        // token column doubles as the compare-and-set that makes rotation
        // races resolve to exactly one winner.
        "CREATE TABLE IF NOT EXISTS revoked_tokens (
            token TEXT PRIMARY KEY,
            expires_at INTEGER NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_revoked_expires ON revoked_tokens(expires_at)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| AuthError::Storage(e.to_string()))?;
    }

    seed_roles(sql)?;

    Ok(())
}

/// Seed the well-known roles if missing. The admin role carries the full
/// platform permission list; board roles are markers with no permissions.
fn seed_roles(sql: &dyn SQLStore) -> Result<(), AuthError> {
    let admin_perms = serde_json::to_string(&admin_permissions())
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    let seeds = [
        (ROLE_ADMIN, admin_perms.as_str()),
        (ROLE_OWNER, "[]"),
        (ROLE_CONTRIBUTOR, "[]"),
        (ROLE_VIEWER, "[]"),
    ];

    for (name, perms) in &seeds {
        sql.exec(
            "INSERT OR IGNORE INTO roles (name, permissions) VALUES (?1, ?2)",
            &[Value::Text(name.to_string()), Value::Text(perms.to_string())],
        )
        .map_err(|e| AuthError::Storage(e.to_string()))?;
    }

    Ok(())
}
