use taskboard_sql::{Row, Value};

use crate::model::Role;
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Look up a role by its unique name.
    pub fn get_role_by_name(&self, name: &str) -> Result<Role, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT id, name, permissions FROM roles WHERE name = ?1",
                &[Value::Text(name.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| AuthError::NotFound(format!("Role {} does not exist", name)))?;
        role_from_row(row)
    }

    /// Look up a role by id.
    pub fn get_role(&self, id: i64) -> Result<Role, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT id, name, permissions FROM roles WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| AuthError::NotFound(format!("roles/{}", id)))?;
        role_from_row(row)
    }

    /// List all roles.
    pub fn list_roles(&self) -> Result<Vec<Role>, AuthError> {
        let rows = self
            .sql
            .query("SELECT id, name, permissions FROM roles ORDER BY id", &[])
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        rows.iter().map(role_from_row).collect()
    }

    /// Assign a global role to a user by role name. Idempotent.
    pub fn assign_role(&self, user_id: i64, role_name: &str) -> Result<(), AuthError> {
        let _user = self.get_user(user_id)?;
        let role = self.get_role_by_name(role_name)?;

        self.sql
            .exec(
                "INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?1, ?2)",
                &[Value::Integer(user_id), Value::Integer(role.id)],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Remove a global role from a user.
    pub fn unassign_role(&self, user_id: i64, role_name: &str) -> Result<(), AuthError> {
        let role = self.get_role_by_name(role_name)?;

        let affected = self
            .sql
            .exec(
                "DELETE FROM user_roles WHERE user_id = ?1 AND role_id = ?2",
                &[Value::Integer(user_id), Value::Integer(role.id)],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(AuthError::NotFound(format!(
                "User {} does not have role {}",
                user_id, role_name
            )));
        }
        Ok(())
    }

    /// Flatten the permission lists of all global roles held by a user.
    /// Deduplicated and sorted, suitable for embedding in an access token.
    pub fn permissions_for_user(&self, user_id: i64) -> Result<Vec<String>, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT roles.permissions AS permissions FROM roles
                 JOIN user_roles ON user_roles.role_id = roles.id
                 WHERE user_roles.user_id = ?1",
                &[Value::Integer(user_id)],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let mut permissions = std::collections::BTreeSet::new();
        for row in &rows {
            if let Some(json) = row.get_str("permissions") {
                let list: Vec<String> = serde_json::from_str(json)
                    .map_err(|e| AuthError::Internal(e.to_string()))?;
                permissions.extend(list);
            }
        }

        Ok(permissions.into_iter().collect())
    }
}

fn role_from_row(row: &Row) -> Result<Role, AuthError> {
    let permissions = match row.get_str("permissions") {
        Some(json) => {
            serde_json::from_str(json).map_err(|e| AuthError::Internal(e.to_string()))?
        }
        None => Vec::new(),
    };
    Ok(Role {
        id: row
            .get_i64("id")
            .ok_or_else(|| AuthError::Internal("missing id column".into()))?,
        name: row
            .get_str("name")
            .ok_or_else(|| AuthError::Internal("missing name column".into()))?
            .to_string(),
        permissions,
    })
}

#[cfg(test)]
mod tests {
    use crate::model::{RegisterRequest, ROLE_ADMIN, ROLE_OWNER, ROLE_VIEWER};
    use crate::service::{AuthConfig, AuthService};
    use taskboard_sql::SqliteStore;

    fn test_service() -> std::sync::Arc<AuthService> {
        let sql = std::sync::Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    #[test]
    fn test_seeded_roles() {
        let svc = test_service();

        let admin = svc.get_role_by_name(ROLE_ADMIN).unwrap();
        assert!(!admin.permissions.is_empty());

        let viewer = svc.get_role_by_name(ROLE_VIEWER).unwrap();
        assert!(viewer.permissions.is_empty());

        assert!(svc.get_role_by_name("superuser").is_err());
    }

    #[test]
    fn test_assign_and_flatten_permissions() {
        let svc = test_service();
        let user = svc
            .register(RegisterRequest {
                name: "Alice".into(),
                email: "alice@example.com".into(),
                password: "pw".into(),
            })
            .unwrap();

        // No roles yet: empty permission set.
        assert!(svc.permissions_for_user(user.id).unwrap().is_empty());

        svc.assign_role(user.id, ROLE_ADMIN).unwrap();
        let perms = svc.permissions_for_user(user.id).unwrap();
        assert!(perms.contains(&"view_all_users".to_string()));

        // Idempotent.
        svc.assign_role(user.id, ROLE_ADMIN).unwrap();
        assert_eq!(svc.permissions_for_user(user.id).unwrap(), perms);

        // Board role markers add nothing.
        svc.assign_role(user.id, ROLE_OWNER).unwrap();
        assert_eq!(svc.permissions_for_user(user.id).unwrap(), perms);

        svc.unassign_role(user.id, ROLE_ADMIN).unwrap();
        assert!(!svc
            .permissions_for_user(user.id)
            .unwrap()
            .contains(&"view_all_users".to_string()));
    }

    #[test]
    fn test_assign_role_missing_targets() {
        let svc = test_service();
        assert!(svc.assign_role(999, ROLE_ADMIN).is_err());

        let user = svc
            .register(RegisterRequest {
                name: "Bob".into(),
                email: "bob@example.com".into(),
                password: "pw".into(),
            })
            .unwrap();
        assert!(svc.assign_role(user.id, "no-such-role").is_err());
    }
}
