use taskboard_core::{now_rfc3339, ListParams, ListResult};
use taskboard_sql::{Row, Value};

use crate::model::{RegisterRequest, UpdateUser, User};
use crate::service::password::{hash_password, verify_password};
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Register a new user. The password is hashed before it touches the
    /// database; duplicate emails are rejected.
    pub fn register(&self, input: RegisterRequest) -> Result<User, AuthError> {
        if input.email.is_empty() {
            return Err(AuthError::Validation("email cannot be empty".into()));
        }
        if input.password.is_empty() {
            return Err(AuthError::Validation("password cannot be empty".into()));
        }

        let password_hash = hash_password(&input.password)?;
        let now = now_rfc3339();

        let id = self
            .sql
            .insert(
                "INSERT INTO users (name, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                &[
                    Value::Text(input.name.clone()),
                    Value::Text(input.email.clone()),
                    Value::Text(password_hash.clone()),
                    Value::Text(now.clone()),
                ],
            )
            .map_err(|e| AuthError::storage(e, "Email already taken"))?;

        tracing::debug!(user_id = id, "registered user");

        Ok(User {
            id,
            name: input.name,
            email: input.email,
            password_hash,
            created_at: now,
        })
    }

    /// Verify credentials and return the user, or fail Unauthorized.
    /// The same error is returned for an unknown email and a wrong
    /// password, so login failures leak nothing about account existence.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self.find_user_by_email(email)?;
        match user {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            _ => Err(AuthError::Unauthorized("Invalid credentials".into())),
        }
    }

    /// Get a user by id.
    pub fn get_user(&self, id: i64) -> Result<User, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT id, name, email, password_hash, created_at FROM users WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| AuthError::NotFound("User does not exist".into()))?;
        user_from_row(row)
    }

    /// Find a user by email, if registered.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?1",
                &[Value::Text(email.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        rows.first().map(user_from_row).transpose()
    }

    /// List users with pagination.
    pub fn list_users(&self, params: &ListParams) -> Result<ListResult<User>, AuthError> {
        let count_rows = self
            .sql
            .query("SELECT COUNT(*) AS cnt FROM users", &[])
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as usize;

        let rows = self
            .sql
            .query(
                "SELECT id, name, email, password_hash, created_at FROM users
                 ORDER BY id LIMIT ?1 OFFSET ?2",
                &[
                    Value::Integer(params.limit as i64),
                    Value::Integer(params.offset as i64),
                ],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let items = rows
            .iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListResult { items, total })
    }

    /// Update a user with an explicit per-field merge. Only name, email
    /// and password are patchable; the password is hashed from its value.
    pub fn update_user(&self, id: i64, update: UpdateUser) -> Result<User, AuthError> {
        let mut user = self.get_user(id)?;

        if let Some(email) = update.email {
            if email != user.email && self.find_user_by_email(&email)?.is_some() {
                return Err(AuthError::Conflict("Email already registered".into()));
            }
            user.email = email;
        }
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(password) = update.password {
            if password.is_empty() {
                return Err(AuthError::Validation("password cannot be empty".into()));
            }
            user.password_hash = hash_password(&password)?;
        }

        let affected = self
            .sql
            .exec(
                "UPDATE users SET name = ?1, email = ?2, password_hash = ?3 WHERE id = ?4",
                &[
                    Value::Text(user.name.clone()),
                    Value::Text(user.email.clone()),
                    Value::Text(user.password_hash.clone()),
                    Value::Integer(id),
                ],
            )
            .map_err(|e| AuthError::storage(e, "Email already registered"))?;

        if affected == 0 {
            return Err(AuthError::NotFound("User does not exist".into()));
        }
        Ok(user)
    }

    /// Delete a user. Role assignments, board memberships and invitations
    /// cascade through foreign keys; spent-token ledger entries are left
    /// to expire on their own.
    pub fn delete_user(&self, id: i64) -> Result<(), AuthError> {
        let affected = self
            .sql
            .exec("DELETE FROM users WHERE id = ?1", &[Value::Integer(id)])
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(AuthError::NotFound("User does not exist".into()));
        }
        Ok(())
    }
}

fn user_from_row(row: &Row) -> Result<User, AuthError> {
    Ok(User {
        id: row
            .get_i64("id")
            .ok_or_else(|| AuthError::Internal("missing id column".into()))?,
        name: row.get_str("name").unwrap_or_default().to_string(),
        email: row
            .get_str("email")
            .ok_or_else(|| AuthError::Internal("missing email column".into()))?
            .to_string(),
        password_hash: row
            .get_str("password_hash")
            .ok_or_else(|| AuthError::Internal("missing password_hash column".into()))?
            .to_string(),
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::AuthConfig;
    use taskboard_sql::SqliteStore;

    fn test_service() -> std::sync::Arc<AuthService> {
        let sql = std::sync::Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    fn register(svc: &AuthService, email: &str) -> User {
        svc.register(RegisterRequest {
            name: "Test".into(),
            email: email.into(),
            password: "secret".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_register_and_authenticate() {
        let svc = test_service();
        let user = register(&svc, "alice@example.com");
        assert!(user.id > 0);
        assert_ne!(user.password_hash, "secret");

        let authed = svc.authenticate("alice@example.com", "secret").unwrap();
        assert_eq!(authed.id, user.id);
    }

    #[test]
    fn test_wrong_password_is_unauthorized() {
        let svc = test_service();
        register(&svc, "alice@example.com");

        let err = svc
            .authenticate("alice@example.com", "wrong")
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(ref m) if m == "Invalid credentials"));

        // Unknown email reads identically.
        let err = svc.authenticate("nobody@example.com", "secret").unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(ref m) if m == "Invalid credentials"));
    }

    #[test]
    fn test_duplicate_email_conflict() {
        let svc = test_service();
        register(&svc, "alice@example.com");

        let err = svc
            .register(RegisterRequest {
                name: "Other".into(),
                email: "alice@example.com".into(),
                password: "pw".into(),
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(ref m) if m == "Email already taken"));
    }

    #[test]
    fn test_update_user_per_field() {
        let svc = test_service();
        let user = register(&svc, "alice@example.com");

        let updated = svc
            .update_user(
                user.id,
                UpdateUser {
                    name: Some("Alice B".into()),
                    password: Some("newpass".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Alice B");
        assert_eq!(updated.email, "alice@example.com");

        // The hash must come from the password *value*.
        assert!(svc.authenticate("alice@example.com", "newpass").is_ok());
        assert!(svc.authenticate("alice@example.com", "secret").is_err());
        assert!(svc.authenticate("alice@example.com", "password").is_err());
    }

    #[test]
    fn test_update_email_collision() {
        let svc = test_service();
        register(&svc, "alice@example.com");
        let bob = register(&svc, "bob@example.com");

        let err = svc
            .update_user(
                bob.id,
                UpdateUser {
                    email: Some("alice@example.com".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[test]
    fn test_delete_user() {
        let svc = test_service();
        let user = register(&svc, "alice@example.com");

        svc.delete_user(user.id).unwrap();
        assert!(svc.get_user(user.id).is_err());
        assert!(svc.delete_user(user.id).is_err());
    }

    #[test]
    fn test_list_users_pagination() {
        let svc = test_service();
        for i in 0..3 {
            register(&svc, &format!("user{}@example.com", i));
        }

        let page = svc
            .list_users(&ListParams { limit: 2, offset: 0 })
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
    }
}
