use crate::model::Principal;
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Resolve a bearer token to the authenticated principal. Claims are
    /// read from the token alone; no DB round-trip, so a deleted user's
    /// access token keeps resolving until it expires.
    pub fn resolve(&self, bearer: &str) -> Result<Principal, AuthError> {
        let claims = self
            .decode_access(bearer)
            .map_err(|e| AuthError::Unauthorized(e.to_string()))?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AuthError::Unauthorized("Could not validate credentials".into()))?;

        Ok(Principal {
            user_id,
            permissions: claims.permissions,
        })
    }

    /// Require that the principal carries every listed permission. An
    /// empty requirement always passes.
    pub fn require_permissions(
        &self,
        principal: &Principal,
        required: &[&str],
    ) -> Result<(), AuthError> {
        if principal.has_permissions(required) {
            Ok(())
        } else {
            Err(AuthError::Forbidden("Not permitted".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{permission, RegisterRequest, ROLE_ADMIN};
    use crate::service::AuthConfig;
    use taskboard_sql::SqliteStore;

    fn test_service() -> std::sync::Arc<AuthService> {
        let sql = std::sync::Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    fn register(svc: &AuthService, email: &str) -> crate::model::User {
        svc.register(RegisterRequest {
            name: "Test".into(),
            email: email.into(),
            password: "secret".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_resolve_returns_principal() {
        let svc = test_service();
        let user = register(&svc, "alice@example.com");
        svc.assign_role(user.id, ROLE_ADMIN).unwrap();
        let tokens = svc.issue_tokens(&user).unwrap();

        let principal = svc.resolve(&tokens.access_token).unwrap();
        assert_eq!(principal.user_id, user.id);
        assert!(principal
            .permissions
            .contains(&permission::VIEW_ALL_USERS.to_string()));
    }

    #[test]
    fn test_resolve_rejects_garbage() {
        let svc = test_service();
        let err = svc.resolve("not-a-token").unwrap_err();
        match err {
            AuthError::Unauthorized(m) => assert_eq!(m, "Could not validate credentials"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_reports_expiry() {
        let svc = {
            let sql = std::sync::Arc::new(SqliteStore::open_in_memory().unwrap());
            AuthService::new(
                sql,
                AuthConfig {
                    access_token_ttl: -10,
                    ..Default::default()
                },
            )
            .unwrap()
        };
        let user = register(&svc, "alice@example.com");
        let tokens = svc.issue_tokens(&user).unwrap();

        let err = svc.resolve(&tokens.access_token).unwrap_err();
        match err {
            AuthError::Unauthorized(m) => assert_eq!(m, "Token has expired"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_require_permissions_subset() {
        let svc = test_service();
        let principal = Principal {
            user_id: 1,
            permissions: vec!["view_all_users".into(), "create_user".into()],
        };

        // Empty requirement passes for anyone.
        svc.require_permissions(&principal, &[]).unwrap();

        // A held subset passes, a missing permission fails the whole set.
        svc.require_permissions(&principal, &["view_all_users"])
            .unwrap();
        let err = svc
            .require_permissions(&principal, &["view_all_users", "delete_user"])
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));
    }

    #[test]
    fn test_resolve_uses_claims_not_db() {
        let svc = test_service();
        let user = register(&svc, "alice@example.com");
        let tokens = svc.issue_tokens(&user).unwrap();

        // The user is gone, but the stateless access token still resolves.
        svc.delete_user(user.id).unwrap();
        let principal = svc.resolve(&tokens.access_token).unwrap();
        assert_eq!(principal.user_id, user.id);
    }
}
