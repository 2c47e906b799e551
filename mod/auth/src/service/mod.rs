pub mod identity;
pub mod password;
pub mod role;
pub mod schema;
pub mod token;
pub mod user;

use std::sync::Arc;

use thiserror::Error;

use taskboard_sql::{SQLError, SQLStore};

/// Auth service error type.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    /// Map a storage failure, surfacing UNIQUE violations as the given
    /// domain conflict instead of an opaque 500.
    pub(crate) fn storage(e: SQLError, conflict_message: &str) -> Self {
        if e.is_constraint() {
            AuthError::Conflict(conflict_message.to_string())
        } else {
            AuthError::Storage(e.to_string())
        }
    }
}

impl From<SQLError> for AuthError {
    fn from(e: SQLError) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<AuthError> for taskboard_core::ServiceError {
    fn from(e: AuthError) -> Self {
        use taskboard_core::ServiceError;
        match e {
            AuthError::NotFound(m) => ServiceError::NotFound(m),
            AuthError::Conflict(m) => ServiceError::Conflict(m),
            AuthError::Validation(m) => ServiceError::Validation(m),
            AuthError::Unauthorized(m) => ServiceError::Unauthorized(m),
            AuthError::Forbidden(m) => ServiceError::PermissionDenied(m),
            AuthError::Storage(m) => ServiceError::Storage(m),
            AuthError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 15 min).
    pub access_token_ttl: i64,
    /// Refresh token lifetime in seconds (default: 7 days).
    pub refresh_token_ttl: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "taskboard-dev-secret-change-me".to_string(),
            access_token_ttl: 900,     // 15 min
            refresh_token_ttl: 604800, // 7 days
        }
    }
}

/// The Auth service. Holds the storage backend and configuration.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService, initializing the DB schema and seeding
    /// the well-known roles.
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Arc<Self>, AuthError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, config }))
    }

    /// Expose the shared SQL store so sibling modules can share one DB.
    pub fn sql(&self) -> &Arc<dyn SQLStore> {
        &self.sql
    }
}
