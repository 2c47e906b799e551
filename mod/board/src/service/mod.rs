pub mod access;
pub mod board;
pub mod invitation;
pub mod list;
pub mod membership;
pub mod schema;
pub mod task;

use std::sync::Arc;

use thiserror::Error;

use auth::service::{AuthError, AuthService};
use taskboard_sql::{SQLError, SQLStore};

/// Board service error type.
#[derive(Debug, Error)]
pub enum BoardError {
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

impl BoardError {
    /// Map a storage failure, surfacing UNIQUE violations as the given
    /// domain conflict instead of an opaque 500.
    pub(crate) fn storage(e: SQLError, conflict_message: &str) -> Self {
        if e.is_constraint() {
            BoardError::Conflict(conflict_message.to_string())
        } else {
            BoardError::Storage(e.to_string())
        }
    }
}

impl From<SQLError> for BoardError {
    fn from(e: SQLError) -> Self {
        BoardError::Storage(e.to_string())
    }
}

impl From<AuthError> for BoardError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(m) => BoardError::NotFound(m),
            AuthError::Conflict(m) => BoardError::Conflict(m),
            AuthError::Validation(m) => BoardError::Validation(m),
            AuthError::Unauthorized(m) => BoardError::Unauthorized(m),
            AuthError::Forbidden(m) => BoardError::Forbidden(m),
            AuthError::Storage(m) => BoardError::Storage(m),
            AuthError::Internal(m) => BoardError::Internal(m),
        }
    }
}

impl From<BoardError> for taskboard_core::ServiceError {
    fn from(e: BoardError) -> Self {
        use taskboard_core::ServiceError;
        match e {
            BoardError::NotFound(m) => ServiceError::NotFound(m),
            BoardError::Conflict(m) => ServiceError::Conflict(m),
            BoardError::Validation(m) => ServiceError::Validation(m),
            BoardError::Unauthorized(m) => ServiceError::Unauthorized(m),
            BoardError::Forbidden(m) => ServiceError::PermissionDenied(m),
            BoardError::Storage(m) => ServiceError::Storage(m),
            BoardError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

/// The Board service. Shares the auth service's SQL store so joins
/// against users and roles stay in one database, and keeps a handle on
/// the auth service itself for role lookups and permission gates.
pub struct BoardService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) auth: Arc<AuthService>,
}

impl BoardService {
    /// Create a new BoardService on top of an AuthService, initializing
    /// the board schema.
    pub fn new(auth: Arc<AuthService>) -> Result<Arc<Self>, BoardError> {
        let sql = auth.sql().clone();
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, auth }))
    }

    /// The auth service this board service authorizes against.
    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }
}
