use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("connection error: {0}")]
    Connection(String),

    /// A UNIQUE or other constraint rejected the statement. Kept as a
    /// distinct variant so callers can turn it into a domain conflict
    /// instead of a storage failure.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A statement inside a batch matched no rows, so the whole batch was
    /// rolled back. Guarded writes use this to detect a lost race.
    #[error("statement affected no rows: {0}")]
    NoEffect(String),
}

impl SQLError {
    /// True if this error came from a UNIQUE/PRIMARY KEY constraint.
    pub fn is_constraint(&self) -> bool {
        matches!(self, SQLError::Constraint(_))
    }

    /// True if a batch was rolled back because a statement matched no rows.
    pub fn is_no_effect(&self) -> bool {
        matches!(self, SQLError::NoEffect(_))
    }
}
