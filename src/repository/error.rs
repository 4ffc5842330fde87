// ==========================================
// Salesbook - repository error types
// ==========================================

use thiserror::Error;

/// Storage layer errors. Unique-constraint violations get their own
/// variant so callers can retry code generation instead of failing
/// the whole row.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(rusqlite::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("data error: {0}")]
    Data(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RepositoryError::UniqueViolation(
                    msg.clone().unwrap_or_else(|| e.to_string()),
                )
            }
            _ => RepositoryError::Database(err),
        }
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;
