use thiserror::Error;

/// Failure taxonomy of the run repository. Every variant surfaces to the
/// caller as-is; the repository never recovers internally and never turns a
/// failed write into a silent no-op. Only the REST layer maps these to
/// status codes.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("invalid run: {0}")]
    Validation(String),
    #[error("no run with id {0}")]
    NotFound(i64),
    #[error("a run with id {0} already exists")]
    DuplicateKey(i64),
    #[error("expected exactly one affected row for id {id}, got {affected}")]
    Inconsistency { id: i64, affected: usize },
    #[error("storage error: {0}")]
    Backend(#[from] rusqlite::Error),
}
