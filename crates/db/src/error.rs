use unievent_core::error::CoreError;

/// Failure of a repository operation that checks domain rules inside its
/// transaction.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
