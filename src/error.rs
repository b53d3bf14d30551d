use thiserror::Error;
use uuid::Uuid;

/// StoreError
///
/// Failures raised by the collaborators this crate talks to (the account store and
/// the audit sink). They are never swallowed: every operation propagates them to
/// the caller unchanged, without retries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying Postgres driver reported a failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store rejected a record because its username is already taken.
    #[error("username '{0}' already exists")]
    Duplicate(String),

    /// The store (or sink) could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// HashError
///
/// Raised when a hasher cannot produce a hash. The legacy SHA-256 scheme is total
/// and never returns it; the Argon2 scheme can fail on parameter or salt errors.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(pub String);

/// AccountError
///
/// The error surface of `LocalAccountService`.
///
/// Only two *domain* failures exist: `InvalidInput` (a required argument was empty or
/// whitespace) and `NotFound` (raised by `change_password` only). Unknown usernames and
/// wrong passwords are **not** errors, `validate` reports them with `None`.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{field} must not be empty")]
    InvalidInput { field: &'static str },

    #[error("local account with id '{0}' not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

impl AccountError {
    /// Shorthand used by the argument guards.
    pub(crate) fn invalid(field: &'static str) -> Self {
        AccountError::InvalidInput { field }
    }
}
