use dukehub_db::StoreError;
use thiserror::Error;

/// Caller-visible failures. None of these are fatal; a failed call leaves
/// every collection as it was.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    /// Covers both unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Post needs text or an image")]
    EmptyPost,

    #[error("Comment cannot be empty")]
    EmptyComment,

    #[error("Credential error: {0}")]
    Credential(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Stable variant name for the rendering layer.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateEmail => "DuplicateEmail",
            Self::DuplicateUsername => "DuplicateUsername",
            Self::InvalidCredentials => "InvalidCredentials",
            Self::NotFound(_) => "NotFound",
            Self::Unauthorized => "Unauthorized",
            Self::InvalidOperation(_) => "InvalidOperation",
            Self::EmptyPost => "EmptyPost",
            Self::EmptyComment => "EmptyComment",
            Self::Credential(_) => "Credential",
            Self::Store(_) => "Store",
        }
    }
}
