use thiserror::Error;

/// Errors surfaced by the service layer. Repos stay on `sqlx::Result`;
/// anything that crosses a service boundary is lifted into this enum.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied an invalid (as opposed to absent) value. Never
    /// retried, never silently defaulted.
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// A singleton lookup matched zero rows.
    #[error("no matching activist")]
    NotFound,

    /// A singleton lookup matched more than one row. Indicates a
    /// data-integrity bug; surfaced instead of picking one.
    #[error("expected exactly one activist, found {0}")]
    Ambiguous(usize),

    /// Store failure. The enclosing transaction (if any) has been rolled
    /// back, so the whole operation is safe to retry.
    #[error("database error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
