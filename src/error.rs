use thiserror::Error;

/// Failure taxonomy for the mock identity layer.
///
/// Nothing here is fatal: every variant leaves the application in its
/// previously valid state. Corrupt persisted values are recovered silently
/// on read and never surface as `Storage` — that variant covers rejected
/// writes only.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed form input, surfaced inline next to the field.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Unknown identifier or wrong password, surfaced as a blocking notice.
    #[error("{0}")]
    Auth(String),

    /// Registration against an email that already has an account.
    #[error("an account with email {0} already exists")]
    Duplicate(String),

    /// The backing store rejected a write.
    #[error("storage failure: {0}")]
    Storage(anyhow::Error),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
