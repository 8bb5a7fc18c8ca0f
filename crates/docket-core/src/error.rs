use thiserror::Error;

/// Result alias for core operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categorized core failures.
///
/// `Forbidden` is deliberately absent: authorization is decided by the
/// caller before the core is invoked. No rejected input ever degrades into
/// a best-effort fallback; it always surfaces as one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{entity} not found: '{id}'")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("storage failure")]
    Storage(#[source] anyhow::Error),
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "E2001",
            Self::InvalidInput { .. } => "E2002",
            Self::Storage(_) => "E5001",
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage(anyhow::Error::new(error))
    }
}
