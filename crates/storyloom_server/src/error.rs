//! Error types for the service layer.

use std::time::Duration;
use storyloom_core::CoreError;
use thiserror::Error;

/// Result type for service operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// No credential was presented for a privileged operation.
    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    /// The presented credential was wrong.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// The story already accepted a contribution within the cooldown
    /// window.
    #[error("too many submissions: take your time to think about the next part")]
    RateLimited {
        /// How long until the next append is accepted.
        retry_after: Duration,
    },

    /// A registry or chain error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ServerError {
    /// Maps the error to an HTTP-style status code.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::AuthenticationRequired(_) => 401,
            Self::NotAuthorized(_) => 403,
            Self::RateLimited { .. } => 429,
            Self::Core(core) => match core {
                CoreError::NotFound => 404,
                CoreError::DuplicateAccessCode { .. }
                | CoreError::InvalidStatus { .. }
                | CoreError::BadRequest { .. }
                | CoreError::MissingAuthor
                | CoreError::InvalidText { .. } => 400,
                CoreError::Forbidden { .. }
                | CoreError::StoryNotActive { .. }
                | CoreError::CapacityReached { .. } => 403,
                CoreError::Conflict { .. } => 409,
                CoreError::Store(_) => 500,
            },
        }
    }

    /// Returns true if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Returns true if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
