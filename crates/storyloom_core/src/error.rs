//! Error types for the story protocol.

use storyloom_store::{EntryId, StoreError, StoryStatus};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in registry and chain operations.
///
/// Every failure is a typed value returned to the immediate caller; the
/// core never retries and never leaves partial state behind. After a
/// [`CoreError::Conflict`] the caller may re-fetch the head and resubmit
/// with the corrected previous id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No story matches the given access code or id.
    #[error("story not found")]
    NotFound,

    /// A story with this access code already exists.
    #[error("access code already exists: {code}")]
    DuplicateAccessCode {
        /// The canonical code that collided.
        code: String,
    },

    /// The supplied status is not one of active/completed/archived.
    #[error("invalid status: {status}")]
    InvalidStatus {
        /// The rejected status value.
        status: String,
    },

    /// A required field is missing or malformed, or an update names no
    /// fields to change.
    #[error("bad request: {message}")]
    BadRequest {
        /// Description of the problem.
        message: String,
    },

    /// The caller lacks the edit code required for this operation.
    #[error("forbidden: {message}")]
    Forbidden {
        /// Description of the refusal.
        message: String,
    },

    /// The story no longer accepts contributions.
    #[error("this story is {status}: no more contributions allowed")]
    StoryNotActive {
        /// The story's current status.
        status: StoryStatus,
    },

    /// No author name was supplied.
    #[error("author name is required to contribute")]
    MissingAuthor,

    /// The entry text is outside the configured length bounds.
    #[error("text must be between {min} and {max} characters")]
    InvalidText {
        /// Minimum allowed length.
        min: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// The story has reached its configured entry capacity.
    #[error("this story has reached its maximum of {max} entries")]
    CapacityReached {
        /// The configured capacity.
        max: u32,
    },

    /// The caller's claimed chain position is stale: another append
    /// committed first. Carries the actual head so the caller can
    /// resynchronize and retry.
    #[error("someone already added the next part; latest entry is {latest:?}")]
    Conflict {
        /// The entry that is actually the head now, if any.
        latest: Option<EntryId>,
    },

    /// The store failed in a way that is not part of the protocol.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}
