//! Error types for store operations.

use crate::types::{EntryId, StoryId};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint was violated on insert.
    #[error("duplicate key: {key}")]
    DuplicateKey {
        /// The conflicting key value.
        key: String,
    },

    /// The referenced story does not exist.
    #[error("story not found: {id}")]
    StoryNotFound {
        /// The story id that was not found.
        id: StoryId,
    },

    /// A conditional append lost the race: the chain head moved past the
    /// expected entry before the write committed.
    #[error("chain head superseded: latest is {latest:?}")]
    HeadSuperseded {
        /// The entry that is actually the head now, if any.
        latest: Option<EntryId>,
    },

    /// The backend failed in a way that is not a logic error.
    #[error("backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl StoreError {
    /// Creates a duplicate key error.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_display() {
        let err = StoreError::duplicate_key("ABC123");
        assert_eq!(err.to_string(), "duplicate key: ABC123");
    }

    #[test]
    fn head_superseded_carries_latest() {
        let latest = EntryId::new();
        let err = StoreError::HeadSuperseded {
            latest: Some(latest),
        };
        assert!(err.to_string().contains("superseded"));
    }
}
