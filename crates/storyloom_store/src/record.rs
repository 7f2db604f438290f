//! Story and entry records.

use crate::types::{EntryId, SequenceNumber, StoryId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;
use thiserror::Error;

/// Lifecycle status of a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    /// The story accepts new entries.
    Active,
    /// The story is finished; no more entries may be appended.
    Completed,
    /// The story is retired from view; no more entries may be appended.
    Archived,
}

impl StoryStatus {
    /// Returns the canonical lowercase name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown story status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for StoryStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A stored story.
///
/// The access code is the story's unique shared secret and must already be
/// in canonical form (trimmed, uppercased) when the record reaches the
/// store; the store enforces uniqueness but does not normalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    /// Unique story identifier.
    pub id: StoryId,
    /// Story title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Canonical access code, unique across all stories.
    pub access_code: String,
    /// Optional canonical edit code granting limited update rights.
    pub edit_code: Option<String>,
    /// Lifecycle status.
    pub status: StoryStatus,
    /// Maximum number of entries, or `None` for unbounded.
    pub max_entries: Option<u32>,
    /// When the story was created.
    pub created_at: SystemTime,
    /// When the story first transitioned to `Completed`. Set once.
    pub completed_at: Option<SystemTime>,
}

impl StoryRecord {
    /// Creates a new active story with a fresh id.
    #[must_use]
    pub fn new(title: impl Into<String>, access_code: impl Into<String>) -> Self {
        Self {
            id: StoryId::new(),
            title: title.into(),
            description: None,
            access_code: access_code.into(),
            edit_code: None,
            status: StoryStatus::Active,
            max_entries: None,
            created_at: SystemTime::now(),
            completed_at: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the entry capacity.
    #[must_use]
    pub const fn with_max_entries(mut self, max: u32) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Sets the edit code.
    #[must_use]
    pub fn with_edit_code(mut self, code: impl Into<String>) -> Self {
        self.edit_code = Some(code.into());
        self
    }
}

/// A stored story entry.
///
/// Entries are immutable once created. `previous_entry_id` links each
/// entry to the entry that was the chain head at the instant of insertion
/// (`None` for the first entry), and `sequence` is the store-assigned
/// total order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Unique entry identifier.
    pub id: EntryId,
    /// The story this entry belongs to.
    pub story_id: StoryId,
    /// Display name of the contributor.
    pub author: String,
    /// The contributed text.
    pub text: String,
    /// Optional contact address. Never exposed in public views.
    pub contact: Option<String>,
    /// The entry that was the head when this entry was appended.
    pub previous_entry_id: Option<EntryId>,
    /// Store-assigned ordering, strictly increasing.
    pub sequence: SequenceNumber,
    /// When the entry was created.
    pub created_at: SystemTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_roundtrip() {
        for status in [
            StoryStatus::Active,
            StoryStatus::Completed,
            StoryStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<StoryStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(
            "  Completed ".parse::<StoryStatus>().unwrap(),
            StoryStatus::Completed
        );
    }

    #[test]
    fn status_parse_rejects_unknown() {
        let err = "paused".parse::<StoryStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("paused".to_string()));
    }

    #[test]
    fn new_story_is_active() {
        let story = StoryRecord::new("Title", "CODE1");
        assert_eq!(story.status, StoryStatus::Active);
        assert!(story.completed_at.is_none());
        assert!(story.max_entries.is_none());
    }

    #[test]
    fn story_builder() {
        let story = StoryRecord::new("Title", "CODE1")
            .with_description("a tale")
            .with_max_entries(10)
            .with_edit_code("EDIT1");
        assert_eq!(story.description.as_deref(), Some("a tale"));
        assert_eq!(story.max_entries, Some(10));
        assert_eq!(story.edit_code.as_deref(), Some("EDIT1"));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&StoryStatus::Archived).unwrap();
        assert_eq!(json, "\"archived\"");
    }
}
