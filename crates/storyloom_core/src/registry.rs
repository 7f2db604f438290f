//! Story registry: metadata and lifecycle.

use crate::code::canonical_code;
use crate::error::{CoreError, CoreResult};
use crate::limits::Limits;
use std::sync::Arc;
use std::time::SystemTime;
use storyloom_store::{StoreError, StoryRecord, StoryStatus, StoryStore};
use tracing::info;

/// Parameters for creating a story.
#[derive(Debug, Clone)]
pub struct CreateStory {
    /// Story title (required).
    pub title: String,
    /// Shared access code (required; normalized before storage).
    pub access_code: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional entry capacity; `None` means unbounded.
    pub max_entries: Option<u32>,
    /// Optional edit code granting limited update rights.
    pub edit_code: Option<String>,
}

impl CreateStory {
    /// Creates a request with just the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, access_code: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            access_code: access_code.into(),
            description: None,
            max_entries: None,
            edit_code: None,
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

/// A privileged update: any subset of the mutable story fields.
///
/// Status arrives as text and must parse to a known status; unknown
/// values fail with `InvalidStatus`.
#[derive(Debug, Clone, Default)]
pub struct StoryUpdate {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New status as text, if changing.
    pub status: Option<String>,
    /// New entry capacity, if changing.
    pub max_entries: Option<u32>,
    /// New edit code, if changing.
    pub edit_code: Option<String>,
}

impl StoryUpdate {
    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.max_entries.is_none()
            && self.edit_code.is_none()
    }
}

/// An edit-code-gated update: only description and status may change.
#[derive(Debug, Clone, Default)]
pub struct LimitedUpdate {
    /// New description, if changing.
    pub description: Option<String>,
    /// New status as text, if changing.
    pub status: Option<String>,
}

/// The story registry.
///
/// Owns story metadata and lifecycle transitions. Access and edit codes
/// are normalized to canonical form before every comparison and before
/// storage, so uniqueness is case-insensitive.
pub struct StoryRegistry {
    store: Arc<dyn StoryStore>,
    limits: Limits,
}

impl StoryRegistry {
    /// Creates a registry over the given store.
    pub fn new(store: Arc<dyn StoryStore>, limits: Limits) -> Self {
        Self { store, limits }
    }

    /// Creates a new story.
    ///
    /// # Errors
    ///
    /// - `BadRequest` if the title or access code is missing or a field
    ///   exceeds its length bound
    /// - `DuplicateAccessCode` if the normalized code is already taken
    pub fn create(&self, request: CreateStory) -> CoreResult<StoryRecord> {
        let title = request.title.trim().to_string();
        let code = canonical_code(&request.access_code);
        if title.is_empty() || code.is_empty() {
            return Err(CoreError::bad_request("title and access code are required"));
        }
        if title.chars().count() > self.limits.max_title_len {
            return Err(CoreError::bad_request(format!(
                "title must be at most {} characters",
                self.limits.max_title_len
            )));
        }

        let mut record = StoryRecord::new(title, code.clone());
        if let Some(description) = request.description {
            record.description = Some(self.checked_description(description)?);
        }
        if let Some(max) = request.max_entries {
            record.max_entries = Some(checked_capacity(max)?);
        }
        if let Some(edit_code) = request.edit_code {
            record.edit_code = Some(checked_edit_code(&edit_code)?);
        }

        match self.store.insert_story(record.clone()) {
            Ok(()) => {
                info!(story = %record.id, "story created");
                Ok(record)
            }
            Err(StoreError::DuplicateKey { .. }) => {
                Err(CoreError::DuplicateAccessCode { code })
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Resolves a story by access code.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no story matches the normalized code.
    pub fn find_by_access_code(&self, code: &str) -> CoreResult<StoryRecord> {
        self.store
            .story_by_access_code(&canonical_code(code))?
            .ok_or(CoreError::NotFound)
    }

    /// Returns all stories.
    pub fn list_all(&self) -> CoreResult<Vec<StoryRecord>> {
        Ok(self.store.list_stories()?)
    }

    /// Applies a privileged update to any subset of the mutable fields.
    ///
    /// The first transition to `completed` stamps `completed_at`; repeat
    /// transitions never overwrite it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no story matches the code
    /// - `BadRequest` if no field is supplied or a bound is exceeded
    /// - `InvalidStatus` if the status text is unknown
    pub fn update_full(&self, access_code: &str, update: StoryUpdate) -> CoreResult<StoryRecord> {
        if update.is_empty() {
            return Err(CoreError::bad_request("no fields to update"));
        }
        let mut story = self.find_by_access_code(access_code)?;

        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(CoreError::bad_request("title must not be blank"));
            }
            if title.chars().count() > self.limits.max_title_len {
                return Err(CoreError::bad_request(format!(
                    "title must be at most {} characters",
                    self.limits.max_title_len
                )));
            }
            story.title = title;
        }
        if let Some(description) = update.description {
            story.description = Some(self.checked_description(description)?);
        }
        if let Some(status) = update.status {
            apply_status(&mut story, &status)?;
        }
        if let Some(max) = update.max_entries {
            story.max_entries = Some(checked_capacity(max)?);
        }
        if let Some(edit_code) = update.edit_code {
            story.edit_code = Some(checked_edit_code(&edit_code)?);
        }

        self.store.update_story(story.clone())?;
        Ok(story)
    }

    /// Applies an edit-code-gated update to description and/or status.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no story matches the code
    /// - `Forbidden` if the story has no edit code configured or the
    ///   presented code does not match
    /// - `BadRequest` if neither field is supplied
    /// - `InvalidStatus` if the status text is unknown
    pub fn update_limited(
        &self,
        access_code: &str,
        edit_code: &str,
        update: LimitedUpdate,
    ) -> CoreResult<StoryRecord> {
        let mut story = self.find_by_access_code(access_code)?;

        let Some(configured) = story.edit_code.clone() else {
            return Err(CoreError::forbidden(
                "this story does not allow edit code access",
            ));
        };
        if canonical_code(edit_code) != configured {
            return Err(CoreError::forbidden("invalid edit code"));
        }

        if update.description.is_none() && update.status.is_none() {
            return Err(CoreError::bad_request(
                "nothing to update: supply a description or status",
            ));
        }
        if let Some(description) = update.description {
            story.description = Some(self.checked_description(description)?);
        }
        if let Some(status) = update.status {
            apply_status(&mut story, &status)?;
        }

        self.store.update_story(story.clone())?;
        Ok(story)
    }

    /// Deletes a story and all of its entries.
    ///
    /// Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no story matches the code.
    pub fn delete(&self, access_code: &str) -> CoreResult<usize> {
        let story = self.find_by_access_code(access_code)?;
        let removed = self.store.delete_story(story.id)?;
        info!(story = %story.id, entries = removed, "story deleted");
        Ok(removed)
    }

    fn checked_description(&self, description: String) -> CoreResult<String> {
        if description.chars().count() > self.limits.max_description_len {
            return Err(CoreError::bad_request(format!(
                "description must be at most {} characters",
                self.limits.max_description_len
            )));
        }
        Ok(description)
    }
}

/// Parses and applies a status change, stamping `completed_at` on the
/// first transition to `Completed` only.
fn apply_status(story: &mut StoryRecord, status: &str) -> CoreResult<()> {
    let parsed: StoryStatus = status.parse().map_err(|_| CoreError::InvalidStatus {
        status: status.trim().to_string(),
    })?;
    if parsed == StoryStatus::Completed && story.completed_at.is_none() {
        story.completed_at = Some(SystemTime::now());
    }
    story.status = parsed;
    Ok(())
}

fn checked_capacity(max: u32) -> CoreResult<u32> {
    if max == 0 {
        return Err(CoreError::bad_request("max entries must be positive"));
    }
    Ok(max)
}

fn checked_edit_code(raw: &str) -> CoreResult<String> {
    let code = canonical_code(raw);
    if code.is_empty() {
        return Err(CoreError::bad_request("edit code must not be blank"));
    }
    Ok(code)
}
