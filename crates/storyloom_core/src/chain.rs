//! Entry chain manager: the sequential-append protocol.

use crate::error::{CoreError, CoreResult};
use crate::limits::Limits;
use std::sync::Arc;
use storyloom_store::{
    EntryId, EntryRecord, NewEntry, StoreError, StoryId, StoryRecord, StoryStatus, StoryStore,
};
use tracing::debug;

/// An append attempt against a story's chain.
#[derive(Debug, Clone)]
pub struct AppendRequest {
    /// The story to append to.
    pub story_id: StoryId,
    /// Display name of the contributor.
    pub author: String,
    /// The contributed text.
    pub text: String,
    /// Optional contact address.
    pub contact: Option<String>,
    /// The entry the caller believes is the current head, or `None` if
    /// the caller believes the chain is empty.
    pub claimed_previous: Option<EntryId>,
}

impl AppendRequest {
    /// Creates an append request.
    #[must_use]
    pub fn new(
        story_id: StoryId,
        author: impl Into<String>,
        text: impl Into<String>,
        claimed_previous: Option<EntryId>,
    ) -> Self {
        Self {
            story_id,
            author: author.into(),
            text: text.into(),
            contact: None,
            claimed_previous,
        }
    }

    /// Sets the contact address.
    #[must_use]
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

/// The entry chain manager.
///
/// Each story's entries form a singly linked chain: every non-first entry
/// names the entry that was the head at the instant it was inserted. The
/// chain has one mutable pointer, the head, and [`ChainManager::append`]
/// advances it with optimistic concurrency: the caller claims the head it
/// last saw, and a stale claim fails with [`CoreError::Conflict`] carrying
/// the actual head so the caller can resynchronize and retry.
///
/// The claim is validated twice: once against a fresh read (to fail fast
/// with a well-formed conflict) and once inside the store's conditional
/// append, which performs the head check and the insert atomically. A
/// racing append that slips between the two is therefore still rejected.
pub struct ChainManager {
    store: Arc<dyn StoryStore>,
    limits: Limits,
}

impl ChainManager {
    /// Creates a chain manager over the given store.
    pub fn new(store: Arc<dyn StoryStore>, limits: Limits) -> Self {
        Self { store, limits }
    }

    /// Returns the head of a story's chain, or `None` if it is empty.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the story does not exist.
    pub fn head(&self, story_id: StoryId) -> CoreResult<Option<EntryRecord>> {
        self.require_story(story_id)?;
        Ok(self.store.latest_entry(story_id)?)
    }

    /// Returns all entries of a story in chain order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the story does not exist.
    pub fn list_chain(&self, story_id: StoryId) -> CoreResult<Vec<EntryRecord>> {
        self.require_story(story_id)?;
        Ok(self.store.entries_for_story(story_id)?)
    }

    /// Appends an entry to a story's chain.
    ///
    /// The request must name the entry the caller believes is the current
    /// head (`None` for an empty chain). If another append committed since
    /// the caller last read the head, the attempt fails with `Conflict`
    /// and the actual head id, and the caller may retry with the
    /// corrected claim.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the story does not exist
    /// - `StoryNotActive` if the story is completed or archived
    /// - `MissingAuthor` / `BadRequest` for author problems
    /// - `InvalidText` if the text is outside the length bounds
    /// - `BadRequest` if the contact address is malformed
    /// - `CapacityReached` if the story is at its entry limit
    /// - `Conflict` if the claimed head is stale
    pub fn append(&self, request: AppendRequest) -> CoreResult<EntryRecord> {
        let story = self.require_story(request.story_id)?;
        if story.status != StoryStatus::Active {
            return Err(CoreError::StoryNotActive {
                status: story.status,
            });
        }

        let author = request.author.trim().to_string();
        if author.is_empty() {
            return Err(CoreError::MissingAuthor);
        }
        if author.chars().count() < self.limits.min_author_len
            || author.chars().count() > self.limits.max_author_len
        {
            return Err(CoreError::bad_request(format!(
                "author name must be between {} and {} characters",
                self.limits.min_author_len, self.limits.max_author_len
            )));
        }

        let text_len = request.text.chars().count();
        if text_len < self.limits.min_text_len || text_len > self.limits.max_text_len {
            return Err(CoreError::InvalidText {
                min: self.limits.min_text_len,
                max: self.limits.max_text_len,
            });
        }

        let contact = request.contact.map(|c| checked_contact(&c)).transpose()?;

        if let Some(max) = story.max_entries {
            let count = self.store.entry_count(story.id)?;
            if count >= max as usize {
                return Err(CoreError::CapacityReached { max });
            }
        }

        // Fast-path claim check against a fresh head read. The store's
        // conditional append re-validates atomically, so an append that
        // lands between this read and the write is still rejected.
        let latest = self.store.latest_entry(story.id)?.map(|e| e.id);
        if latest != request.claimed_previous {
            debug!(story = %story.id, ?latest, claimed = ?request.claimed_previous, "stale append claim");
            return Err(CoreError::Conflict { latest });
        }

        let mut entry = NewEntry::new(story.id, author, request.text, request.claimed_previous);
        entry.contact = contact;
        match self.store.append_entry(entry, request.claimed_previous) {
            Ok(record) => Ok(record),
            Err(StoreError::HeadSuperseded { latest }) => {
                debug!(story = %story.id, ?latest, "append lost the race");
                Err(CoreError::Conflict { latest })
            }
            Err(other) => Err(other.into()),
        }
    }

    fn require_story(&self, story_id: StoryId) -> CoreResult<StoryRecord> {
        self.store.story_by_id(story_id)?.ok_or(CoreError::NotFound)
    }
}

/// Normalizes and shape-checks a contact address (trim, lowercase, must
/// look like an email).
fn checked_contact(raw: &str) -> CoreResult<String> {
    let contact = raw.trim().to_lowercase();
    let valid = match contact.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !contact.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(CoreError::bad_request("contact address is not a valid email"));
    }
    Ok(contact)
}
