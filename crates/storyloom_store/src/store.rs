//! Store trait definition.

use crate::error::StoreResult;
use crate::record::{EntryRecord, StoryRecord};
use crate::types::{EntryId, StoryId};

/// A new entry to be appended to a story's chain.
///
/// Ids, sequence numbers, and timestamps are assigned by the store on a
/// successful append, never by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    /// The story to append to.
    pub story_id: StoryId,
    /// Display name of the contributor.
    pub author: String,
    /// The contributed text.
    pub text: String,
    /// Optional contact address.
    pub contact: Option<String>,
    /// The entry the caller believes is the current head, or `None` for
    /// the first entry of a story.
    pub previous_entry_id: Option<EntryId>,
}

impl NewEntry {
    /// Creates a new entry claiming `previous` as the current head.
    #[must_use]
    pub fn new(
        story_id: StoryId,
        author: impl Into<String>,
        text: impl Into<String>,
        previous: Option<EntryId>,
    ) -> Self {
        Self {
            story_id,
            author: author.into(),
            text: text.into(),
            contact: None,
            previous_entry_id: previous,
        }
    }

    /// Creates the first entry of a story (no previous entry).
    #[must_use]
    pub fn first(story_id: StoryId, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(story_id, author, text, None)
    }

    /// Sets the contact address.
    #[must_use]
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

/// A durable store for stories and their entry chains.
///
/// Stores hold the true state of every chain; server processes are
/// stateless on top of them. The trait is deliberately small: it exposes
/// only the primitives the registry and chain manager need.
///
/// # Invariants
///
/// - `insert_story` enforces access-code uniqueness and surfaces
///   violations as `DuplicateKey`
/// - `entries_for_story` returns entries in ascending sequence order
/// - `append_entry` is atomic with respect to other appends on the same
///   store: it commits only if the story's latest entry matches
///   `expected_head`, and fails with `HeadSuperseded` otherwise
/// - `delete_story` removes the story and every entry referencing it in
///   one atomic step
/// - Implementations must be `Send + Sync` for concurrent access
pub trait StoryStore: Send + Sync {
    /// Inserts a new story.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if a story with the same access code
    /// already exists.
    fn insert_story(&self, record: StoryRecord) -> StoreResult<()>;

    /// Looks up a story by id.
    fn story_by_id(&self, id: StoryId) -> StoreResult<Option<StoryRecord>>;

    /// Looks up a story by its canonical access code.
    ///
    /// The code must already be normalized; the store compares exactly.
    fn story_by_access_code(&self, code: &str) -> StoreResult<Option<StoryRecord>>;

    /// Returns all stories, in creation order.
    fn list_stories(&self) -> StoreResult<Vec<StoryRecord>>;

    /// Replaces an existing story record.
    ///
    /// The access code of a story is immutable; implementations may
    /// assume `record.access_code` matches the stored value.
    ///
    /// # Errors
    ///
    /// Returns `StoryNotFound` if no story with `record.id` exists.
    fn update_story(&self, record: StoryRecord) -> StoreResult<()>;

    /// Deletes a story and all of its entries atomically.
    ///
    /// Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns `StoryNotFound` if no story with `id` exists.
    fn delete_story(&self, id: StoryId) -> StoreResult<usize>;

    /// Looks up an entry by id.
    fn entry_by_id(&self, id: EntryId) -> StoreResult<Option<EntryRecord>>;

    /// Returns all entries of a story in ascending sequence order.
    fn entries_for_story(&self, story_id: StoryId) -> StoreResult<Vec<EntryRecord>>;

    /// Returns the entry with the highest sequence for a story, if any.
    fn latest_entry(&self, story_id: StoryId) -> StoreResult<Option<EntryRecord>>;

    /// Returns the number of entries in a story.
    fn entry_count(&self, story_id: StoryId) -> StoreResult<usize>;

    /// Appends an entry if and only if the story's current latest entry
    /// matches `expected_head`.
    ///
    /// This is the compare-and-swap at the heart of the append protocol:
    /// the head check and the insert happen under one write lock (or one
    /// conditional write in a remote backend), so two racing appends
    /// claiming the same head cannot both commit.
    ///
    /// On success the store assigns the entry id, sequence number, and
    /// creation timestamp, and returns the stored record.
    ///
    /// # Errors
    ///
    /// - `HeadSuperseded` if the latest entry no longer matches
    ///   `expected_head`; carries the actual latest entry id
    /// - `StoryNotFound` if the story does not exist
    fn append_entry(
        &self,
        entry: NewEntry,
        expected_head: Option<EntryId>,
    ) -> StoreResult<EntryRecord>;
}
