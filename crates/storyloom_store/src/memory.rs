//! In-memory store for testing and single-process deployments.

use crate::error::{StoreError, StoreResult};
use crate::record::{EntryRecord, StoryRecord};
use crate::store::{NewEntry, StoryStore};
use crate::types::{EntryId, SequenceNumber, StoryId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::SystemTime;

/// An in-memory story store.
///
/// This store keeps all data in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Single-process deployments that don't need persistence
///
/// # Thread Safety
///
/// All state sits behind a single `RwLock`, so the conditional append in
/// [`StoryStore::append_entry`] is a true compare-and-swap: the head check
/// and the insert happen under one write lock and no interleaving between
/// them is possible.
///
/// # Example
///
/// ```rust
/// use storyloom_store::{InMemoryStore, StoryRecord, StoryStore};
///
/// let store = InMemoryStore::new();
/// let story = StoryRecord::new("Night Shift", "NIGHT1");
/// store.insert_story(story.clone()).unwrap();
/// assert!(store.story_by_access_code("NIGHT1").unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Stories by id, with insertion order tracked separately.
    stories: HashMap<StoryId, StoryRecord>,
    story_order: Vec<StoryId>,
    /// Access code -> story id, the unique index.
    by_code: HashMap<String, StoryId>,
    /// All entries in append order; sequence is strictly increasing.
    entries: Vec<EntryRecord>,
    next_seq: SequenceNumber,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stories in the store.
    #[must_use]
    pub fn story_count(&self) -> usize {
        self.inner.read().stories.len()
    }

    /// Returns the total number of entries across all stories.
    #[must_use]
    pub fn total_entry_count(&self) -> usize {
        self.inner.read().entries.len()
    }
}

impl StoryStore for InMemoryStore {
    fn insert_story(&self, record: StoryRecord) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if inner.by_code.contains_key(&record.access_code) {
            return Err(StoreError::duplicate_key(&record.access_code));
        }
        inner.by_code.insert(record.access_code.clone(), record.id);
        inner.story_order.push(record.id);
        inner.stories.insert(record.id, record);
        Ok(())
    }

    fn story_by_id(&self, id: StoryId) -> StoreResult<Option<StoryRecord>> {
        Ok(self.inner.read().stories.get(&id).cloned())
    }

    fn story_by_access_code(&self, code: &str) -> StoreResult<Option<StoryRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .by_code
            .get(code)
            .and_then(|id| inner.stories.get(id))
            .cloned())
    }

    fn list_stories(&self) -> StoreResult<Vec<StoryRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .story_order
            .iter()
            .filter_map(|id| inner.stories.get(id))
            .cloned()
            .collect())
    }

    fn update_story(&self, record: StoryRecord) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.stories.contains_key(&record.id) {
            return Err(StoreError::StoryNotFound { id: record.id });
        }
        inner.stories.insert(record.id, record);
        Ok(())
    }

    fn delete_story(&self, id: StoryId) -> StoreResult<usize> {
        let mut inner = self.inner.write();
        let Some(record) = inner.stories.remove(&id) else {
            return Err(StoreError::StoryNotFound { id });
        };
        inner.by_code.remove(&record.access_code);
        inner.story_order.retain(|s| *s != id);
        let before = inner.entries.len();
        inner.entries.retain(|e| e.story_id != id);
        Ok(before - inner.entries.len())
    }

    fn entry_by_id(&self, id: EntryId) -> StoreResult<Option<EntryRecord>> {
        Ok(self
            .inner
            .read()
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    fn entries_for_story(&self, story_id: StoryId) -> StoreResult<Vec<EntryRecord>> {
        // `entries` is in append order, which is sequence order.
        Ok(self
            .inner
            .read()
            .entries
            .iter()
            .filter(|e| e.story_id == story_id)
            .cloned()
            .collect())
    }

    fn latest_entry(&self, story_id: StoryId) -> StoreResult<Option<EntryRecord>> {
        Ok(self
            .inner
            .read()
            .entries
            .iter()
            .rev()
            .find(|e| e.story_id == story_id)
            .cloned())
    }

    fn entry_count(&self, story_id: StoryId) -> StoreResult<usize> {
        Ok(self
            .inner
            .read()
            .entries
            .iter()
            .filter(|e| e.story_id == story_id)
            .count())
    }

    fn append_entry(
        &self,
        entry: NewEntry,
        expected_head: Option<EntryId>,
    ) -> StoreResult<EntryRecord> {
        let mut inner = self.inner.write();
        if !inner.stories.contains_key(&entry.story_id) {
            return Err(StoreError::StoryNotFound { id: entry.story_id });
        }

        let latest = inner
            .entries
            .iter()
            .rev()
            .find(|e| e.story_id == entry.story_id)
            .map(|e| e.id);
        if latest != expected_head {
            return Err(StoreError::HeadSuperseded { latest });
        }

        let seq = inner.next_seq;
        inner.next_seq = seq.next();
        let record = EntryRecord {
            id: EntryId::new(),
            story_id: entry.story_id,
            author: entry.author,
            text: entry.text,
            contact: entry.contact,
            previous_entry_id: entry.previous_entry_id,
            sequence: seq,
            created_at: SystemTime::now(),
        };
        inner.entries.push(record.clone());
        Ok(record)
    }
}
