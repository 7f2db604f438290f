//! # Storyloom Store
//!
//! Durable store trait and implementations for Storyloom.
//!
//! This crate provides the lowest-level storage abstraction for Storyloom.
//! A [`StoryStore`] holds story records and their append-only entry chains
//! and exposes exactly the primitives the registry and chain manager need:
//!
//! - Unique-constraint-backed story insert (surfaces `DuplicateKey`)
//! - Point lookups by id and by canonical access code
//! - Entry queries ordered by a store-assigned sequence number
//! - Count-by-story for capacity checks
//! - Atomic cascading delete of a story and its entries
//! - A conditional entry append keyed on the expected chain head
//!
//! ## Design Principles
//!
//! - The store assigns ids, sequence numbers, and creation timestamps;
//!   callers never pick ordering themselves
//! - The conditional append is the compare-and-swap that keeps each
//!   story's chain linear under concurrent writers
//! - Implementations must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and single-process deployments
//!
//! ## Example
//!
//! ```rust
//! use storyloom_store::{InMemoryStore, NewEntry, StoryRecord, StoryStore};
//!
//! let store = InMemoryStore::new();
//! let story = StoryRecord::new("The Long Road", "ROAD42");
//! store.insert_story(story.clone()).unwrap();
//!
//! let entry = store
//!     .append_entry(NewEntry::first(story.id, "ava", "Once upon a midnight"), None)
//!     .unwrap();
//! assert_eq!(store.latest_entry(story.id).unwrap().unwrap().id, entry.id);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod record;
mod store;
mod types;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use record::{EntryRecord, StoryRecord, StoryStatus, UnknownStatus};
pub use store::{NewEntry, StoryStore};
pub use types::{EntryId, SequenceNumber, StoryId};
