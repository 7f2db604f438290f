//! # Storyloom Core
//!
//! Story registry and entry chain manager for Storyloom.
//!
//! This crate implements the sequential-append consistency protocol of a
//! collaborative, turn-based story-writing service:
//!
//! - [`StoryRegistry`] owns story metadata (identity, access code, status,
//!   capacity, optional edit code) and lifecycle transitions
//! - [`ChainManager`] owns the append-only entry sequence of each story
//!   and enforces the linear-chain invariant via optimistic concurrency
//!
//! A client resolves a story by access code through the registry, then
//! attempts to append an entry naming the entry it believes is the current
//! head. The chain manager validates the claim against the actual head and
//! commits through the store's conditional append, so two racing appends
//! claiming the same head can never both succeed.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use storyloom_core::{AppendRequest, ChainManager, CreateStory, Limits, StoryRegistry};
//! use storyloom_store::InMemoryStore;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let registry = StoryRegistry::new(Arc::clone(&store) as _, Limits::default());
//! let chain = ChainManager::new(store as _, Limits::default());
//!
//! let story = registry
//!     .create(CreateStory::new("Campfire Tale", "ember7"))
//!     .unwrap();
//!
//! // First entry: the chain is empty, so no previous entry is claimed.
//! let first = chain
//!     .append(AppendRequest::new(story.id, "ava", "The fire burned low.", None))
//!     .unwrap();
//! assert_eq!(chain.head(story.id).unwrap().unwrap().id, first.id);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod code;
mod error;
mod limits;
mod registry;

pub use chain::{AppendRequest, ChainManager};
pub use code::canonical_code;
pub use error::{CoreError, CoreResult};
pub use limits::Limits;
pub use registry::{CreateStory, LimitedUpdate, StoryRegistry, StoryUpdate};

pub use storyloom_store::{
    EntryId, EntryRecord, SequenceNumber, StoryId, StoryRecord, StoryStatus, StoryStore,
};
