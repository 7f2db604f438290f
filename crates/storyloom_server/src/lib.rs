//! # Storyloom Server
//!
//! Reference service layer for Storyloom.
//!
//! This crate provides the plumbing around the core append protocol:
//! - Admin-key gate for privileged operations (create, update, delete)
//! - Per-story append rate limiting (fixed cooldown window)
//! - Request handlers with wire-facing DTOs
//! - Error-to-status-code mapping
//!
//! # Architecture
//!
//! [`StoryServer`] wires a [`storyloom_core::StoryRegistry`] and
//! [`storyloom_core::ChainManager`] over a shared
//! [`storyloom_core::StoryStore`] and exposes one method per endpoint.
//! The server is transport-agnostic: an HTTP layer maps routes onto these
//! methods and [`ServerError::status_code`] onto response statuses.
//!
//! # Access control
//!
//! Three layers, all of which must independently hold:
//! 1. The admin gate guards privileged operations with a shared secret
//! 2. The access code resolves a story and refuses contributions to
//!    non-active stories before the chain manager runs
//! 3. The chain manager re-validates existence and status itself
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use storyloom_server::{CreateStoryRequest, ServerConfig, StoryServer, SubmitEntryRequest};
//! use storyloom_store::InMemoryStore;
//!
//! let server = StoryServer::new(
//!     ServerConfig::new().with_admin_key("keep-me-secret"),
//!     Arc::new(InMemoryStore::new()),
//! );
//!
//! server
//!     .create_story(
//!         Some("keep-me-secret"),
//!         CreateStoryRequest {
//!             title: "Campfire Tale".into(),
//!             access_code: "ember7".into(),
//!             description: None,
//!             max_entries: None,
//!             edit_code: None,
//!         },
//!     )
//!     .unwrap();
//!
//! let entry = server
//!     .submit_entry(SubmitEntryRequest {
//!         access_code: "EMBER7".into(),
//!         author: "ava".into(),
//!         text: "The fire burned low.".into(),
//!         contact: None,
//!         previous_entry_id: None,
//!     })
//!     .unwrap();
//! assert!(entry.previous_entry_id.is_none());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod auth;
mod config;
mod error;
mod handler;
mod ratelimit;
mod server;

pub use auth::AdminGate;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{
    CreateStoryRequest, EntryView, HandlerContext, LatestEntryView, LimitedUpdateRequest,
    RequestHandler, StoryDeleted, StorySummary, StoryView, StoryWithEntries, SubmitEntryRequest,
    UpdateStoryRequest,
};
pub use ratelimit::AppendLimiter;
pub use server::StoryServer;
