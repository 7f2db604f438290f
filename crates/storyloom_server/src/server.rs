//! Main story server facade.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{
    CreateStoryRequest, EntryView, HandlerContext, LatestEntryView, LimitedUpdateRequest,
    RequestHandler, StoryDeleted, StoryView, StoryWithEntries, SubmitEntryRequest,
    UpdateStoryRequest,
};
use std::sync::Arc;
use storyloom_core::StoryStore;

/// The story server.
///
/// Wires the registry, chain manager, rate limiter, and admin gate over a
/// shared store and exposes one method per endpoint. An HTTP layer maps
/// routes onto these methods and [`crate::ServerError::status_code`] onto
/// response statuses; the server itself is transport-agnostic.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use storyloom_server::{ServerConfig, StoryServer};
/// use storyloom_store::InMemoryStore;
///
/// let config = ServerConfig::new().with_admin_key("keep-me-secret");
/// let server = StoryServer::new(config, Arc::new(InMemoryStore::new()));
/// ```
pub struct StoryServer {
    handler: RequestHandler,
}

impl StoryServer {
    /// Creates a new story server over the given store.
    pub fn new(config: ServerConfig, store: Arc<dyn StoryStore>) -> Self {
        let context = Arc::new(HandlerContext::new(config, store));
        let handler = RequestHandler::new(context);
        Self { handler }
    }

    /// Creates a story (privileged).
    pub fn create_story(
        &self,
        admin_key: Option<&str>,
        request: CreateStoryRequest,
    ) -> ServerResult<StoryView> {
        self.handler.create_story(admin_key, request)
    }

    /// Lists all stories (privileged).
    pub fn list_stories(&self, admin_key: Option<&str>) -> ServerResult<Vec<StoryView>> {
        self.handler.list_stories(admin_key)
    }

    /// Returns a story and its full chain, by access code.
    pub fn story_entries(&self, access_code: &str) -> ServerResult<StoryWithEntries> {
        self.handler.story_entries(access_code)
    }

    /// Returns a story and its current head, by access code.
    pub fn latest_entry(&self, access_code: &str) -> ServerResult<LatestEntryView> {
        self.handler.latest_entry(access_code)
    }

    /// Submits a new entry.
    pub fn submit_entry(&self, request: SubmitEntryRequest) -> ServerResult<EntryView> {
        self.handler.submit_entry(request)
    }

    /// Applies a privileged story update.
    pub fn update_story(
        &self,
        admin_key: Option<&str>,
        access_code: &str,
        request: UpdateStoryRequest,
    ) -> ServerResult<StoryView> {
        self.handler.update_story(admin_key, access_code, request)
    }

    /// Applies an edit-code-gated update.
    pub fn update_story_limited(
        &self,
        access_code: &str,
        edit_code: &str,
        request: LimitedUpdateRequest,
    ) -> ServerResult<StoryView> {
        self.handler
            .update_story_limited(access_code, edit_code, request)
    }

    /// Deletes a story and its entries (privileged).
    pub fn delete_story(
        &self,
        admin_key: Option<&str>,
        access_code: &str,
    ) -> ServerResult<StoryDeleted> {
        self.handler.delete_story(admin_key, access_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use storyloom_store::InMemoryStore;

    fn server() -> StoryServer {
        let config = ServerConfig::new()
            .with_admin_key("secret")
            .with_append_cooldown(Duration::ZERO);
        StoryServer::new(config, Arc::new(InMemoryStore::new()))
    }

    #[test]
    fn end_to_end_story_lifecycle() {
        let server = server();

        let story = server
            .create_story(
                Some("secret"),
                CreateStoryRequest {
                    title: "Night Watch".to_string(),
                    access_code: "watch1".to_string(),
                    description: Some("A story told in turns.".to_string()),
                    max_entries: Some(3),
                    edit_code: None,
                },
            )
            .unwrap();
        assert_eq!(story.access_code, "WATCH1");

        let first = server
            .submit_entry(SubmitEntryRequest {
                access_code: "watch1".to_string(),
                author: "ava".to_string(),
                text: "The bell rang twice.".to_string(),
                contact: None,
                previous_entry_id: None,
            })
            .unwrap();

        let second = server
            .submit_entry(SubmitEntryRequest {
                access_code: "WATCH1".to_string(),
                author: "ben".to_string(),
                text: "Nobody came to answer.".to_string(),
                contact: None,
                previous_entry_id: Some(first.id),
            })
            .unwrap();
        assert_eq!(second.previous_entry_id, Some(first.id));

        server
            .update_story(
                Some("secret"),
                "WATCH1",
                UpdateStoryRequest {
                    status: Some("completed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        // Completed stories still read, but refuse new entries.
        assert_eq!(server.story_entries("WATCH1").unwrap().entries.len(), 2);
        let err = server
            .submit_entry(SubmitEntryRequest {
                access_code: "WATCH1".to_string(),
                author: "cam".to_string(),
                text: "One more for the road.".to_string(),
                contact: None,
                previous_entry_id: Some(second.id),
            })
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let deleted = server.delete_story(Some("secret"), "WATCH1").unwrap();
        assert_eq!(deleted.entries_removed, 2);
    }

    #[test]
    fn list_requires_admin() {
        let server = server();
        assert!(server.list_stories(None).is_err());
        assert!(server.list_stories(Some("secret")).unwrap().is_empty());
    }
}
