//! Request handlers and wire-facing DTOs.

use crate::auth::AdminGate;
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::ratelimit::AppendLimiter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use storyloom_core::{
    AppendRequest, ChainManager, CoreError, CreateStory, EntryId, EntryRecord, LimitedUpdate,
    StoryId, StoryRecord, StoryRegistry, StoryStatus, StoryStore, StoryUpdate,
};
use tracing::info;

/// Request body for creating a story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStoryRequest {
    /// Story title.
    pub title: String,
    /// Shared access code.
    pub access_code: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional entry capacity.
    #[serde(default)]
    pub max_entries: Option<u32>,
    /// Optional edit code.
    #[serde(default)]
    pub edit_code: Option<String>,
}

/// Request body for submitting an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitEntryRequest {
    /// Access code naming the story.
    pub access_code: String,
    /// Contributor display name.
    pub author: String,
    /// The contributed text.
    pub text: String,
    /// Optional contact address.
    #[serde(default)]
    pub contact: Option<String>,
    /// The entry the caller believes is the current head.
    #[serde(default)]
    pub previous_entry_id: Option<EntryId>,
}

/// Request body for a privileged story update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStoryRequest {
    /// New title, if changing.
    #[serde(default)]
    pub title: Option<String>,
    /// New description, if changing.
    #[serde(default)]
    pub description: Option<String>,
    /// New status as text, if changing.
    #[serde(default)]
    pub status: Option<String>,
    /// New entry capacity, if changing.
    #[serde(default)]
    pub max_entries: Option<u32>,
    /// New edit code, if changing.
    #[serde(default)]
    pub edit_code: Option<String>,
}

/// Request body for an edit-code-gated update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitedUpdateRequest {
    /// New description, if changing.
    #[serde(default)]
    pub description: Option<String>,
    /// New status as text, if changing.
    #[serde(default)]
    pub status: Option<String>,
}

/// Public view of a story. Never carries the edit code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryView {
    /// Story id.
    pub id: StoryId,
    /// Story title.
    pub title: String,
    /// Description, if any.
    pub description: Option<String>,
    /// Access code (shared with contributors by design).
    pub access_code: String,
    /// Lifecycle status.
    pub status: StoryStatus,
    /// Entry capacity, if bounded.
    pub max_entries: Option<u32>,
    /// Creation time, Unix millis.
    pub created_at: u64,
    /// Completion time, Unix millis, if completed.
    pub completed_at: Option<u64>,
}

impl From<&StoryRecord> for StoryView {
    fn from(record: &StoryRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            access_code: record.access_code.clone(),
            status: record.status,
            max_entries: record.max_entries,
            created_at: unix_millis(record.created_at),
            completed_at: record.completed_at.map(unix_millis),
        }
    }
}

/// Reader-facing summary of a story, shown alongside its entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorySummary {
    /// Story title.
    pub title: String,
    /// Description, if any.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: StoryStatus,
}

impl From<&StoryRecord> for StorySummary {
    fn from(record: &StoryRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status,
        }
    }
}

/// Public view of an entry. Never carries the contact address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryView {
    /// Entry id.
    pub id: EntryId,
    /// Contributor display name.
    pub author: String,
    /// The contributed text.
    pub text: String,
    /// Link to the previous entry, `None` for the first entry.
    pub previous_entry_id: Option<EntryId>,
    /// Store-assigned order.
    pub sequence: u64,
    /// Creation time, Unix millis.
    pub created_at: u64,
}

impl From<&EntryRecord> for EntryView {
    fn from(record: &EntryRecord) -> Self {
        Self {
            id: record.id,
            author: record.author.clone(),
            text: record.text.clone(),
            previous_entry_id: record.previous_entry_id,
            sequence: record.sequence.as_u64(),
            created_at: unix_millis(record.created_at),
        }
    }
}

/// A story together with its full chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryWithEntries {
    /// Story summary.
    pub story: StorySummary,
    /// Entries in chain order.
    pub entries: Vec<EntryView>,
}

/// A story together with its current head.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestEntryView {
    /// Story summary.
    pub story: StorySummary,
    /// The head entry, or `None` if the chain is empty.
    pub latest_entry: Option<EntryView>,
}

/// Result of a cascading story delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDeleted {
    /// Number of entries removed along with the story.
    pub entries_removed: usize,
}

fn unix_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// Shared state for request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    registry: StoryRegistry,
    chain: ChainManager,
    limiter: AppendLimiter,
    admin: AdminGate,
}

impl HandlerContext {
    /// Creates a context over the given store.
    pub fn new(config: ServerConfig, store: Arc<dyn StoryStore>) -> Self {
        let registry = StoryRegistry::new(Arc::clone(&store), config.limits.clone());
        let chain = ChainManager::new(store, config.limits.clone());
        let limiter = AppendLimiter::new(config.append_cooldown);
        let admin = AdminGate::new(config.admin_key.clone());
        Self {
            config,
            registry,
            chain,
            limiter,
            admin,
        }
    }
}

/// Handler for story service requests.
///
/// Each method corresponds to one endpoint of the service. Privileged
/// methods take the presented admin key; contributor methods take the
/// access code in the request itself.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Creates a story (privileged).
    pub fn create_story(
        &self,
        admin_key: Option<&str>,
        request: CreateStoryRequest,
    ) -> ServerResult<StoryView> {
        self.context.admin.authorize(admin_key)?;
        let mut create = CreateStory::new(request.title, request.access_code);
        create.description = request.description;
        create.max_entries = request.max_entries;
        create.edit_code = request.edit_code;
        let story = self.context.registry.create(create)?;
        Ok(StoryView::from(&story))
    }

    /// Lists all stories (privileged).
    pub fn list_stories(&self, admin_key: Option<&str>) -> ServerResult<Vec<StoryView>> {
        self.context.admin.authorize(admin_key)?;
        let stories = self.context.registry.list_all()?;
        Ok(stories.iter().map(StoryView::from).collect())
    }

    /// Returns a story and its full chain, by access code.
    pub fn story_entries(&self, access_code: &str) -> ServerResult<StoryWithEntries> {
        let story = self.context.registry.find_by_access_code(access_code)?;
        let entries = self.context.chain.list_chain(story.id)?;
        Ok(StoryWithEntries {
            story: StorySummary::from(&story),
            entries: entries.iter().map(EntryView::from).collect(),
        })
    }

    /// Returns a story and its current head, by access code.
    pub fn latest_entry(&self, access_code: &str) -> ServerResult<LatestEntryView> {
        let story = self.context.registry.find_by_access_code(access_code)?;
        let latest = self.context.chain.head(story.id)?;
        Ok(LatestEntryView {
            story: StorySummary::from(&story),
            latest_entry: latest.as_ref().map(EntryView::from),
        })
    }

    /// Submits a new entry.
    ///
    /// Resolves the access code, gates on story status and the per-story
    /// cooldown, then runs the chain manager's append protocol. The
    /// cooldown is armed only when the append commits.
    pub fn submit_entry(&self, request: SubmitEntryRequest) -> ServerResult<EntryView> {
        let story = self
            .context
            .registry
            .find_by_access_code(&request.access_code)?;
        // The chain manager re-checks status; both gates must hold.
        if story.status != StoryStatus::Active {
            return Err(CoreError::StoryNotActive {
                status: story.status,
            }
            .into());
        }
        self.context.limiter.check(story.id)?;

        let mut append = AppendRequest::new(
            story.id,
            request.author,
            request.text,
            request.previous_entry_id,
        );
        append.contact = request.contact;
        let entry = self.context.chain.append(append)?;
        self.context.limiter.record(story.id);
        info!(story = %story.id, entry = %entry.id, "entry accepted");
        Ok(EntryView::from(&entry))
    }

    /// Applies a privileged story update.
    pub fn update_story(
        &self,
        admin_key: Option<&str>,
        access_code: &str,
        request: UpdateStoryRequest,
    ) -> ServerResult<StoryView> {
        self.context.admin.authorize(admin_key)?;
        let update = StoryUpdate {
            title: request.title,
            description: request.description,
            status: request.status,
            max_entries: request.max_entries,
            edit_code: request.edit_code,
        };
        let story = self.context.registry.update_full(access_code, update)?;
        Ok(StoryView::from(&story))
    }

    /// Applies an edit-code-gated update.
    pub fn update_story_limited(
        &self,
        access_code: &str,
        edit_code: &str,
        request: LimitedUpdateRequest,
    ) -> ServerResult<StoryView> {
        let update = LimitedUpdate {
            description: request.description,
            status: request.status,
        };
        let story = self
            .context
            .registry
            .update_limited(access_code, edit_code, update)?;
        Ok(StoryView::from(&story))
    }

    /// Deletes a story and its entries (privileged).
    pub fn delete_story(
        &self,
        admin_key: Option<&str>,
        access_code: &str,
    ) -> ServerResult<StoryDeleted> {
        self.context.admin.authorize(admin_key)?;
        let entries_removed = self.context.registry.delete(access_code)?;
        Ok(StoryDeleted { entries_removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;
    use std::time::Duration;
    use storyloom_store::InMemoryStore;

    const ADMIN: Option<&str> = Some("secret");

    fn handler() -> RequestHandler {
        handler_with_cooldown(Duration::ZERO)
    }

    fn handler_with_cooldown(cooldown: Duration) -> RequestHandler {
        let config = ServerConfig::new()
            .with_admin_key("secret")
            .with_append_cooldown(cooldown);
        let store = Arc::new(InMemoryStore::new());
        let context = Arc::new(HandlerContext::new(config, store));
        RequestHandler::new(context)
    }

    fn create_request(code: &str) -> CreateStoryRequest {
        CreateStoryRequest {
            title: "Campfire Tale".to_string(),
            access_code: code.to_string(),
            description: None,
            max_entries: None,
            edit_code: None,
        }
    }

    fn submit(code: &str, text: &str, previous: Option<EntryId>) -> SubmitEntryRequest {
        SubmitEntryRequest {
            access_code: code.to_string(),
            author: "ava".to_string(),
            text: text.to_string(),
            contact: None,
            previous_entry_id: previous,
        }
    }

    #[test]
    fn create_requires_admin_key() {
        let handler = handler();
        let err = handler.create_story(None, create_request("ABC123")).unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = handler
            .create_story(Some("guess"), create_request("ABC123"))
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn full_contribution_flow() {
        let handler = handler();
        handler.create_story(ADMIN, create_request("ABC123")).unwrap();

        // Read before any entries exist.
        let latest = handler.latest_entry("abc123").unwrap();
        assert!(latest.latest_entry.is_none());

        let first = handler
            .submit_entry(submit("abc123", "The fire burned low.", None))
            .unwrap();
        let second = handler
            .submit_entry(submit("ABC123", "A twig snapped nearby.", Some(first.id)))
            .unwrap();
        assert_eq!(second.previous_entry_id, Some(first.id));

        let all = handler.story_entries("ABC123").unwrap();
        assert_eq!(all.entries.len(), 2);
        assert_eq!(
            handler.latest_entry("ABC123").unwrap().latest_entry.unwrap().id,
            second.id
        );
    }

    #[test]
    fn stale_submission_gets_conflict_status() {
        let handler = handler();
        handler.create_story(ADMIN, create_request("ABC123")).unwrap();
        let first = handler
            .submit_entry(submit("ABC123", "The fire burned low.", None))
            .unwrap();
        handler
            .submit_entry(submit("ABC123", "A twig snapped nearby.", Some(first.id)))
            .unwrap();

        let err = handler
            .submit_entry(submit("ABC123", "A stale contribution.", Some(first.id)))
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert!(matches!(
            err,
            ServerError::Core(CoreError::Conflict { latest: Some(_) })
        ));
    }

    #[test]
    fn unknown_access_code_is_not_found() {
        let handler = handler();
        let err = handler.story_entries("NOPE99").unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn submission_to_completed_story_is_refused() {
        let handler = handler();
        handler.create_story(ADMIN, create_request("ABC123")).unwrap();
        handler
            .update_story(
                ADMIN,
                "ABC123",
                UpdateStoryRequest {
                    status: Some("completed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let err = handler
            .submit_entry(submit("ABC123", "The fire burned low.", None))
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        // Reading stays possible after completion.
        assert!(handler.story_entries("ABC123").is_ok());
    }

    #[test]
    fn cooldown_blocks_second_submission() {
        let handler = handler_with_cooldown(Duration::from_secs(60));
        handler.create_story(ADMIN, create_request("ABC123")).unwrap();

        let first = handler
            .submit_entry(submit("ABC123", "The fire burned low.", None))
            .unwrap();
        let err = handler
            .submit_entry(submit("ABC123", "A twig snapped nearby.", Some(first.id)))
            .unwrap_err();
        assert_eq!(err.status_code(), 429);
    }

    #[test]
    fn failed_submission_does_not_arm_cooldown() {
        let handler = handler_with_cooldown(Duration::from_secs(60));
        handler.create_story(ADMIN, create_request("ABC123")).unwrap();

        // Too short: rejected, so the story's turn is not burned.
        let err = handler
            .submit_entry(submit("ABC123", "too short", None))
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        handler
            .submit_entry(submit("ABC123", "The fire burned low.", None))
            .unwrap();
    }

    #[test]
    fn limited_update_via_edit_code() {
        let handler = handler();
        let mut request = create_request("ABC123");
        request.edit_code = Some("edit9".to_string());
        handler.create_story(ADMIN, request).unwrap();

        let story = handler
            .update_story_limited(
                "ABC123",
                "EDIT9",
                LimitedUpdateRequest {
                    status: Some("completed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(story.status, StoryStatus::Completed);
        assert!(story.completed_at.is_some());
    }

    #[test]
    fn delete_reports_entry_count() {
        let handler = handler();
        handler.create_story(ADMIN, create_request("ABC123")).unwrap();
        let first = handler
            .submit_entry(submit("ABC123", "The fire burned low.", None))
            .unwrap();
        handler
            .submit_entry(submit("ABC123", "A twig snapped nearby.", Some(first.id)))
            .unwrap();

        let deleted = handler.delete_story(ADMIN, "ABC123").unwrap();
        assert_eq!(deleted.entries_removed, 2);
        assert_eq!(handler.story_entries("ABC123").unwrap_err().status_code(), 404);
    }

    #[test]
    fn entry_view_never_exposes_contact() {
        let handler = handler();
        handler.create_story(ADMIN, create_request("ABC123")).unwrap();
        let mut request = submit("ABC123", "The fire burned low.", None);
        request.contact = Some("ava@example.com".to_string());
        let view = handler.submit_entry(request).unwrap();

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("contact").is_none());
        assert!(json.get("text").is_some());

        let all = serde_json::to_value(handler.story_entries("ABC123").unwrap()).unwrap();
        assert!(all["entries"][0].get("contact").is_none());
    }

    #[test]
    fn story_view_never_exposes_edit_code() {
        let handler = handler();
        let mut request = create_request("ABC123");
        request.edit_code = Some("edit9".to_string());
        handler.create_story(ADMIN, request).unwrap();

        let listed = handler.list_stories(ADMIN).unwrap();
        let json = serde_json::to_value(&listed).unwrap();
        assert!(json[0].get("edit_code").is_none());
        assert_eq!(json[0]["access_code"], "ABC123");
    }

    #[test]
    fn duplicate_access_code_maps_to_bad_request() {
        let handler = handler();
        handler.create_story(ADMIN, create_request("ABC123")).unwrap();
        let err = handler
            .create_story(ADMIN, create_request("abc123"))
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
