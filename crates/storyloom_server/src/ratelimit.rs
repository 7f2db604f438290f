//! Per-story append rate limiting.

use crate::error::{ServerError, ServerResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use storyloom_core::StoryId;
use tracing::warn;

/// Fixed-window limiter: at most one successful append per story per
/// cooldown window, independent of caller identity.
///
/// Only successful appends arm the window; a rejected attempt (conflict,
/// validation failure) does not burn the story's turn.
#[derive(Debug)]
pub struct AppendLimiter {
    window: Duration,
    last_success: RwLock<HashMap<StoryId, Instant>>,
}

impl AppendLimiter {
    /// Creates a limiter with the given cooldown window.
    /// `Duration::ZERO` disables limiting.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_success: RwLock::new(HashMap::new()),
        }
    }

    /// Checks whether an append to `story` is currently allowed.
    ///
    /// # Errors
    ///
    /// Returns `RateLimited` with the remaining cooldown if the story
    /// accepted an append within the window.
    pub fn check(&self, story: StoryId) -> ServerResult<()> {
        if self.window.is_zero() {
            return Ok(());
        }
        if let Some(last) = self.last_success.read().get(&story) {
            let elapsed = last.elapsed();
            if elapsed < self.window {
                let retry_after = self.window - elapsed;
                warn!(story = %story, ?retry_after, "append rate limited");
                return Err(ServerError::RateLimited { retry_after });
            }
        }
        Ok(())
    }

    /// Records a successful append, arming the window for `story`.
    pub fn record(&self, story: StoryId) {
        if self.window.is_zero() {
            return;
        }
        self.last_success.write().insert(story, Instant::now());
    }
}
