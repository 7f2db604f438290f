//! Server configuration.

use std::time::Duration;
use storyloom_core::Limits;

/// Configuration for the story service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Shared secret guarding privileged operations. `None` disables
    /// privileged operations entirely.
    pub admin_key: Option<String>,
    /// Cooldown between successful appends to the same story.
    /// `Duration::ZERO` disables rate limiting.
    pub append_cooldown: Duration,
    /// Field length bounds applied by the registry and chain manager.
    pub limits: Limits,
}

impl ServerConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the admin key, enabling privileged operations.
    #[must_use]
    pub fn with_admin_key(mut self, key: impl Into<String>) -> Self {
        self.admin_key = Some(key.into());
        self
    }

    /// Sets the append cooldown window.
    #[must_use]
    pub const fn with_append_cooldown(mut self, cooldown: Duration) -> Self {
        self.append_cooldown = cooldown;
        self
    }

    /// Sets the validation limits.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            admin_key: None,
            append_cooldown: Duration::from_secs(15 * 60),
            limits: Limits::default(),
        }
    }
}
