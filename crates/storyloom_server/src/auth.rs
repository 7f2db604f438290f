//! Admin-key gate for privileged operations.

use crate::error::{ServerError, ServerResult};

/// Shared-secret gate in front of create/update/delete operations.
///
/// A gate configured without a key refuses every privileged call: a
/// deployment must opt in to administration by setting a key.
#[derive(Debug, Clone)]
pub struct AdminGate {
    key: Option<String>,
}

impl AdminGate {
    /// Creates a gate with the given key, or a closed gate if `None`.
    #[must_use]
    pub fn new(key: Option<String>) -> Self {
        Self { key }
    }

    /// Validates a presented admin key.
    ///
    /// # Errors
    ///
    /// - `AuthenticationRequired` if no key was presented
    /// - `NotAuthorized` if no key is configured or the presented key
    ///   does not match
    pub fn authorize(&self, presented: Option<&str>) -> ServerResult<()> {
        let Some(presented) = presented else {
            return Err(ServerError::AuthenticationRequired(
                "admin API key is required".to_string(),
            ));
        };
        match &self.key {
            Some(key) if presented == key => Ok(()),
            Some(_) => Err(ServerError::NotAuthorized(
                "invalid admin API key".to_string(),
            )),
            None => Err(ServerError::NotAuthorized(
                "admin access is not configured".to_string(),
            )),
        }
    }
}
