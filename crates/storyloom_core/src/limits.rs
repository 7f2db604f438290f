//! Validation limits.

/// Length bounds applied to story and entry fields.
///
/// The defaults mirror the service's public contract: contributions must
/// be at least 10 characters so a turn carries real content, and no field
/// may grow without bound.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Minimum entry text length, in characters.
    pub min_text_len: usize,
    /// Maximum entry text length, in characters.
    pub max_text_len: usize,
    /// Minimum author name length, in characters.
    pub min_author_len: usize,
    /// Maximum author name length, in characters.
    pub max_author_len: usize,
    /// Maximum story title length, in characters.
    pub max_title_len: usize,
    /// Maximum story description length, in characters.
    pub max_description_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_text_len: 10,
            max_text_len: 500,
            min_author_len: 2,
            max_author_len: 50,
            max_title_len: 100,
            max_description_len: 500,
        }
    }
}

impl Limits {
    /// Creates limits with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry text length bounds.
    #[must_use]
    pub const fn text_len(mut self, min: usize, max: usize) -> Self {
        self.min_text_len = min;
        self.max_text_len = max;
        self
    }

    /// Sets the maximum author name length.
    #[must_use]
    pub const fn max_author_len(mut self, max: usize) -> Self {
        self.max_author_len = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.min_text_len, 10);
        assert_eq!(limits.max_text_len, 500);
        assert_eq!(limits.max_author_len, 50);
    }

    #[test]
    fn builder() {
        let limits = Limits::new().text_len(5, 100).max_author_len(20);
        assert_eq!(limits.min_text_len, 5);
        assert_eq!(limits.max_text_len, 100);
        assert_eq!(limits.max_author_len, 20);
    }
}
