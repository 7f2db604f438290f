//! Access and edit code normalization.

/// Normalizes a shared code to its canonical form: trimmed and uppercased.
///
/// Every code comparison in the registry and every store lookup goes
/// through this, so "abc123", " ABC123 " and "Abc123" all name the same
/// story.
#[must_use]
pub fn canonical_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(canonical_code("  abc123 "), "ABC123");
    }

    #[test]
    fn case_variants_collapse() {
        assert_eq!(canonical_code("Story42"), canonical_code("sTORY42"));
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(canonical_code("   "), "");
    }
}
