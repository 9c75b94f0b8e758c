//! Path prefix matching.
//!
//! # Design Decisions
//! - Prefix comparison is case-insensitive
//! - The configured prefix is anchored at the root ('/' + prefix)
//! - Plain string prefix, no segment awareness: "/doc" matches "/docs/a"

/// Matches request paths against a root-anchored prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a matcher for `prefix`, given without its leading slash.
    /// The prefix is normalized to lowercase once, here.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: format!("/{}", prefix.trim_start_matches('/')).to_lowercase(),
        }
    }

    /// Returns true if `path` starts with this prefix.
    pub fn matches(&self, path: &str) -> bool {
        path.to_lowercase().starts_with(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matcher_case_insensitive() {
        let matcher = PathPrefixMatcher::new("Docs/Public");

        assert!(matcher.matches("/docs/public/a.md"));
        assert!(matcher.matches("/DOCS/PUBLIC"));
        assert!(!matcher.matches("/docs/private/a.md"));
        assert!(!matcher.matches("docs/public/a.md"));
    }

    #[test]
    fn test_path_matcher_plain_prefix() {
        let matcher = PathPrefixMatcher::new("doc");
        assert!(matcher.matches("/docs/readme.md"));

        // An empty prefix covers every path.
        let matcher = PathPrefixMatcher::new("");
        assert!(matcher.matches("/anything"));
    }
}
