use serde::{Deserialize, Serialize};
use std::fmt;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Prefix shared by every path the manager builds, stored without surrounding slashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasePath(String);

impl BasePath {
    /// Parse a user-supplied base path.
    ///
    /// Leading and trailing `/` are dropped, so `/org`, `org/` and `org` are
    /// the same base. Returns `None` when nothing is left.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of path segments the base occupies (`org/team` is two).
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.0.split('/').filter(|s| !s.is_empty()).count()
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

/// Settings shared by the path builder, lister and listing cache.
///
/// Immutable once handed to a [`ParamManager`](crate::ParamManager): a
/// different base path means a different manager with its own cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Prefix for every constructed path
    pub base_path: Option<BasePath>,

    /// Maximum parameters requested per listing page (`None` lets the store decide)
    pub page_size: Option<usize>,

    /// Maximum cached listings (`None` keeps everything for the process lifetime)
    pub cache_capacity: Option<usize>,
}

impl StoreConfig {
    #[must_use]
    pub fn with_base_path(mut self, raw: &str) -> Self {
        self.base_path = BasePath::parse(raw);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size).filter(|n| *n > 0);
        self
    }

    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_trims_slashes() {
        assert_eq!(BasePath::parse("/org/").unwrap().as_str(), "org");
        assert_eq!(BasePath::parse("org/team").unwrap().segment_count(), 2);
        assert_eq!(BasePath::parse("/org").unwrap().to_string(), "/org");
    }

    #[test]
    fn blank_base_path_is_none() {
        assert!(BasePath::parse("").is_none());
        assert!(BasePath::parse("  ").is_none());
        assert!(BasePath::parse("///").is_none());
    }

    #[test]
    fn zero_page_size_falls_back_to_store_default() {
        let cfg = StoreConfig::default().with_page_size(0);
        assert_eq!(cfg.page_size, None);
    }
}
