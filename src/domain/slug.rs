//! Stable entry identifier derived from an entry URL.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Final non-empty path segment of an entry URL, used as the artifact key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from an entry URL. Trailing slashes are ignored.
    /// Returns `None` when the URL has no usable segment.
    pub fn from_url(url: &str) -> Option<Self> {
        url.trim_end_matches('/')
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .filter(|segment| !segment.contains(':'))
            .map(|segment| Self(segment.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
