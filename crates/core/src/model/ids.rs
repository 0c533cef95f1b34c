use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier for an article.
///
/// Ingestion derives it from a content hash of the feed guid, so the same
/// story always lands on the same id no matter how often the feed is polled.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArticleId(String);

impl ArticleId {
    /// Creates a new `ArticleId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id carries no value.
    ///
    /// Sessions use the empty id to mean "no practice in progress".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArticleId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.trim()))
    }
}

impl From<&str> for ArticleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ArticleId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_id_is_empty() {
        assert!(ArticleId::default().is_empty());
        assert!(!ArticleId::new("abc").is_empty());
    }

    #[test]
    fn parse_trims_whitespace() {
        let id: ArticleId = " 9f86d0 ".parse().unwrap();
        assert_eq!(id.as_str(), "9f86d0");
        assert_eq!(id.to_string(), "9f86d0");
        assert_eq!(format!("{id:?}"), "ArticleId(9f86d0)");
    }
}
