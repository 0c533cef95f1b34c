use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parrot_core::Clock;
use parrot_core::model::{Article, ArticleError, ArticleId};
use parrot_core::text::{ContentFilter, SentenceSplitter};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use storage::repository::ArticleRepository;
use tracing::{debug, info};

use crate::error::IngestError;

/// One already-fetched news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub guid: String,
    pub title: String,
    pub body: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
}

/// Counts from one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub stored: usize,
    pub skipped: usize,
}

/// Turns feed items into practice articles and prunes old ones.
#[derive(Clone)]
pub struct IngestService {
    clock: Clock,
    articles: Arc<dyn ArticleRepository>,
    splitter: SentenceSplitter,
    filter: ContentFilter,
}

impl IngestService {
    #[must_use]
    pub fn new(clock: Clock, articles: Arc<dyn ArticleRepository>) -> Self {
        Self {
            clock,
            articles,
            splitter: SentenceSplitter::default(),
            filter: ContentFilter::default(),
        }
    }

    /// Stable id for a feed guid: the hex SHA-256 of the guid.
    #[must_use]
    pub fn article_id_for(guid: &str) -> ArticleId {
        let digest = Sha256::digest(guid.as_bytes());
        ArticleId::new(format!("{digest:x}"))
    }

    /// Splits and filters one item into an article.
    ///
    /// # Errors
    ///
    /// Returns `ArticleError::NoSentences` when nothing survives filtering, or
    /// `ArticleError::EmptyTitle` for untitled items.
    pub fn prepare(&self, item: &FeedItem) -> Result<Article, ArticleError> {
        let sentences: Vec<String> = self
            .splitter
            .split(&item.body)
            .into_iter()
            .filter(|s| self.filter.is_allowed(s))
            .collect();

        Article::new(
            Self::article_id_for(&item.guid),
            item.title.trim(),
            sentences,
            item.source.trim(),
            item.published_at,
        )
    }

    /// Stores every usable item, replacing earlier copies of the same guid.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::Storage` if an upsert fails.
    pub async fn ingest(&self, items: &[FeedItem]) -> Result<IngestReport, IngestError> {
        let mut report = IngestReport::default();
        for item in items {
            match self.prepare(item) {
                Ok(article) => {
                    self.articles.upsert_article(&article).await?;
                    debug!(
                        article_id = %article.id(),
                        sentences = article.sentences().len(),
                        max_words = article.max_word_count(),
                        "article stored"
                    );
                    report.stored += 1;
                }
                Err(err) => {
                    debug!(guid = %item.guid, reason = %err, "item skipped");
                    report.skipped += 1;
                }
            }
        }
        info!(stored = report.stored, skipped = report.skipped, "ingestion finished");
        Ok(report)
    }

    /// Deletes articles published before `now - retention`.
    ///
    /// # Errors
    ///
    /// Returns `IngestError::Storage` if the delete fails.
    pub async fn purge(&self, retention: Duration) -> Result<u64, IngestError> {
        let cutoff = self.clock.now() - retention;
        let removed = self.articles.delete_published_before(cutoff).await?;
        info!(removed, %cutoff, "old articles purged");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parrot_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn item(guid: &str, title: &str, body: &str) -> FeedItem {
        FeedItem {
            guid: guid.into(),
            title: title.into(),
            body: body.into(),
            source: "BBC".into(),
            published_at: fixed_now() - Duration::hours(2),
        }
    }

    #[test]
    fn ids_are_stable_hashes() {
        let a = IngestService::article_id_for("https://example.com/1");
        let b = IngestService::article_id_for("https://example.com/1");
        let c = IngestService::article_id_for("https://example.com/2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn prepare_drops_blocked_sentences() {
        let service = IngestService::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        let article = service
            .prepare(&item(
                "g1",
                "Weekend weather",
                "Rain is expected on Saturday. Skip your picnic plans. Sunday looks sunny.",
            ))
            .unwrap();
        assert_eq!(
            article.sentences(),
            &["Rain is expected on Saturday.", "Sunday looks sunny."]
        );
    }

    #[test]
    fn prepare_rejects_empty_results() {
        let service = IngestService::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        assert_eq!(
            service.prepare(&item("g2", "Title", "Stop the attack now.")).unwrap_err(),
            ArticleError::NoSentences
        );
        assert_eq!(
            service.prepare(&item("g3", "  ", "Fine words here.")).unwrap_err(),
            ArticleError::EmptyTitle
        );
    }
}
