use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parrot_core::model::{Article, ArticleCursor, ArticleError, ArticleId, ScenarioSettings};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for an article.
///
/// Mirrors the domain `Article` minus its reading position, which always
/// starts at the first sentence when loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub id: ArticleId,
    pub title: String,
    pub sentences: Vec<String>,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub max_word_count: u32,
}

impl ArticleRecord {
    #[must_use]
    pub fn from_article(article: &Article) -> Self {
        Self {
            id: article.id().clone(),
            title: article.title().to_owned(),
            sentences: article.sentences().to_vec(),
            source: article.source().to_owned(),
            published_at: article.published_at(),
            max_word_count: u32::try_from(article.max_word_count()).unwrap_or(u32::MAX),
        }
    }

    /// Convert the record back into a domain `Article`.
    ///
    /// # Errors
    ///
    /// Returns `ArticleError` if the stored title or sentences are invalid.
    pub fn into_article(self) -> Result<Article, ArticleError> {
        Article::new(
            self.id,
            self.title,
            self.sentences,
            self.source,
            self.published_at,
        )
    }
}

/// Which articles may be offered for practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// Oldest publication time still considered fresh (inclusive).
    pub published_after: DateTime<Utc>,
    /// Longest allowed sentence, in words.
    pub max_words: u32,
}

impl Eligibility {
    #[must_use]
    pub fn from_settings(settings: &ScenarioSettings, now: DateTime<Utc>) -> Self {
        Self {
            published_after: now - settings.recency_window(),
            max_words: settings.max_words(),
        }
    }

    #[must_use]
    pub fn admits(&self, published_at: DateTime<Utc>, max_word_count: usize) -> bool {
        published_at >= self.published_after
            && u32::try_from(max_word_count).is_ok_and(|n| n <= self.max_words)
    }
}

/// Repository contract for practice articles.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// The newest eligible article past `cursor`.
    ///
    /// Articles are ordered by publication time, newest first, then by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no eligible article remains.
    async fn find_next_eligible(
        &self,
        cursor: &ArticleCursor,
        eligibility: &Eligibility,
    ) -> Result<Article, StorageError>;

    /// Fetch an article by ID, positioned on its first sentence.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_by_id(&self, id: &ArticleId) -> Result<Article, StorageError>;

    /// Persist or replace an article.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the article cannot be stored.
    async fn upsert_article(&self, article: &Article) -> Result<(), StorageError>;

    /// Delete articles published strictly before `cutoff`. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete_published_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    articles: Arc<Mutex<HashMap<ArticleId, Article>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            articles: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ArticleRepository for InMemoryRepository {
    async fn find_next_eligible(
        &self,
        cursor: &ArticleCursor,
        eligibility: &Eligibility,
    ) -> Result<Article, StorageError> {
        let guard = self
            .articles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .values()
            .filter(|a| cursor.admits(a.published_at(), a.id()))
            .filter(|a| eligibility.admits(a.published_at(), a.max_word_count()))
            .min_by(|a, b| {
                b.published_at()
                    .cmp(&a.published_at())
                    .then_with(|| a.id().cmp(b.id()))
            })
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn get_by_id(&self, id: &ArticleId) -> Result<Article, StorageError> {
        let guard = self
            .articles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn upsert_article(&self, article: &Article) -> Result<(), StorageError> {
        let mut guard = self
            .articles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut stored = article.clone();
        stored
            .set_index(0)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.insert(article.id().clone(), stored);
        Ok(())
    }

    async fn delete_published_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut guard = self
            .articles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.len();
        guard.retain(|_, a| a.published_at() >= cutoff);
        Ok((before - guard.len()) as u64)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub articles: Arc<dyn ArticleRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let articles: Arc<dyn ArticleRepository> = Arc::new(InMemoryRepository::new());
        Self { articles }
    }
}
