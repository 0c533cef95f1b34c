use parrot_core::model::{Article, ArticleCursor, PracticeRecord};
use storage::repository::{ArticleRepository, Eligibility, StorageError};
use tracing::debug;

use crate::error::ScenarioError;

/// Where the next practice sentence should come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The sentence after the current one, moving to a new article only when
    /// the current article is exhausted.
    NextSentence,
    /// The first sentence of the next article.
    NextArticle,
}

/// Resolves the article holding the next sentence to practice.
///
/// A fresh record starts from the newest eligible article published before
/// `cursor_time`. Otherwise the current article is reloaded and either
/// advanced in place or left behind for the next article past it.
///
/// The returned article's `current_index` points at the sentence to practice.
pub(crate) async fn next_article(
    articles: &dyn ArticleRepository,
    record: &PracticeRecord,
    mode: Advance,
    eligibility: &Eligibility,
    cursor_time: chrono::DateTime<chrono::Utc>,
) -> Result<Article, ScenarioError> {
    if record.is_fresh() {
        return find_after(articles, &ArticleCursor::before(cursor_time), eligibility).await;
    }

    let mut article = match articles.get_by_id(record.article_id()).await {
        Ok(article) => article,
        Err(StorageError::NotFound) => {
            return Err(ScenarioError::ArticleNotFound(record.article_id().clone()));
        }
        Err(other) => return Err(other.into()),
    };

    if mode == Advance::NextSentence {
        article
            .locate(record.question_text())
            .map_err(|_| ScenarioError::SentenceNotFound)?;
        if article.advance() {
            debug!(
                article_id = %article.id(),
                index = article.current_index(),
                "advanced within article"
            );
            return Ok(article);
        }
    }

    find_after(articles, &ArticleCursor::after_article(&article), eligibility).await
}

async fn find_after(
    articles: &dyn ArticleRepository,
    cursor: &ArticleCursor,
    eligibility: &Eligibility,
) -> Result<Article, ScenarioError> {
    match articles.find_next_eligible(cursor, eligibility).await {
        Ok(article) => {
            debug!(article_id = %article.id(), "moved to next article");
            Ok(article)
        }
        Err(StorageError::NotFound) => Err(ScenarioError::AvailableArticleNotExist),
        Err(other) => Err(other.into()),
    }
}
