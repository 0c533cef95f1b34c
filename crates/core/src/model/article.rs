use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::ArticleId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArticleError {
    #[error("article title cannot be empty")]
    EmptyTitle,

    #[error("article must contain at least one sentence")]
    NoSentences,

    #[error("sentence index {index} is out of range for {len} sentences")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("sentence is not part of the article")]
    SentenceNotInArticle,
}

//
// ─── CURSOR ────────────────────────────────────────────────────────────────────
//

/// Position marker used to ask for "the next eligible article after this one".
///
/// Articles are walked newest first. An article is past the cursor when it was
/// published strictly earlier, or at the same instant with a greater id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCursor {
    pub published_at: DateTime<Utc>,
    pub id: Option<ArticleId>,
}

impl ArticleCursor {
    /// Cursor that admits anything published strictly before `at`.
    #[must_use]
    pub fn before(at: DateTime<Utc>) -> Self {
        Self {
            published_at: at,
            id: None,
        }
    }

    /// Cursor positioned on an existing article.
    #[must_use]
    pub fn after_article(article: &Article) -> Self {
        Self {
            published_at: article.published_at(),
            id: Some(article.id().clone()),
        }
    }

    /// Returns true if an article with the given key comes after this cursor.
    #[must_use]
    pub fn admits(&self, published_at: DateTime<Utc>, id: &ArticleId) -> bool {
        if published_at < self.published_at {
            return true;
        }
        match &self.id {
            Some(cursor_id) => published_at == self.published_at && id > cursor_id,
            None => false,
        }
    }
}

//
// ─── ARTICLE ───────────────────────────────────────────────────────────────────
//

/// A news item reduced to an ordered list of short sentences for practice.
///
/// `current_index` always points at a valid sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    id: ArticleId,
    title: String,
    sentences: Vec<String>,
    current_index: usize,
    source: String,
    published_at: DateTime<Utc>,
}

impl Article {
    /// Creates a new article positioned on its first sentence.
    ///
    /// Repeated sentences are dropped after their first occurrence, so every
    /// sentence names exactly one position.
    ///
    /// # Errors
    ///
    /// Returns `ArticleError::EmptyTitle` or `ArticleError::NoSentences`.
    pub fn new(
        id: ArticleId,
        title: impl Into<String>,
        sentences: Vec<String>,
        source: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Result<Self, ArticleError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ArticleError::EmptyTitle);
        }
        if sentences.is_empty() {
            return Err(ArticleError::NoSentences);
        }

        let mut seen = HashSet::with_capacity(sentences.len());
        let sentences: Vec<String> = sentences
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect();

        Ok(Self {
            id,
            title,
            sentences,
            current_index: 0,
            source: source.into(),
            published_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ArticleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_sentence(&self) -> &str {
        &self.sentences[self.current_index]
    }

    #[must_use]
    pub fn is_first_sentence(&self) -> bool {
        self.current_index == 0
    }

    #[must_use]
    pub fn has_next_sentence(&self) -> bool {
        self.current_index + 1 < self.sentences.len()
    }

    /// Word count of the longest sentence.
    #[must_use]
    pub fn max_word_count(&self) -> usize {
        self.sentences
            .iter()
            .map(|s| s.split_whitespace().count())
            .max()
            .unwrap_or(0)
    }

    /// Moves to the given sentence index.
    ///
    /// # Errors
    ///
    /// Returns `ArticleError::IndexOutOfRange` if the index does not exist.
    pub fn set_index(&mut self, index: usize) -> Result<(), ArticleError> {
        if index >= self.sentences.len() {
            return Err(ArticleError::IndexOutOfRange {
                index,
                len: self.sentences.len(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    /// Moves to the first occurrence of `sentence`.
    ///
    /// # Errors
    ///
    /// Returns `ArticleError::SentenceNotInArticle` if it is not found.
    pub fn locate(&mut self, sentence: &str) -> Result<(), ArticleError> {
        let index = self
            .sentences
            .iter()
            .position(|s| s == sentence)
            .ok_or(ArticleError::SentenceNotInArticle)?;
        self.current_index = index;
        Ok(())
    }

    /// Advances to the next sentence. Returns false when already on the last.
    pub fn advance(&mut self) -> bool {
        if self.has_next_sentence() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn build(sentences: &[&str]) -> Article {
        Article::new(
            ArticleId::new("a1"),
            "Title",
            sentences.iter().map(|s| (*s).to_owned()).collect(),
            "Reuters",
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_content() {
        let err = Article::new(ArticleId::new("a"), "T", Vec::new(), "S", fixed_now()).unwrap_err();
        assert_eq!(err, ArticleError::NoSentences);
        let err = Article::new(ArticleId::new("a"), " ", vec!["x".into()], "S", fixed_now())
            .unwrap_err();
        assert_eq!(err, ArticleError::EmptyTitle);
    }

    #[test]
    fn walks_sentences_in_order() {
        let mut article = build(&["one two", "three", "four five six"]);
        assert!(article.is_first_sentence());
        assert_eq!(article.current_sentence(), "one two");
        assert!(article.advance());
        assert_eq!(article.current_sentence(), "three");
        assert!(article.advance());
        assert!(!article.has_next_sentence());
        assert!(!article.advance());
        assert_eq!(article.current_index(), 2);
        assert_eq!(article.max_word_count(), 3);
    }

    #[test]
    fn locate_finds_sentence() {
        let mut article = build(&["one", "two", "three"]);
        article.locate("two").unwrap();
        assert_eq!(article.current_index(), 1);
        assert_eq!(
            article.locate("missing").unwrap_err(),
            ArticleError::SentenceNotInArticle
        );
        assert!(matches!(
            article.set_index(3),
            Err(ArticleError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn repeated_sentences_keep_first_position() {
        let mut article = build(&[
            "First one here.",
            "He said yes.",
            "Middle part.",
            "He said yes.",
            "The end.",
        ]);
        assert_eq!(
            article.sentences(),
            &["First one here.", "He said yes.", "Middle part.", "The end."]
        );
        article.locate("He said yes.").unwrap();
        assert!(article.advance());
        assert!(article.advance());
        assert_eq!(article.current_sentence(), "The end.");
        assert!(!article.advance());
    }

    #[test]
    fn cursor_orders_by_time_then_id() {
        let now = fixed_now();
        let article = build(&["x"]);
        let cursor = ArticleCursor::after_article(&article);

        assert!(cursor.admits(now - Duration::seconds(1), &ArticleId::new("a0")));
        assert!(cursor.admits(now, &ArticleId::new("a2")));
        assert!(!cursor.admits(now, &ArticleId::new("a1")));
        assert!(!cursor.admits(now, &ArticleId::new("a0")));
        assert!(!cursor.admits(now + Duration::seconds(1), &ArticleId::new("z")));

        let bootstrap = ArticleCursor::before(now);
        assert!(!bootstrap.admits(now, &ArticleId::new("z")));
    }
}
