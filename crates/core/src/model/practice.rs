use serde::{Deserialize, Serialize};

use crate::model::article::Article;
use crate::model::ids::ArticleId;
use crate::model::settings::ReadingSpeed;

/// Per-session progress through the practice sentences.
///
/// Owned by exactly one conversation and mutated once per turn by the
/// scenario. An empty `article_id` means no practice is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeRecord {
    article_id: ArticleId,
    question_text: String,
    retry_count: u32,
    reading_speed_rate: u32,
    practice_count: u32,
}

impl Default for PracticeRecord {
    fn default() -> Self {
        Self::new(&ReadingSpeed::default())
    }
}

impl PracticeRecord {
    /// Empty record for a fresh session.
    #[must_use]
    pub fn new(speed: &ReadingSpeed) -> Self {
        Self {
            article_id: ArticleId::default(),
            question_text: String::new(),
            retry_count: 0,
            reading_speed_rate: speed.default_rate(),
            practice_count: 0,
        }
    }

    /// Rehydrate a record from session storage.
    #[must_use]
    pub fn from_persisted(
        article_id: ArticleId,
        question_text: String,
        retry_count: u32,
        reading_speed_rate: u32,
        practice_count: u32,
    ) -> Self {
        Self {
            article_id,
            question_text,
            retry_count,
            reading_speed_rate,
            practice_count,
        }
    }

    #[must_use]
    pub fn article_id(&self) -> &ArticleId {
        &self.article_id
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    #[must_use]
    pub fn reading_speed_rate(&self) -> u32 {
        self.reading_speed_rate
    }

    #[must_use]
    pub fn practice_count(&self) -> u32 {
        self.practice_count
    }

    /// True when no practice is in progress.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.article_id.is_empty()
    }

    /// True when there is a sentence to compare answers against.
    #[must_use]
    pub fn has_question(&self) -> bool {
        !self.question_text.is_empty()
    }

    /// Clears the current practice. `practice_count` survives.
    pub fn reset(&mut self, speed: &ReadingSpeed) {
        self.article_id = ArticleId::default();
        self.question_text.clear();
        self.retry_count = 0;
        self.reading_speed_rate = speed.default_rate();
    }

    /// Starts practicing the article's current sentence.
    pub fn begin_new_sentence(&mut self, article: &Article, speed: &ReadingSpeed) {
        self.article_id = article.id().clone();
        self.question_text = article.current_sentence().to_owned();
        self.retry_count = 0;
        self.reading_speed_rate = speed.default_rate();
        self.practice_count = self.practice_count.saturating_add(1);
    }

    pub fn increment_retry_count(&mut self) {
        self.retry_count = self.retry_count.saturating_add(1);
    }

    pub fn slow_down(&mut self, speed: &ReadingSpeed) {
        self.reading_speed_rate = speed.slower(self.reading_speed_rate);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
