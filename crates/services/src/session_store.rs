use parrot_core::model::{ArticleId, PracticeRecord, ReadingSpeed};
use serde::{Deserialize, Serialize};

/// Per-session state as the voice platform stores it between turns.
///
/// Every field is optional on the wire; missing fields load as an empty
/// practice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionData {
    pub article_id: String,
    pub question_text: String,
    pub retry_count: u32,
    pub reading_speed_rate: Option<u32>,
    pub practice_count: u32,
}

impl SessionData {
    /// Rebuilds the practice record. A missing or out-of-range reading speed is
    /// brought back within the policy's floor and default.
    #[must_use]
    pub fn to_record(&self, speed: &ReadingSpeed) -> PracticeRecord {
        let rate = self
            .reading_speed_rate
            .unwrap_or(speed.default_rate())
            .clamp(speed.floor(), speed.default_rate());
        PracticeRecord::from_persisted(
            ArticleId::new(self.article_id.trim()),
            self.question_text.clone(),
            self.retry_count,
            rate,
            self.practice_count,
        )
    }

    #[must_use]
    pub fn from_record(record: &PracticeRecord) -> Self {
        Self {
            article_id: record.article_id().as_str().to_owned(),
            question_text: record.question_text().to_owned(),
            retry_count: record.retry_count(),
            reading_speed_rate: Some(record.reading_speed_rate()),
            practice_count: record.practice_count(),
        }
    }
}
