mod answer;
mod article;
mod ids;
mod practice;
mod settings;

pub use answer::{
    AnswerResult, ScoreError, Tier, TierError, TierThresholds, levenshtein, normalize, similarity,
};
pub use article::{Article, ArticleCursor, ArticleError};
pub use ids::ArticleId;
pub use practice::PracticeRecord;
pub use settings::{ReadingSpeed, ScenarioSettings, SettingsError};
