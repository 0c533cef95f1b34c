//! Shared error types for the services crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use parrot_core::model::{ArticleId, ScoreError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// The closed set of reasons a turn can fail. Each maps to one apology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    SentenceNotFound,
    AvailableArticleNotExist,
    ArticleNotFound,
    PracticeNotFound,
    Internal,
}

impl FailureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::SentenceNotFound => "sentence_not_found",
            FailureKind::AvailableArticleNotExist => "available_article_not_exist",
            FailureKind::ArticleNotFound => "article_not_found",
            FailureKind::PracticeNotFound => "practice_not_found",
            FailureKind::Internal => "internal",
        }
    }
}

/// Errors emitted by `ScenarioService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScenarioError {
    #[error("current sentence not found")]
    SentenceNotFound,
    #[error("no eligible article is available")]
    AvailableArticleNotExist,
    #[error("article {0} not found")]
    ArticleNotFound(ArticleId),
    #[error("no practice in progress")]
    PracticeNotFound,
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ScenarioError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            ScenarioError::SentenceNotFound => FailureKind::SentenceNotFound,
            ScenarioError::AvailableArticleNotExist => FailureKind::AvailableArticleNotExist,
            ScenarioError::ArticleNotFound(_) => FailureKind::ArticleNotFound,
            ScenarioError::PracticeNotFound => FailureKind::PracticeNotFound,
            ScenarioError::Score(_) | ScenarioError::Storage(_) => FailureKind::Internal,
        }
    }
}

/// Errors emitted by `IngestService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_has_a_kind() {
        assert_eq!(
            ScenarioError::SentenceNotFound.kind(),
            FailureKind::SentenceNotFound
        );
        assert_eq!(
            ScenarioError::ArticleNotFound(ArticleId::new("x")).kind(),
            FailureKind::ArticleNotFound
        );
        assert_eq!(
            ScenarioError::Storage(StorageError::Connection("down".into())).kind(),
            FailureKind::Internal
        );
        assert_eq!(
            ScenarioError::Score(ScoreError::InvalidInput).kind(),
            FailureKind::Internal
        );
    }

    #[test]
    fn kind_names_match_serde() {
        let json = serde_json::to_string(&FailureKind::AvailableArticleNotExist).unwrap();
        assert_eq!(json, format!("\"{}\"", FailureKind::AvailableArticleNotExist.as_str()));
    }
}
