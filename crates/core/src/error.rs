use thiserror::Error;

use crate::model::{ArticleError, ScoreError, SettingsError, TierError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Article(#[from] ArticleError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Tier(#[from] TierError),
}
