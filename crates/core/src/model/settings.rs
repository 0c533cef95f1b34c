use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::TierThresholds;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("confirm interval must be > 0")]
    InvalidConfirmInterval,

    #[error("reading speed floor must be > 0 and <= default rate")]
    InvalidReadingSpeedFloor,

    #[error("reading speed step must be > 0")]
    InvalidReadingSpeedStep,

    #[error("recency window must be at least 1 day")]
    InvalidRecencyDays,

    #[error("max words per sentence must be > 0")]
    InvalidMaxWords,
}

//
// ─── READING SPEED ─────────────────────────────────────────────────────────────
//

/// Prosody rate policy, in percent of normal speaking speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSpeed {
    default_rate: u32,
    step: u32,
    floor: u32,
}

impl Default for ReadingSpeed {
    fn default() -> Self {
        Self {
            default_rate: 100,
            step: 15,
            floor: 70,
        }
    }
}

impl ReadingSpeed {
    /// Creates a custom reading speed policy.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the step is zero or the floor is zero or above the default.
    pub fn new(default_rate: u32, step: u32, floor: u32) -> Result<Self, SettingsError> {
        if step == 0 {
            return Err(SettingsError::InvalidReadingSpeedStep);
        }
        if floor == 0 || floor > default_rate {
            return Err(SettingsError::InvalidReadingSpeedFloor);
        }
        Ok(Self {
            default_rate,
            step,
            floor,
        })
    }

    #[must_use]
    pub fn default_rate(&self) -> u32 {
        self.default_rate
    }

    #[must_use]
    pub fn step(&self) -> u32 {
        self.step
    }

    #[must_use]
    pub fn floor(&self) -> u32 {
        self.floor
    }

    /// The next slower rate, never below the floor.
    #[must_use]
    pub fn slower(&self, rate: u32) -> u32 {
        rate.saturating_sub(self.step).max(self.floor)
    }
}

//
// ─── SCENARIO SETTINGS ─────────────────────────────────────────────────────────
//

/// Tunables for the practice conversation.
///
/// Defaults:
/// - 3 retries per sentence before moving on
/// - a "continue?" question every 10 practices
/// - tiers at 60 / 80 / 100 percent
/// - reading speed 100 %, slowed by 15 down to 70 %
/// - only articles from the last 3 days with sentences of at most 20 words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSettings {
    max_retry: u32,
    confirm_interval: u32,
    thresholds: TierThresholds,
    reading_speed: ReadingSpeed,
    recency_days: u32,
    max_words: u32,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            max_retry: 3,
            confirm_interval: 10,
            thresholds: TierThresholds::default(),
            reading_speed: ReadingSpeed::default(),
            recency_days: 3,
            max_words: 20,
        }
    }
}

impl ScenarioSettings {
    /// Creates custom scenario settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the confirm interval, recency window or word limit is zero.
    pub fn new(
        max_retry: u32,
        confirm_interval: u32,
        thresholds: TierThresholds,
        reading_speed: ReadingSpeed,
        recency_days: u32,
        max_words: u32,
    ) -> Result<Self, SettingsError> {
        if confirm_interval == 0 {
            return Err(SettingsError::InvalidConfirmInterval);
        }
        if recency_days == 0 {
            return Err(SettingsError::InvalidRecencyDays);
        }
        if max_words == 0 {
            return Err(SettingsError::InvalidMaxWords);
        }
        Ok(Self {
            max_retry,
            confirm_interval,
            thresholds,
            reading_speed,
            recency_days,
            max_words,
        })
    }

    #[must_use]
    pub fn max_retry(&self) -> u32 {
        self.max_retry
    }

    #[must_use]
    pub fn confirm_interval(&self) -> u32 {
        self.confirm_interval
    }

    #[must_use]
    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    #[must_use]
    pub fn reading_speed(&self) -> &ReadingSpeed {
        &self.reading_speed
    }

    #[must_use]
    pub fn recency_days(&self) -> u32 {
        self.recency_days
    }

    #[must_use]
    pub fn recency_window(&self) -> Duration {
        Duration::days(i64::from(self.recency_days))
    }

    #[must_use]
    pub fn max_words(&self) -> u32 {
        self.max_words
    }

    /// True when `practice_count` lands on a confirmation boundary.
    #[must_use]
    pub fn is_confirm_due(&self, practice_count: u32) -> bool {
        practice_count > 0 && practice_count % self.confirm_interval == 0
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
