use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while scoring an answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("original text has no words to compare against")]
    InvalidInput,
}

/// Errors raised by invalid tier thresholds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TierError {
    #[error("tier thresholds must be strictly increasing (regrettable < good < excellent)")]
    NotIncreasing,
}

//
// ─── TIER ─────────────────────────────────────────────────────────────────────
//

/// Bucketed judgment of how close a spoken answer came to the sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Poor,
    Regrettable,
    Good,
    Excellent,
}

impl Tier {
    /// Tiers that ask the user to try the same sentence again.
    #[must_use]
    pub fn wants_retry(self) -> bool {
        matches!(self, Tier::Poor | Tier::Regrettable)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Poor => "poor",
            Tier::Regrettable => "regrettable",
            Tier::Good => "good",
            Tier::Excellent => "excellent",
        }
    }
}

/// Lower bounds (inclusive) of the upper three tiers; anything below
/// `regrettable` is `Poor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    regrettable: u32,
    good: u32,
    excellent: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            regrettable: 60,
            good: 80,
            excellent: 100,
        }
    }
}

impl TierThresholds {
    /// Creates custom thresholds.
    ///
    /// # Errors
    ///
    /// Returns `TierError::NotIncreasing` unless `regrettable < good < excellent`.
    pub fn new(regrettable: u32, good: u32, excellent: u32) -> Result<Self, TierError> {
        if regrettable >= good || good >= excellent {
            return Err(TierError::NotIncreasing);
        }
        Ok(Self {
            regrettable,
            good,
            excellent,
        })
    }

    #[must_use]
    pub fn regrettable(&self) -> u32 {
        self.regrettable
    }

    #[must_use]
    pub fn good(&self) -> u32 {
        self.good
    }

    #[must_use]
    pub fn excellent(&self) -> u32 {
        self.excellent
    }

    /// Maps a percentage onto exactly one tier.
    #[must_use]
    pub fn classify(&self, score: u32) -> Tier {
        if score >= self.excellent {
            Tier::Excellent
        } else if score >= self.good {
            Tier::Good
        } else if score >= self.regrettable {
            Tier::Regrettable
        } else {
            Tier::Poor
        }
    }
}

//
// ─── SCORING ──────────────────────────────────────────────────────────────────
//

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern should compile"));

/// Reduces text to its lower-cased word tokens joined by single spaces.
///
/// Punctuation and apostrophes act as separators: `"Thursday's"` becomes
/// `"thursday s"`.
#[must_use]
pub fn normalize(text: &str) -> String {
    WORD.find_iter(text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Character-level Levenshtein distance.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Percentage similarity of `spoken` to `original`.
///
/// Both sides are normalized, then the edit distance is reduced by a
/// tolerance of one eighth of the original length before it counts against
/// the score. The result is floored and never negative.
///
/// # Errors
///
/// Returns `ScoreError::InvalidInput` if `original` has no words.
pub fn similarity(original: &str, spoken: &str) -> Result<u32, ScoreError> {
    let original = normalize(original);
    let spoken = normalize(spoken);

    let length = original.chars().count();
    if length == 0 {
        return Err(ScoreError::InvalidInput);
    }

    #[allow(clippy::cast_precision_loss)]
    let (length, distance) = (length as f64, levenshtein(&original, &spoken) as f64);
    let difference = (distance - length / 8.0).max(0.0);
    let rate = ((length - difference) / length * 100.0).floor().max(0.0);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(rate as u32)
}

//
// ─── ANSWER RESULT ────────────────────────────────────────────────────────────
//

/// Score of a single answer plus its tier. Recomputed every turn, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerResult {
    score: u32,
    tier: Tier,
}

impl AnswerResult {
    /// Scores `spoken` against `original` and classifies it.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::InvalidInput` if `original` has no words.
    pub fn evaluate(
        original: &str,
        spoken: &str,
        thresholds: &TierThresholds,
    ) -> Result<Self, ScoreError> {
        let score = similarity(original, spoken)?;
        Ok(Self::from_score(score, thresholds))
    }

    #[must_use]
    pub fn from_score(score: u32, thresholds: &TierThresholds) -> Self {
        Self {
            score,
            tier: thresholds.classify(score),
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn tier(&self) -> Tier {
        self.tier
    }

    #[must_use]
    pub fn is_poor(&self) -> bool {
        self.tier == Tier::Poor
    }

    #[must_use]
    pub fn is_regrettable(&self) -> bool {
        self.tier == Tier::Regrettable
    }

    #[must_use]
    pub fn is_good(&self) -> bool {
        self.tier == Tier::Good
    }

    #[must_use]
    pub fn is_excellent(&self) -> bool {
        self.tier == Tier::Excellent
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
