use std::sync::Arc;

use parrot_core::model::PracticeRecord;
use parrot_core::speech::{EndStatus, PhraseKey, SpeechPlan};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{FailureKind, ScenarioError};
use crate::scenario::ScenarioService;
use crate::session_store::SessionData;

//
// ─── INTENT ────────────────────────────────────────────────────────────────────
//

/// A recognized user request for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Welcome,
    UserAnswered { answer: Option<String> },
    SkipArticle,
    SkipSentence,
    SayAgain,
    Goodbye,
    Stop,
    ConfirmContinue { proceed: bool },
}

impl Intent {
    /// Builds an intent from its platform name and slot values.
    ///
    /// Returns `None` for names this skill does not handle.
    #[must_use]
    pub fn from_parts(name: &str, answer: Option<String>, confirm: Option<bool>) -> Option<Self> {
        let intent = match name.trim().to_ascii_lowercase().as_str() {
            "welcome" => Intent::Welcome,
            "user_answered" | "answer" => Intent::UserAnswered { answer },
            "skip_article" => Intent::SkipArticle,
            "skip_sentence" => Intent::SkipSentence,
            "say_again" | "repeat" => Intent::SayAgain,
            "goodbye" => Intent::Goodbye,
            "stop" | "cancel" => Intent::Stop,
            "confirm_continue" => Intent::ConfirmContinue {
                proceed: confirm.unwrap_or(false),
            },
            _ => return None,
        };
        Some(intent)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Welcome => "welcome",
            Intent::UserAnswered { .. } => "user_answered",
            Intent::SkipArticle => "skip_article",
            Intent::SkipSentence => "skip_sentence",
            Intent::SayAgain => "say_again",
            Intent::Goodbye => "goodbye",
            Intent::Stop => "stop",
            Intent::ConfirmContinue { .. } => "confirm_continue",
        }
    }
}

//
// ─── TURN HANDLER ──────────────────────────────────────────────────────────────
//

/// Result of one turn: what to say, what to store, and why it failed if it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub plan: SpeechPlan,
    pub session: SessionData,
    pub failure: Option<FailureKind>,
}

/// Loads the practice from session data, runs the intent and saves the result.
///
/// Failures never escape: each one becomes a spoken apology that closes the
/// conversation, with the practice reset.
#[derive(Clone)]
pub struct TurnHandler {
    scenario: Arc<ScenarioService>,
}

impl TurnHandler {
    #[must_use]
    pub fn new(scenario: Arc<ScenarioService>) -> Self {
        Self { scenario }
    }

    pub async fn handle(&self, session: &SessionData, intent: Intent) -> TurnOutcome {
        let speed = self.scenario.settings().reading_speed();
        let mut record = session.to_record(speed);
        let name = intent.name();

        let result = self
            .dispatch(&mut record, intent)
            .await
            .and_then(|plan| ensure_practice(&record, plan));

        match result {
            Ok(plan) => {
                info!(intent = name, status = ?plan.status(), "turn completed");
                TurnOutcome {
                    plan,
                    session: SessionData::from_record(&record),
                    failure: None,
                }
            }
            Err(err) => {
                let kind = err.kind();
                warn!(intent = name, kind = kind.as_str(), error = %err, "turn failed");
                record.reset(speed);
                TurnOutcome {
                    plan: apology(kind),
                    session: SessionData::from_record(&record),
                    failure: Some(kind),
                }
            }
        }
    }

    async fn dispatch(
        &self,
        record: &mut PracticeRecord,
        intent: Intent,
    ) -> Result<SpeechPlan, ScenarioError> {
        match intent {
            Intent::Welcome => self.scenario.welcome(record).await,
            Intent::UserAnswered { answer } => {
                self.scenario.user_answered(record, answer.as_deref()).await
            }
            Intent::SkipArticle => self.scenario.skip_article(record).await,
            Intent::SkipSentence => self.scenario.skip_sentence(record).await,
            Intent::SayAgain => self.scenario.say_again(record),
            Intent::Goodbye | Intent::Stop => Ok(self.scenario.goodbye(record)),
            Intent::ConfirmContinue { proceed } => {
                self.scenario.confirm_continue(record, proceed).await
            }
        }
    }
}

/// A turn that keeps listening must leave a practice to come back to.
fn ensure_practice(record: &PracticeRecord, plan: SpeechPlan) -> Result<SpeechPlan, ScenarioError> {
    if plan.status() != EndStatus::Close && record.is_fresh() {
        return Err(ScenarioError::PracticeNotFound);
    }
    Ok(plan)
}

/// Spoken apology for a failed turn.
#[must_use]
pub fn apology(kind: FailureKind) -> SpeechPlan {
    let key = match kind {
        FailureKind::SentenceNotFound => PhraseKey::SentenceNotFound,
        FailureKind::AvailableArticleNotExist => PhraseKey::ArticleNotExist,
        FailureKind::ArticleNotFound => PhraseKey::ArticleNotFound,
        FailureKind::PracticeNotFound => PhraseKey::PracticeNotFound,
        FailureKind::Internal => PhraseKey::InternalError,
    };
    SpeechPlan::new().reply(key).finish(EndStatus::Close)
}
