use std::sync::Arc;

use parrot_core::Clock;
use parrot_core::model::{AnswerResult, Article, PracticeRecord, ScenarioSettings, Tier};
use parrot_core::speech::{EndStatus, PhraseKey, SpeechPlan, practice_count_message};
use parrot_core::time::from_now;
use storage::repository::{ArticleRepository, Eligibility};
use tracing::{debug, info};

use super::advance::{Advance, next_article};
use crate::error::ScenarioError;

/// Pause before the sentence to repeat.
const LEAD_IN_MILLIS: u32 = 1000;

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Runs one conversational turn of the practice dialogue.
///
/// Every operation mutates the given `PracticeRecord` in place and returns the
/// speech for the turn. On error the record is reset before the error is
/// returned, so a failed turn never leaves a half-advanced practice behind.
#[derive(Clone)]
pub struct ScenarioService {
    clock: Clock,
    settings: ScenarioSettings,
    articles: Arc<dyn ArticleRepository>,
}

impl ScenarioService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: ScenarioSettings,
        articles: Arc<dyn ArticleRepository>,
    ) -> Self {
        Self {
            clock,
            settings,
            articles,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ScenarioSettings {
        &self.settings
    }

    /// Greets the user and starts from the newest eligible article.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::AvailableArticleNotExist` if there is nothing to practice.
    pub async fn welcome(&self, record: &mut PracticeRecord) -> Result<SpeechPlan, ScenarioError> {
        record.reset(self.settings.reading_speed());
        let mut plan = SpeechPlan::new();
        plan.reply(PhraseKey::Welcome).reply(PhraseKey::Yell);
        let outcome = self
            .start_next(record, &mut plan, Advance::NextArticle)
            .await
            .map(|()| plan.finish(EndStatus::WaitingAnswer));
        self.settle(record, outcome)
    }

    /// Judges the user's repetition and retries, advances or asks to continue.
    ///
    /// An absent or blank answer re-prompts the same sentence without using up
    /// a retry.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::SentenceNotFound` if no sentence is being
    /// practiced, or a repository error while advancing.
    pub async fn user_answered(
        &self,
        record: &mut PracticeRecord,
        spoken: Option<&str>,
    ) -> Result<SpeechPlan, ScenarioError> {
        let outcome = self.judge(record, spoken).await;
        self.settle(record, outcome)
    }

    /// Drops the current article and starts the next one.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the current or next article cannot be loaded.
    pub async fn skip_article(
        &self,
        record: &mut PracticeRecord,
    ) -> Result<SpeechPlan, ScenarioError> {
        let mut plan = SpeechPlan::new();
        plan.reply(PhraseKey::Accepted).reply(PhraseKey::SkipArticle);
        let outcome = self
            .start_next(record, &mut plan, Advance::NextArticle)
            .await
            .map(|()| plan.finish(EndStatus::WaitingAnswer));
        self.settle(record, outcome)
    }

    /// Moves on to the next sentence, crossing into the next article when needed.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the current sentence or next article cannot be resolved.
    pub async fn skip_sentence(
        &self,
        record: &mut PracticeRecord,
    ) -> Result<SpeechPlan, ScenarioError> {
        let mut plan = SpeechPlan::new();
        plan.reply(PhraseKey::Accepted).reply(PhraseKey::SkipSentence);
        let outcome = self
            .start_next(record, &mut plan, Advance::NextSentence)
            .await
            .map(|()| plan.finish(EndStatus::WaitingAnswer));
        self.settle(record, outcome)
    }

    /// Reads the current sentence again, a little slower.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError::SentenceNotFound` if no sentence is being practiced.
    pub fn say_again(&self, record: &mut PracticeRecord) -> Result<SpeechPlan, ScenarioError> {
        let outcome = if record.has_question() {
            record.slow_down(self.settings.reading_speed());
            let mut plan = SpeechPlan::new();
            plan.reply(PhraseKey::Accepted);
            Ok(self.read_question(record, &mut plan))
        } else {
            Err(ScenarioError::SentenceNotFound)
        };
        self.settle(record, outcome)
    }

    /// Answer to the periodic "continue?" question.
    ///
    /// # Errors
    ///
    /// Same as `skip_article` when the user continues.
    pub async fn confirm_continue(
        &self,
        record: &mut PracticeRecord,
        proceed: bool,
    ) -> Result<SpeechPlan, ScenarioError> {
        if proceed {
            self.skip_article(record).await
        } else {
            Ok(self.goodbye(record))
        }
    }

    /// Ends the conversation.
    pub fn goodbye(&self, record: &mut PracticeRecord) -> SpeechPlan {
        record.reset(self.settings.reading_speed());
        SpeechPlan::new()
            .reply(PhraseKey::Goodbye)
            .finish(EndStatus::Close)
    }

    async fn judge(
        &self,
        record: &mut PracticeRecord,
        spoken: Option<&str>,
    ) -> Result<SpeechPlan, ScenarioError> {
        if !record.has_question() {
            return Err(ScenarioError::SentenceNotFound);
        }

        let mut plan = SpeechPlan::new();
        let Some(spoken) = spoken.map(str::trim).filter(|s| !s.is_empty()) else {
            debug!("no speech recognized; prompting again");
            plan.reply(PhraseKey::Again);
            return Ok(self.read_question(record, &mut plan));
        };

        let result =
            AnswerResult::evaluate(record.question_text(), spoken, self.settings.thresholds())?;
        info!(
            article_id = %record.article_id(),
            score = result.score(),
            tier = result.tier().as_str(),
            retry_count = record.retry_count(),
            "answer judged"
        );

        if record.retry_count() < self.settings.max_retry() && result.tier().wants_retry() {
            record.increment_retry_count();
            record.slow_down(self.settings.reading_speed());
            if result.tier() == Tier::Regrettable {
                plan.reply(PhraseKey::Regrettable);
            }
            plan.reply(PhraseKey::Again);
            return Ok(self.read_question(record, &mut plan));
        }

        plan.reply(PhraseKey::for_tier(result.tier()));

        let count = record.practice_count();
        if self.settings.is_confirm_due(count) {
            info!(practice_count = count, "asking to continue");
            let question = format!(
                "{} {}",
                practice_count_message(count),
                PhraseKey::ContinuePractice.pick()
            );
            plan.reply_text(PhraseKey::ContinuePractice, question);
            return Ok(plan.finish(EndStatus::Confirm));
        }

        self.start_next(record, &mut plan, Advance::NextSentence)
            .await?;
        Ok(plan.finish(EndStatus::WaitingAnswer))
    }

    /// Loads the next sentence into `record` and appends it to `plan`,
    /// introducing the article when the sentence is its first.
    async fn start_next(
        &self,
        record: &mut PracticeRecord,
        plan: &mut SpeechPlan,
        mode: Advance,
    ) -> Result<(), ScenarioError> {
        let now = self.clock.now();
        let eligibility = Eligibility::from_settings(&self.settings, now);
        let article =
            next_article(self.articles.as_ref(), record, mode, &eligibility, now).await?;

        record.begin_new_sentence(&article, self.settings.reading_speed());
        info!(
            article_id = %article.id(),
            index = article.current_index(),
            practice_count = record.practice_count(),
            "practice started"
        );

        if article.is_first_sentence() {
            self.introduce(plan, &article);
        }
        plan.pause(LEAD_IN_MILLIS)
            .quote(record.question_text(), record.reading_speed_rate());
        Ok(())
    }

    fn introduce(&self, plan: &mut SpeechPlan, article: &Article) {
        plan.reply(PhraseKey::Introduction)
            .raw(format!("\"{}\"", article.title()))
            .credit(
                article.source(),
                from_now(article.published_at(), self.clock.now()),
            )
            .reply(PhraseKey::RepeatAfterMe);
    }

    fn read_question(&self, record: &PracticeRecord, plan: &mut SpeechPlan) -> SpeechPlan {
        plan.pause(LEAD_IN_MILLIS)
            .quote(record.question_text(), record.reading_speed_rate())
            .finish(EndStatus::WaitingAnswer)
    }

    fn settle(
        &self,
        record: &mut PracticeRecord,
        outcome: Result<SpeechPlan, ScenarioError>,
    ) -> Result<SpeechPlan, ScenarioError> {
        if let Err(err) = &outcome {
            debug!(error = %err, "turn failed; resetting practice");
            record.reset(self.settings.reading_speed());
        }
        outcome
    }
}
