use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::model::Tier;

/// Category of canned phrase. Categories with several variants are picked at
/// random each time so the assistant does not sound scripted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PhraseKey {
    Welcome,
    Goodbye,
    Yell,
    Accepted,
    Again,
    Excellent,
    Good,
    Regrettable,
    Poor,
    SkipSentence,
    SkipArticle,
    Introduction,
    RepeatAfterMe,
    ContinuePractice,
    SentenceNotFound,
    ArticleNotExist,
    ArticleNotFound,
    PracticeNotFound,
    InternalError,
}

impl PhraseKey {
    /// All wordings of this phrase.
    #[must_use]
    pub fn variants(self) -> &'static [&'static str] {
        match self {
            PhraseKey::Welcome => &["Welcome to Parrot Fashion Training."],
            PhraseKey::Goodbye => &["Goodbye.", "Bye.", "See you again."],
            PhraseKey::Yell => &["Let's start.", "Let's begin.", "Here we go."],
            PhraseKey::Accepted => &["Okay.", "All right!", "Sure!"],
            PhraseKey::Again => &["Try again!"],
            PhraseKey::Excellent => &["Perfect!", "Excellent!"],
            PhraseKey::Good => &["OK!", "Good job!", "Well done!"],
            PhraseKey::Regrettable => &["So close!", "Almost had it!"],
            PhraseKey::Poor => &["Don't mind!", "Let's do your best next time!"],
            PhraseKey::SkipSentence => &["Let's start the next sentence."],
            PhraseKey::SkipArticle => &["Let's start the next article."],
            PhraseKey::Introduction => &["The title of the next article is"],
            PhraseKey::RepeatAfterMe => &["Repeat after me."],
            PhraseKey::ContinuePractice => &["Do you want to continue?"],
            PhraseKey::SentenceNotFound => {
                &["Sorry, I lost track of the current sentence. Please start again."]
            }
            PhraseKey::ArticleNotExist => {
                &["Sorry, there are no articles to practice right now. Please come back later."]
            }
            PhraseKey::ArticleNotFound => {
                &["Sorry, that article is no longer available. Please start again."]
            }
            PhraseKey::PracticeNotFound => {
                &["Sorry, there is no practice in progress. Please start again."]
            }
            PhraseKey::InternalError => &["Sorry, something went wrong. Please try again later."],
        }
    }

    /// Picks one wording using the thread-local generator.
    #[must_use]
    pub fn pick(self) -> &'static str {
        self.pick_with(&mut rand::rng())
    }

    /// Picks one wording using the given generator.
    #[must_use]
    pub fn pick_with<R: Rng + ?Sized>(self, rng: &mut R) -> &'static str {
        self.variants().choose(rng).copied().unwrap_or_default()
    }

    /// True if `text` is one of this phrase's wordings.
    #[must_use]
    pub fn contains(self, text: &str) -> bool {
        self.variants().contains(&text)
    }

    /// Result phrase for an answer tier.
    #[must_use]
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Poor => PhraseKey::Poor,
            Tier::Regrettable => PhraseKey::Regrettable,
            Tier::Good => PhraseKey::Good,
            Tier::Excellent => PhraseKey::Excellent,
        }
    }
}

/// Sentence announcing how many practices the user has done.
#[must_use]
pub fn practice_count_message(count: u32) -> String {
    match count {
        1 => "You have trained once.".to_owned(),
        n => format!("You have trained {n} times."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn picks_stay_within_category() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let phrase = PhraseKey::Goodbye.pick_with(&mut rng);
            assert!(PhraseKey::Goodbye.contains(phrase));
            assert!(!PhraseKey::Yell.contains(phrase));
        }
    }

    #[test]
    fn every_category_has_a_wording() {
        let keys = [
            PhraseKey::Welcome,
            PhraseKey::Goodbye,
            PhraseKey::Yell,
            PhraseKey::Accepted,
            PhraseKey::Again,
            PhraseKey::Excellent,
            PhraseKey::Good,
            PhraseKey::Regrettable,
            PhraseKey::Poor,
            PhraseKey::SkipSentence,
            PhraseKey::SkipArticle,
            PhraseKey::Introduction,
            PhraseKey::RepeatAfterMe,
            PhraseKey::ContinuePractice,
            PhraseKey::SentenceNotFound,
            PhraseKey::ArticleNotExist,
            PhraseKey::ArticleNotFound,
            PhraseKey::PracticeNotFound,
            PhraseKey::InternalError,
        ];
        for key in keys {
            assert!(!key.pick().is_empty(), "{key:?}");
        }
    }

    #[test]
    fn tiers_map_to_result_phrases() {
        assert_eq!(PhraseKey::for_tier(Tier::Poor), PhraseKey::Poor);
        assert_eq!(PhraseKey::for_tier(Tier::Excellent), PhraseKey::Excellent);
    }

    #[test]
    fn practice_count_wording() {
        assert_eq!(practice_count_message(1), "You have trained once.");
        assert_eq!(practice_count_message(10), "You have trained 10 times.");
    }
}
