use serde::{Deserialize, Serialize};

use crate::speech::phrases::PhraseKey;
use crate::speech::segment::Segment;

/// How the platform should treat the end of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndStatus {
    /// More speech follows in the same plan.
    #[default]
    Continue,
    /// Keep the microphone open for the user's repetition.
    WaitingAnswer,
    /// Ask a yes/no continuation question.
    Confirm,
    /// End the conversation.
    Close,
}

impl EndStatus {
    /// True if the platform should keep listening after speaking.
    ///
    /// `Continue` should never be the final tag of a turn; it is treated as an
    /// ask so the user is not cut off.
    #[must_use]
    pub fn expects_user_response(self) -> bool {
        !matches!(self, EndStatus::Close)
    }
}

/// Ordered speech segments for one turn plus its terminal status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechPlan {
    segments: Vec<Segment>,
    status: EndStatus,
}

impl SpeechPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn status(&self) -> EndStatus {
        self.status
    }

    pub fn push(&mut self, segment: Segment) -> &mut Self {
        self.segments.push(segment);
        self
    }

    /// Appends a randomly worded phrase from the given category.
    pub fn reply(&mut self, key: PhraseKey) -> &mut Self {
        self.push(Segment::reply(key))
    }

    /// Appends a phrase with fixed wording.
    pub fn reply_text(&mut self, key: PhraseKey, text: impl Into<String>) -> &mut Self {
        self.push(Segment::Reply {
            key,
            text: text.into(),
        })
    }

    pub fn quote(&mut self, text: impl Into<String>, rate: u32) -> &mut Self {
        self.push(Segment::Quote {
            text: text.into(),
            rate,
        })
    }

    pub fn credit(
        &mut self,
        source: impl Into<String>,
        relative_time: impl Into<String>,
    ) -> &mut Self {
        self.push(Segment::Credit {
            source: source.into(),
            relative_time: relative_time.into(),
        })
    }

    pub fn pause(&mut self, millis: u32) -> &mut Self {
        self.push(Segment::Break { millis })
    }

    pub fn raw(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Segment::RawText { text: text.into() })
    }

    /// Takes the built plan out of the builder, tagged with `status`.
    #[must_use]
    pub fn finish(&mut self, status: EndStatus) -> SpeechPlan {
        self.status = status;
        std::mem::take(self)
    }

    /// True if any segment is a reply of the given category.
    #[must_use]
    pub fn has_reply(&self, key: PhraseKey) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Reply { key: k, .. } if *k == key))
    }

    /// The quoted sentence and its rate, if the plan contains one.
    #[must_use]
    pub fn quote_of(&self) -> Option<(&str, u32)> {
        self.segments.iter().rev().find_map(|s| match s {
            Segment::Quote { text, rate } => Some((text.as_str(), *rate)),
            _ => None,
        })
    }

    /// SSML for voice output, wrapped in `<speak>`.
    #[must_use]
    pub fn to_ssml(&self) -> String {
        format!("<speak>{}</speak>", self.join(Segment::to_ssml))
    }

    /// Plain text for screens and logs.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.join(Segment::to_text)
    }

    fn join(&self, render: fn(&Segment) -> String) -> String {
        self.segments
            .iter()
            .map(render)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_order_and_status() {
        let plan = SpeechPlan::new()
            .reply_text(PhraseKey::Accepted, "Okay.")
            .pause(1000)
            .quote("Markets rallied.", 85)
            .finish(EndStatus::WaitingAnswer);

        assert_eq!(plan.segments().len(), 3);
        assert_eq!(plan.status(), EndStatus::WaitingAnswer);
        assert!(plan.has_reply(PhraseKey::Accepted));
        assert!(!plan.has_reply(PhraseKey::Again));
        assert_eq!(plan.quote_of(), Some(("Markets rallied.", 85)));
    }

    #[test]
    fn renders_ssml_envelope() {
        let plan = SpeechPlan::new()
            .reply_text(PhraseKey::RepeatAfterMe, "Repeat after me.")
            .pause(1000)
            .quote("Markets rallied.", 100)
            .finish(EndStatus::WaitingAnswer);

        assert_eq!(
            plan.to_ssml(),
            "<speak><s>Repeat after me. </s> <break time=\"1s\" /> \
             <s><prosody rate=\"100%\">\"Markets rallied.\" </prosody></s></speak>"
        );
        assert_eq!(plan.to_text(), "Repeat after me. \"Markets rallied.\"");
    }

    #[test]
    fn only_close_ends_listening() {
        assert!(EndStatus::WaitingAnswer.expects_user_response());
        assert!(EndStatus::Confirm.expects_user_response());
        assert!(EndStatus::Continue.expects_user_response());
        assert!(!EndStatus::Close.expects_user_response());
    }
}
