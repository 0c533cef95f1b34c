use serde::{Deserialize, Serialize};

use crate::speech::phrases::PhraseKey;

/// One piece of a spoken reply.
///
/// Every variant renders to SSML for voice output and to plain text for
/// screens and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// A canned phrase; `text` is the wording chosen for this turn.
    Reply { key: PhraseKey, text: String },
    /// The sentence to repeat, spoken at `rate` percent.
    Quote { text: String, rate: u32 },
    /// Attribution, e.g. "from Reuters 3 hours ago."
    Credit { source: String, relative_time: String },
    /// Silence.
    Break { millis: u32 },
    /// Literal text without sentence markup.
    RawText { text: String },
    /// Sound effect with fallback text.
    Audio { src: String, alt: String },
}

impl Segment {
    #[must_use]
    pub fn reply(key: PhraseKey) -> Self {
        Segment::Reply {
            key,
            text: key.pick().to_owned(),
        }
    }

    #[must_use]
    pub fn to_ssml(&self) -> String {
        match self {
            Segment::Reply { text, .. } => sentence(text),
            Segment::Quote { text, rate } => format!(
                "<s><prosody rate=\"{rate}%\">\"{}\" </prosody></s>",
                escape(text)
            ),
            Segment::Credit { .. } => sentence(&self.to_text()),
            Segment::Break { millis } => format!("<break time=\"{}\" />", break_time(*millis)),
            Segment::RawText { text } => escape(text),
            Segment::Audio { src, alt } => {
                format!("<audio src=\"{}\">{}</audio>", escape(src), escape(alt))
            }
        }
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Segment::Reply { text, .. } | Segment::RawText { text } => text.clone(),
            Segment::Quote { text, .. } => format!("\"{text}\""),
            Segment::Credit {
                source,
                relative_time,
            } => format!("from {source} {relative_time}."),
            Segment::Break { .. } => " ".to_owned(),
            Segment::Audio { alt, .. } => alt.clone(),
        }
    }
}

fn sentence(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    format!("<s>{} </s>", escape(text))
}

fn break_time(millis: u32) -> String {
    if millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{millis}ms")
    }
}

/// Escapes characters that would break SSML markup.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_renders_as_sentence() {
        let seg = Segment::Reply {
            key: PhraseKey::Again,
            text: "Try again!".into(),
        };
        assert_eq!(seg.to_ssml(), "<s>Try again! </s>");
        assert_eq!(seg.to_text(), "Try again!");
    }

    #[test]
    fn empty_reply_renders_nothing() {
        let seg = Segment::Reply {
            key: PhraseKey::Again,
            text: String::new(),
        };
        assert_eq!(seg.to_ssml(), "");
    }

    #[test]
    fn quote_carries_prosody_rate() {
        let seg = Segment::Quote {
            text: "Stocks rose on Monday.".into(),
            rate: 85,
        };
        assert_eq!(
            seg.to_ssml(),
            "<s><prosody rate=\"85%\">\"Stocks rose on Monday.\" </prosody></s>"
        );
        assert_eq!(seg.to_text(), "\"Stocks rose on Monday.\"");
    }

    #[test]
    fn credit_combines_source_and_time() {
        let seg = Segment::Credit {
            source: "Reuters".into(),
            relative_time: "3 hours ago".into(),
        };
        assert_eq!(seg.to_text(), "from Reuters 3 hours ago.");
        assert_eq!(seg.to_ssml(), "<s>from Reuters 3 hours ago. </s>");
    }

    #[test]
    fn break_and_audio_markup() {
        assert_eq!(Segment::Break { millis: 1000 }.to_ssml(), "<break time=\"1s\" />");
        assert_eq!(Segment::Break { millis: 500 }.to_ssml(), "<break time=\"500ms\" />");
        assert_eq!(Segment::Break { millis: 500 }.to_text(), " ");

        let audio = Segment::Audio {
            src: "https://example.com/chime.ogg".into(),
            alt: "chime".into(),
        };
        assert_eq!(
            audio.to_ssml(),
            "<audio src=\"https://example.com/chime.ogg\">chime</audio>"
        );
        assert_eq!(audio.to_text(), "chime");
    }

    #[test]
    fn markup_characters_are_escaped() {
        let seg = Segment::RawText {
            text: "AT&T <beta>".into(),
        };
        assert_eq!(seg.to_ssml(), "AT&amp;T &lt;beta&gt;");
        assert_eq!(seg.to_text(), "AT&T <beta>");
    }
}
