use std::sync::LazyLock;

use regex::Regex;

const INTERROGATIVES: &[&str] = &["what", "who", "where", "when", "why", "how", "whose"];

const CONJUNCTIONS: &[&str] = &[
    "and", "after", "also", "although", "because", "before", "but", "however", "if", "that",
    "though", "unless", "until",
];

const PREPOSITIONS: &[&str] = &[
    "about",
    "as",
    "at",
    "between",
    "during",
    "for",
    "from",
    "in",
    "on",
    "over",
    "regarding",
    "since",
    "till",
    "to",
    "under",
    "unless",
    "until",
    "with",
    "within",
    "without",
];

/// Words that end with a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "st", "jr", "sr", "vs", "gov", "sen", "rep", "gen", "prof", "inc",
    "co", "corp", "ltd", "no",
];

static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?]["'”’)]*\s+"#).expect("sentence boundary pattern should compile")
});

/// Breaks article bodies into sentences short enough to repeat aloud.
///
/// Text is first cut at sentence boundaries. Sentences of `split_over` words
/// or more are then cut after commas, and before interrogatives,
/// conjunctions and prepositions, one delimiter at a time until each piece is
/// short enough. Pieces under `min_words` words are joined back onto a
/// neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSplitter {
    min_words: usize,
    split_over: usize,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self {
            min_words: 3,
            split_over: 10,
        }
    }
}

impl SentenceSplitter {
    #[must_use]
    pub fn new(min_words: usize, split_over: usize) -> Self {
        Self {
            min_words,
            split_over,
        }
    }

    #[must_use]
    pub fn split(&self, text: &str) -> Vec<String> {
        sentences(text)
            .iter()
            .flat_map(|s| self.split_sentence(s))
            .collect()
    }

    fn split_sentence(&self, sentence: &str) -> Vec<String> {
        let mut pieces = vec![sentence.to_owned()];
        for delimiters in [&[","][..], INTERROGATIVES, CONJUNCTIONS, PREPOSITIONS] {
            let mut cut = Vec::with_capacity(pieces.len());
            for piece in &pieces {
                self.cut(piece, delimiters, &mut cut);
            }
            pieces = self.rejoin(cut);
        }
        pieces
    }

    fn cut(&self, piece: &str, delimiters: &[&str], out: &mut Vec<String>) {
        let Some((delimiter, rest)) = delimiters.split_first() else {
            out.push(piece.to_owned());
            return;
        };
        if word_count(piece) < self.split_over {
            out.push(piece.to_owned());
            return;
        }

        // Commas stay with the left piece, words start the right piece.
        let needle = if delimiter.chars().all(char::is_alphabetic) {
            format!(" {delimiter} ")
        } else {
            format!("{delimiter} ")
        };

        let mut start = 0;
        for (idx, _) in piece.match_indices(&needle) {
            let part = piece[start..=idx].trim();
            if !part.is_empty() {
                self.cut(part, rest, out);
            }
            start = idx + 1;
        }
        let tail = piece[start..].trim();
        if !tail.is_empty() {
            self.cut(tail, rest, out);
        }
    }

    fn rejoin(&self, pieces: Vec<String>) -> Vec<String> {
        let mut out = Vec::with_capacity(pieces.len());
        let mut rest = pieces.into_iter().peekable();
        let Some(mut current) = rest.next() else {
            return out;
        };

        while let Some(next) = rest.next() {
            let is_last = rest.peek().is_none();
            let join = word_count(&current) < self.min_words
                || (is_last && word_count(&next) < self.min_words)
                || (current.ends_with(',') && next.starts_with("and "));
            if join {
                current.push(' ');
                current.push_str(&next);
            } else {
                out.push(std::mem::replace(&mut current, next));
            }
        }
        out.push(current);
        out
    }
}

/// Number of whitespace-separated words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    for m in BOUNDARY.find_iter(text) {
        let opens_sentence = text[m.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit() || c == '"' || c == '“');
        let abbreviated =
            m.as_str().starts_with('.') && ends_with_abbreviation(&text[start..m.start()]);
        if !opens_sentence || abbreviated {
            continue;
        }
        push_collapsed(&mut out, &text[start..m.end()]);
        start = m.end();
    }
    push_collapsed(&mut out, &text[start..]);
    out
}

fn ends_with_abbreviation(head: &str) -> bool {
    let last = head
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    last.chars().count() == 1
        || last.contains('.')
        || ABBREVIATIONS.contains(&last.to_lowercase().as_str())
}

fn push_collapsed(out: &mut Vec<String>, text: &str) {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        out.push(collapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        SentenceSplitter::default().split(text)
    }

    #[test]
    fn short_sentences_are_untouched() {
        assert_eq!(
            split("Stocks rose on Monday. Oil prices fell."),
            vec!["Stocks rose on Monday.", "Oil prices fell."]
        );
    }

    #[test]
    fn abbreviations_do_not_end_sentences() {
        assert_eq!(
            split("Mr. Smith met Dr. Jones in the U.S. Capitol. They talked."),
            vec!["Mr. Smith met Dr. Jones in the U.S. Capitol.", "They talked."]
        );
    }

    #[test]
    fn long_sentence_splits_before_conjunction() {
        assert_eq!(
            split("A surge of severe lung ailments has baffled doctors and public health experts."),
            vec![
                "A surge of severe lung ailments has baffled doctors",
                "and public health experts.",
            ]
        );
        assert_eq!(
            split(
                "Health officials around the country are still investigating numerous possible \
                 causes and have tested only some of the devices used by ill patients."
            ),
            vec![
                "Health officials around the country are still investigating numerous possible causes",
                "and have tested only some of the devices used by ill patients.",
            ]
        );
    }

    #[test]
    fn long_sentence_splits_after_commas() {
        assert_eq!(
            split(
                "To expand the pool of workers, companies are recruiting stay-at-home parents, \
                 retirees and people with disabilities."
            ),
            vec![
                "To expand the pool of workers,",
                "companies are recruiting stay-at-home parents,",
                "retirees and people with disabilities.",
            ]
        );
    }

    #[test]
    fn short_fragments_join_the_next_piece() {
        assert_eq!(
            split(
                "Even before women had the right to vote, Blaché, in her actions and in her \
                 films, expressed female drives, desires and self-determination."
            ),
            vec![
                "Even before women had the right to vote,",
                "Blaché, in her actions and in her films,",
                "expressed female drives,",
                "desires and self-determination.",
            ]
        );
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(split("  Rain\n fell   today.  "), vec!["Rain fell today."]);
        assert!(split("   ").is_empty());
    }

    #[test]
    fn counts_words() {
        assert_eq!(word_count("one  two\tthree"), 3);
        assert_eq!(word_count(""), 0);
    }
}
