use std::sync::LazyLock;

use regex::Regex;

/// Topics not suitable for casual practice.
const SENSITIVE_WORDS: &[&str] = &[
    "kill", "death", "died", "dead", "murder", "slaughter", "massacre", "wound", "injure",
    "shooting", "rampage", "suicide", "homicide", "genocide", "attack", "assault", "outrage",
    "rape", "abuse",
];

/// Words the voice platform would take as a command if the user repeated them.
const COMMAND_WORDS: &[&str] = &["stop", "skip", "next", "goodbye", "article", "sentence"];

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<&str> = SENSITIVE_WORDS.iter().chain(COMMAND_WORDS).copied().collect();
    build(&words).expect("blocked word pattern should compile")
});

fn build(words: &[&str]) -> Result<Regex, regex::Error> {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})"))
}

/// Rejects sentences that mention blocked words.
///
/// Matching is case-insensitive and anchored at the start of a word, so
/// "killing" is blocked but "skilled" is not.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    pattern: Regex,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }
}

impl ContentFilter {
    /// Filter over a custom word list.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the combined pattern is too large to compile.
    pub fn new(words: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: build(words)?,
        })
    }

    #[must_use]
    pub fn is_blocked(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    #[must_use]
    pub fn is_allowed(&self, text: &str) -> bool {
        !self.is_blocked(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_sensitive_topics() {
        let filter = ContentFilter::default();
        assert!(filter.is_blocked(
            "William Finlay told police he should be \"shot in the head\" after killing the grandmother."
        ));
        assert!(filter.is_blocked("Man who hurt ex-wife by Shooting her with crossbow"));
    }

    #[test]
    fn blocks_platform_commands() {
        let filter = ContentFilter::default();
        assert!(filter.is_blocked("Skip the queue at the airport."));
        assert!(filter.is_blocked("The next election is in May."));
    }

    #[test]
    fn allows_ordinary_sentences() {
        let filter = ContentFilter::default();
        assert!(filter.is_allowed("More than 30 years later Sweden's biggest mystery remains unsolved."));
        assert!(filter.is_allowed("She is a skilled carpenter."));
    }

    #[test]
    fn custom_word_list() {
        let filter = ContentFilter::new(&["brexit"]).unwrap();
        assert!(filter.is_blocked("Brexit talks resume."));
        assert!(filter.is_allowed("Skip the queue."));
    }
}
