//! Preparing article text for practice.

pub mod filter;
pub mod splitter;

pub use filter::ContentFilter;
pub use splitter::{SentenceSplitter, word_count};
