pub mod phrases;
pub mod plan;
pub mod segment;

pub use phrases::{PhraseKey, practice_count_message};
pub use plan::{EndStatus, SpeechPlan};
pub use segment::Segment;
