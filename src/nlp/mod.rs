// Text-side stages of the summarization pipeline
pub mod assemble;
pub mod language;
pub mod normalize;
pub mod segment;
pub mod summarization;

pub use assemble::{assemble, Summary, SummaryStats, UnitOutcome};
pub use language::{detect, detect_with_threshold, Language, LanguageChoice};
pub use normalize::normalize;
pub use segment::{segment, segment_with, SegmentStrategy, Unit};
pub use summarization::summarize_extractive;
