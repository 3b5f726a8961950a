// docsum: Arabic/English document summarization.
// Text is language-detected, normalized, split into model-sized units,
// summarized unit by unit and merged back in order.
pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod nlp;
pub mod pipeline;
pub mod session;

pub use config::{Backend, LanguageProfile, LengthBounds, Preset, SummarizerConfig};
pub use document::{Document, Source};
pub use error::{Result, SummarizeError};
pub use model::{ModelRegistry, SummarizationModel};
pub use nlp::{Language, LanguageChoice, Summary, SummaryStats, Unit, UnitOutcome};
pub use pipeline::Pipeline;
pub use session::{Session, SessionEvent, SessionState};
