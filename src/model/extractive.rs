// Offline backend wrapping the sentence-scoring summarizer.
use crate::config::LengthBounds;
use crate::error::Result;
use crate::nlp::summarize_extractive;

use super::SummarizationModel;

#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveModel;

impl ExtractiveModel {
    pub fn new() -> Self {
        Self
    }
}

impl SummarizationModel for ExtractiveModel {
    fn name(&self) -> &str {
        "extractive"
    }

    fn summarize(&self, text: &str, bounds: &LengthBounds) -> Result<String> {
        Ok(summarize_extractive(text, bounds.min_length, bounds.max_length))
    }
}
