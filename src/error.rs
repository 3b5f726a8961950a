use thiserror::Error;

use crate::nlp::Language;

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Model unavailable for {language}: {reason}")]
    ModelUnavailable { language: Language, reason: String },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SummarizeError>;
