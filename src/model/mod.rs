// Summarization model adapters.
// A `SummarizationModel` turns one unit of text into a summary within the
// given length bounds. The `ModelRegistry` owns at most one loaded instance
// per language and is handed to the pipeline by reference.
pub mod extractive;
pub mod ollama;

pub use extractive::ExtractiveModel;
pub use ollama::OllamaModel;

use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::{Backend, LengthBounds, SummarizerConfig};
use crate::error::{Result, SummarizeError};
use crate::nlp::Language;

/// Trait for summarization backends
///
/// Implementations are shared read-only across documents, so they must be
/// safe to call from several threads.
pub trait SummarizationModel: Send + Sync {
    /// Model name/identifier, for logs
    fn name(&self) -> &str;

    /// Summarize one unit of text.
    ///
    /// `bounds` limits the output length in model tokens; local backends
    /// approximate tokens with words.
    fn summarize(&self, text: &str, bounds: &LengthBounds) -> Result<String>;
}

pub type ModelLoader = Box<dyn Fn(Language) -> Result<Arc<dyn SummarizationModel>> + Send + Sync>;

/// Lazily loaded model per language.
///
/// The first `get` for a language runs the loader; concurrent first calls
/// block on the same initialization instead of loading twice.
pub struct ModelRegistry {
    loader: ModelLoader,
    arabic: OnceCell<Arc<dyn SummarizationModel>>,
    english: OnceCell<Arc<dyn SummarizationModel>>,
    loads: AtomicUsize,
}

impl ModelRegistry {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn(Language) -> Result<Arc<dyn SummarizationModel>> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            arabic: OnceCell::new(),
            english: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Registry that loads models for the configured backend.
    pub fn from_config(config: &SummarizerConfig) -> Self {
        match config.backend {
            Backend::Extractive => Self::new(|_| Ok(Arc::new(ExtractiveModel::new()))),
            Backend::Ollama => {
                let arabic_model = config.arabic.model.clone();
                let english_model = config.english.model.clone();
                let pull_missing = config.pull_missing;
                Self::new(move |language| {
                    let model = match language {
                        Language::Arabic => &arabic_model,
                        Language::English => &english_model,
                    };
                    let loaded = OllamaModel::load(language, model, pull_missing)?;
                    Ok(Arc::new(loaded))
                })
            }
        }
    }

    /// The loaded model for `language`, loading it on first use.
    ///
    /// A load failure is returned as [`SummarizeError::ModelUnavailable`]; no
    /// other model is substituted.
    pub fn get(&self, language: Language) -> Result<Arc<dyn SummarizationModel>> {
        let cell = match language {
            Language::Arabic => &self.arabic,
            Language::English => &self.english,
        };
        let model = cell.get_or_try_init(|| {
            tracing::info!("Loading {} summarization model", language);
            let model = (self.loader)(language).map_err(|e| match e {
                SummarizeError::ModelUnavailable { .. } => e,
                other => SummarizeError::ModelUnavailable {
                    language,
                    reason: other.to_string(),
                },
            })?;
            self.loads.fetch_add(1, Ordering::SeqCst);
            tracing::info!("Loaded {} model: {}", language, model.name());
            Ok::<_, SummarizeError>(model)
        })?;
        Ok(Arc::clone(model))
    }

    pub fn is_loaded(&self, language: Language) -> bool {
        match language {
            Language::Arabic => self.arabic.get().is_some(),
            Language::English => self.english.get().is_some(),
        }
    }

    /// Number of successful loads so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}
