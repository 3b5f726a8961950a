// Backend that runs local models through the `ollama` CLI.
use std::process::{Command, Output};

use crate::config::LengthBounds;
use crate::error::{Result, SummarizeError};
use crate::nlp::Language;

use super::SummarizationModel;

const OLLAMA_BIN: &str = "ollama";

#[derive(Debug, Clone)]
pub struct OllamaModel {
    model: String,
    language: Language,
}

fn ollama(args: &[&str]) -> std::io::Result<Output> {
    Command::new(OLLAMA_BIN).args(args).output()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

impl OllamaModel {
    /// Make sure `model` is installed, pulling it first when `pull_missing` is set.
    ///
    /// Pulling downloads the model weights and can take minutes.
    pub fn load(language: Language, model: &str, pull_missing: bool) -> Result<Self> {
        let unavailable = |reason: String| SummarizeError::ModelUnavailable { language, reason };

        let show = ollama(&["show", model])
            .map_err(|e| unavailable(format!("failed to invoke {}: {}", OLLAMA_BIN, e)))?;

        if !show.status.success() {
            if !pull_missing {
                return Err(unavailable(format!(
                    "model {} is not installed (run `ollama pull {}`)",
                    model, model
                )));
            }
            tracing::info!("Pulling model {} for {}", model, language);
            let pull = ollama(&["pull", model])
                .map_err(|e| unavailable(format!("failed to invoke {}: {}", OLLAMA_BIN, e)))?;
            if !pull.status.success() {
                return Err(unavailable(format!("pull of {} failed: {}", model, stderr_text(&pull))));
            }
        }

        Ok(Self {
            model: model.to_string(),
            language,
        })
    }
}

/// Instruction sent to the model for one unit.
pub fn build_prompt(language: Language, text: &str, bounds: &LengthBounds) -> String {
    match language {
        Language::English => format!(
            "Summarize the following text in {} to {} words. \
             Output only the summary, without preamble or quotes.\n\nText:\n{}",
            bounds.min_length, bounds.max_length, text
        ),
        Language::Arabic => format!(
            "لخص النص التالي باللغة العربية في ما بين {} و {} كلمة. \
             اكتب الملخص فقط دون أي مقدمة.\n\nالنص:\n{}",
            bounds.min_length, bounds.max_length, text
        ),
    }
}

impl SummarizationModel for OllamaModel {
    fn name(&self) -> &str {
        &self.model
    }

    fn summarize(&self, text: &str, bounds: &LengthBounds) -> Result<String> {
        let prompt = build_prompt(self.language, text, bounds);
        let output = ollama(&["run", &self.model, &prompt])
            .map_err(|e| SummarizeError::Inference(format!("failed to invoke {}: {}", OLLAMA_BIN, e)))?;

        if !output.status.success() {
            return Err(SummarizeError::Inference(format!(
                "ollama run failed ({}): {}",
                self.model,
                stderr_text(&output)
            )));
        }

        let summary = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if summary.is_empty() {
            return Err(SummarizeError::Inference(format!("{} returned no text", self.model)));
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_prompt_carries_bounds() {
        let bounds = LengthBounds {
            max_length: 150,
            min_length: 50,
        };
        let prompt = build_prompt(Language::English, "Some text.", &bounds);
        assert!(prompt.contains("50 to 150 words"));
        assert!(prompt.ends_with("Some text."));
    }

    #[test]
    fn test_arabic_prompt_is_arabic() {
        let bounds = LengthBounds {
            max_length: 120,
            min_length: 40,
        };
        let prompt = build_prompt(Language::Arabic, "نص قصير", &bounds);
        assert!(prompt.starts_with("لخص"));
        assert!(prompt.contains("40"));
        assert!(prompt.contains("120"));
        assert!(prompt.ends_with("نص قصير"));
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        // Fails whether or not ollama is installed: either the binary or the model is missing.
        let result = OllamaModel::load(Language::English, "docsum-test-model-that-does-not-exist", false);
        assert!(matches!(
            result,
            Err(SummarizeError::ModelUnavailable {
                language: Language::English,
                ..
            })
        ));
    }

    #[test]
    fn test_failed_pull_is_unavailable() {
        // With pulling enabled a missing model still ends as ModelUnavailable once the pull fails.
        let result = OllamaModel::load(Language::Arabic, "docsum-test-model-that-does-not-exist", true);
        assert!(matches!(
            result,
            Err(SummarizeError::ModelUnavailable {
                language: Language::Arabic,
                ..
            })
        ));
    }
}
