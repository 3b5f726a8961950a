// End-to-end summarization of one document.
// detect → normalize → segment → summarize each unit in order → assemble.
// Units are processed sequentially so outcomes line up with unit order.
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{LengthBounds, SummarizerConfig};
use crate::document::Document;
use crate::error::Result;
use crate::model::{ModelRegistry, SummarizationModel};
use crate::nlp::{
    assemble, normalize, segment_with, Language, LanguageChoice, Summary, Unit, UnitOutcome,
};

pub struct Pipeline<'a> {
    config: &'a SummarizerConfig,
    registry: &'a ModelRegistry,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a SummarizerConfig, registry: &'a ModelRegistry) -> Self {
        Self { config, registry }
    }

    /// Normalized units for `document`, without summarizing them.
    pub fn units(&self, document: &Document, choice: LanguageChoice) -> Vec<Unit> {
        self.prepare(document, choice).1
    }

    fn prepare(&self, document: &Document, choice: LanguageChoice) -> (Language, Vec<Unit>) {
        let language = choice.resolve(document.text(), self.config.detection_threshold);
        let profile = self.config.profile(language);
        let normalized = normalize(document.text(), language);
        let units = segment_with(&normalized, profile.strategy, profile.max_unit_size);
        (language, units)
    }

    /// Summarize `document`.
    ///
    /// Fails only if the model for the resolved language cannot be loaded.
    /// A unit whose summarization fails is replaced by a truncated excerpt.
    pub fn run(&self, document: &Document, choice: LanguageChoice) -> Result<Summary> {
        let (language, units) = self.prepare(document, choice);
        let profile = self.config.profile(language);
        tracing::info!(
            "Summarizing {} ({}): {} units",
            document.source(),
            language,
            units.len()
        );
        if units.is_empty() {
            return Ok(assemble(document.text(), language, &[]));
        }

        let model = self.registry.get(language)?;
        let pb = self.progress_bar(units.len());
        let mut outcomes = Vec::with_capacity(units.len());
        for unit in &units {
            let outcome = summarize_unit(
                model.as_ref(),
                unit,
                &profile.bounds,
                self.config.fallback_excerpt_words,
            );
            outcomes.push(outcome);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let summary = assemble(document.text(), language, &outcomes);
        tracing::info!(
            "Summary: {} -> {} words ({:.1}% reduction, {} degraded units)",
            summary.stats.original_words,
            summary.stats.summary_words,
            summary.stats.reduction_percent,
            summary.stats.degraded_units
        );
        Ok(summary)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        let template = "{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} units";
        if let Ok(style) = ProgressStyle::with_template(template) {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    }
}

/// First `words` words of a unit, used when the model fails on it.
pub fn excerpt(text: &str, words: usize) -> String {
    let mut out = text
        .split_whitespace()
        .take(words.max(1))
        .collect::<Vec<_>>()
        .join(" ");
    if out.split_whitespace().count() < text.split_whitespace().count() {
        out.push_str("...");
    }
    out
}

pub fn summarize_unit(
    model: &dyn SummarizationModel,
    unit: &Unit,
    bounds: &LengthBounds,
    excerpt_words: usize,
) -> UnitOutcome {
    let degraded = |cause: String| {
        tracing::warn!("Unit {} degraded to excerpt: {}", unit.index, cause);
        UnitOutcome::Degraded {
            excerpt: excerpt(&unit.text, excerpt_words),
            cause,
        }
    };
    match model.summarize(&unit.text, bounds) {
        Ok(text) if !text.trim().is_empty() => UnitOutcome::Success(text),
        Ok(_) => degraded(format!("{} returned an empty summary", model.name())),
        Err(e) => degraded(e.to_string()),
    }
}
