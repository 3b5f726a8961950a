// Summarizer configuration: presets, JSON file overrides and environment overrides.
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, SummarizeError};
use crate::nlp::language::DEFAULT_ARABIC_THRESHOLD;
use crate::nlp::{Language, SegmentStrategy};

/// Output length bounds handed to the model, in model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub max_length: usize,
    pub min_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageProfile {
    pub strategy: SegmentStrategy,
    /// Words for word windows, characters for paragraphs.
    pub max_unit_size: usize,
    pub bounds: LengthBounds,
    /// Model identifier for backends that need one.
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Offline sentence-scoring summarizer.
    Extractive,
    /// Local models served through the `ollama` CLI.
    #[default]
    Ollama,
}

impl FromStr for Backend {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "extractive" => Ok(Backend::Extractive),
            "ollama" => Ok(Backend::Ollama),
            other => Err(SummarizeError::Config(format!("unknown backend: {}", other))),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn validate_threshold(threshold: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(SummarizeError::Config(format!(
            "detection_threshold must be within [0, 1], got {}",
            threshold
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// 250-word windows, short summaries.
    Compact,
    #[default]
    Standard,
    /// 500-word windows, long summaries.
    Detailed,
}

impl FromStr for Preset {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(Preset::Compact),
            "standard" => Ok(Preset::Standard),
            "detailed" => Ok(Preset::Detailed),
            other => Err(SummarizeError::Config(format!("unknown preset: {}", other))),
        }
    }
}

pub const DEFAULT_ENGLISH_MODEL: &str = "llama3.2";
pub const DEFAULT_ARABIC_MODEL: &str = "command-r7b-arabic";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Arabic-character ratio above which text is treated as Arabic.
    pub detection_threshold: f32,
    /// Words kept from a unit when its summarization fails.
    pub fallback_excerpt_words: usize,
    pub backend: Backend,
    /// Fetch missing models on first use instead of failing.
    pub pull_missing: bool,
    pub show_progress: bool,
    pub arabic: LanguageProfile,
    pub english: LanguageProfile,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl SummarizerConfig {
    pub fn preset(preset: Preset) -> Self {
        let (english_words, arabic_chars, max_length, min_length) = match preset {
            Preset::Compact => (250, 400, 120, 40),
            Preset::Standard => (400, 400, 150, 50),
            Preset::Detailed => (500, 500, 300, 100),
        };
        let bounds = LengthBounds {
            max_length,
            min_length,
        };
        Self {
            detection_threshold: DEFAULT_ARABIC_THRESHOLD,
            fallback_excerpt_words: 40,
            backend: Backend::default(),
            pull_missing: false,
            show_progress: false,
            arabic: LanguageProfile {
                strategy: SegmentStrategy::Paragraph,
                max_unit_size: arabic_chars,
                bounds,
                model: DEFAULT_ARABIC_MODEL.to_string(),
            },
            english: LanguageProfile {
                strategy: SegmentStrategy::WordWindow,
                max_unit_size: english_words,
                bounds,
                model: DEFAULT_ENGLISH_MODEL.to_string(),
            },
        }
    }

    pub fn profile(&self, language: Language) -> &LanguageProfile {
        match language {
            Language::Arabic => &self.arabic,
            Language::English => &self.english,
        }
    }

    pub fn profile_mut(&mut self, language: Language) -> &mut LanguageProfile {
        match language {
            Language::Arabic => &mut self.arabic,
            Language::English => &mut self.english,
        }
    }

    /// Read a JSON config file. Missing keys fall back to the standard preset.
    pub fn from_file(path: &Path) -> Result<Self> {
        let f = File::open(path)?;
        let config: SummarizerConfig = serde_json::from_reader(f)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DOCSUM_*` environment overrides on top of this config.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("DOCSUM_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(model) = lookup("DOCSUM_EN_MODEL") {
            self.english.model = model;
        }
        if let Some(model) = lookup("DOCSUM_AR_MODEL") {
            self.arabic.model = model;
        }
        if let Some(pull) = lookup("DOCSUM_PULL") {
            self.pull_missing = parse_flag(&pull)
                .ok_or_else(|| SummarizeError::Config(format!("invalid DOCSUM_PULL: {}", pull)))?;
        }
        if let Some(threshold) = lookup("DOCSUM_THRESHOLD") {
            self.detection_threshold = threshold
                .parse()
                .map_err(|_| SummarizeError::Config(format!("invalid threshold: {}", threshold)))?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.detection_threshold)?;
        for language in [Language::Arabic, Language::English] {
            let profile = self.profile(language);
            if profile.max_unit_size == 0 {
                return Err(SummarizeError::Config(format!(
                    "{} max_unit_size must be positive",
                    language
                )));
            }
            if profile.bounds.min_length > profile.bounds.max_length {
                return Err(SummarizeError::Config(format!(
                    "{} min_length {} exceeds max_length {}",
                    language, profile.bounds.min_length, profile.bounds.max_length
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_standard_preset() {
        let config = SummarizerConfig::default();
        assert_eq!(config, SummarizerConfig::preset(Preset::Standard));
        assert_eq!(config.english.max_unit_size, 400);
        assert_eq!(config.arabic.strategy, SegmentStrategy::Paragraph);
        assert!((config.detection_threshold - 0.3).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_differ() {
        let compact = SummarizerConfig::preset(Preset::Compact);
        let detailed = SummarizerConfig::preset(Preset::Detailed);
        assert_eq!(compact.english.max_unit_size, 250);
        assert_eq!(compact.english.bounds.max_length, 120);
        assert_eq!(detailed.english.max_unit_size, 500);
        assert_eq!(detailed.arabic.max_unit_size, 500);
        assert_eq!(detailed.english.bounds.max_length, 300);
    }

    #[test]
    fn test_from_file_partial() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("docsum.json");
        let mut file = File::create(&path)?;
        writeln!(file, r#"{{"backend": "extractive", "detection_threshold": 0.5}}"#)?;

        let config = SummarizerConfig::from_file(&path)?;
        assert_eq!(config.backend, Backend::Extractive);
        assert!((config.detection_threshold - 0.5).abs() < 1e-6);
        assert_eq!(config.english.max_unit_size, 400);
        Ok(())
    }

    #[test]
    fn test_from_file_rejects_invalid() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, r#"{"detection_threshold": 3.0}"#)?;
        assert!(matches!(
            SummarizerConfig::from_file(&path),
            Err(SummarizeError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn test_env_overrides() -> Result<()> {
        let vars: HashMap<&str, &str> = [
            ("DOCSUM_BACKEND", "extractive"),
            ("DOCSUM_AR_MODEL", "my-arabic"),
            ("DOCSUM_THRESHOLD", "0.4"),
        ]
        .into_iter()
        .collect();
        let config = SummarizerConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))?;
        assert_eq!(config.backend, Backend::Extractive);
        assert_eq!(config.arabic.model, "my-arabic");
        assert_eq!(config.english.model, DEFAULT_ENGLISH_MODEL);
        assert!((config.detection_threshold - 0.4).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_env_pull_override() -> Result<()> {
        assert!(!SummarizerConfig::default().pull_missing);
        let config = SummarizerConfig::default()
            .with_overrides(|key| (key == "DOCSUM_PULL").then(|| "true".to_string()))?;
        assert!(config.pull_missing);

        let config = config.with_overrides(|key| (key == "DOCSUM_PULL").then(|| "0".to_string()))?;
        assert!(!config.pull_missing);

        let bad = SummarizerConfig::default()
            .with_overrides(|key| (key == "DOCSUM_PULL").then(|| "maybe".to_string()));
        assert!(matches!(bad, Err(SummarizeError::Config(_))));
        Ok(())
    }

    #[test]
    fn test_validate_threshold_range() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(1.5).is_err());
    }

    #[test]
    fn test_bad_env_threshold() {
        let result = SummarizerConfig::default().with_overrides(|key| {
            (key == "DOCSUM_THRESHOLD").then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let mut config = SummarizerConfig::default();
        config.profile_mut(Language::English).bounds.min_length = 500;
        assert!(config.validate().is_err());
    }
}
