use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use docsum::nlp::{normalize, segment};
use docsum::{
    Backend, Document, Language, LanguageChoice, LengthBounds, ModelRegistry, Pipeline,
    SummarizationModel, SummarizeError, SummarizerConfig,
};

// Echoes each unit uppercased, and fails on any unit containing "poison".
struct ScriptedModel {
    calls: AtomicUsize,
}

impl SummarizationModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn summarize(&self, text: &str, _bounds: &LengthBounds) -> docsum::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("poison") {
            return Err(SummarizeError::Inference("model crashed".to_string()));
        }
        Ok(text.to_uppercase())
    }
}

fn extractive_config() -> SummarizerConfig {
    let mut config = SummarizerConfig::default();
    config.backend = Backend::Extractive;
    config
}

#[test]
fn test_units_reconstruct_normalized_text() {
    let inputs = [
        ("The quick brown fox.  Jumps over\n the lazy dog! Again and again.", Language::English),
        ("الجملة الأولى هنا. الجملة الثانية هنا! هل هذه الثالثة؟ نعم.", Language::Arabic),
    ];
    for (text, language) in inputs {
        let normalized = normalize(text, language);
        for max in [1, 3, 10, 25, 400] {
            let units = segment(&normalized, language, max);
            assert!(!units.is_empty());
            assert!(units.iter().all(|u| !u.text.trim().is_empty()));
            let rejoined = units.iter().map(|u| u.text.as_str()).collect::<Vec<_>>().join(" ");
            assert_eq!(rejoined, normalized);
            for (i, unit) in units.iter().enumerate() {
                assert_eq!(unit.index, i);
            }
        }
    }
}

#[test]
fn test_pipeline_is_idempotent() {
    let config = extractive_config();
    let registry = ModelRegistry::from_config(&config);
    let pipeline = Pipeline::new(&config, &registry);
    let text = "Rust gives memory safety without garbage collection. \
                The borrow checker enforces ownership rules at compile time. \
                Cargo manages builds and dependencies. \
                Many companies use Rust for infrastructure. "
        .repeat(20);
    let doc = Document::from_text(text);

    let first = pipeline.run(&doc, LanguageChoice::Automatic).unwrap();
    let second = pipeline.run(&doc, LanguageChoice::Automatic).unwrap();
    assert_eq!(first, second);
    assert!(first.stats.summary_words < first.stats.original_words);
    assert!(first.stats.reduction_percent > 0.0);
    assert_eq!(registry.loads(), 1);
}

#[test]
fn test_failed_unit_degrades_without_losing_others() {
    let mut config = extractive_config();
    config.english.max_unit_size = 3;
    config.fallback_excerpt_words = 2;
    let model = Arc::new(ScriptedModel {
        calls: AtomicUsize::new(0),
    });
    let shared = Arc::clone(&model);
    let registry = ModelRegistry::new(move |_| Ok(shared.clone() as Arc<dyn SummarizationModel>));
    let pipeline = Pipeline::new(&config, &registry);

    let doc = Document::from_text("alpha beta gamma poison delta epsilon zeta eta theta");
    let summary = pipeline.run(&doc, LanguageChoice::Automatic).unwrap();

    assert_eq!(summary.text, "ALPHA BETA GAMMA poison delta. ZETA ETA THETA");
    assert_eq!(summary.stats.units, 3);
    assert_eq!(summary.stats.degraded_units, 1);
    // no retry of the failed unit
    assert_eq!(model.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_explicit_language_overrides_detection() {
    let config = extractive_config();
    let registry = ModelRegistry::from_config(&config);
    let pipeline = Pipeline::new(&config, &registry);

    let doc = Document::from_text("Plain English words (with brackets) here.");
    let summary = pipeline
        .run(&doc, LanguageChoice::Fixed(Language::Arabic))
        .unwrap();
    assert_eq!(summary.language, Language::Arabic);
    // the Arabic path strips the brackets
    assert_eq!(summary.text, "Plain English words with brackets here.");
    assert!(registry.is_loaded(Language::Arabic));
    assert!(!registry.is_loaded(Language::English));
}

#[test]
fn test_arabic_duplicates_removed_before_summarizing() {
    let config = extractive_config();
    let registry = ModelRegistry::from_config(&config);
    let pipeline = Pipeline::new(&config, &registry);

    let doc = Document::from_text("مرحبا بكم . مرحبا بكم . وداعا يا صديقي .");
    let summary = pipeline.run(&doc, LanguageChoice::Automatic).unwrap();
    assert_eq!(summary.language, Language::Arabic);
    assert_eq!(summary.text, "مرحبا بكم . وداعا يا صديقي .");
}

#[test]
fn test_shared_registry_across_threads() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    let registry = Arc::new(ModelRegistry::new(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(ScriptedModel {
            calls: AtomicUsize::new(0),
        }))
    }));
    let config = Arc::new(extractive_config());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let config = Arc::clone(&config);
            thread::spawn(move || {
                let pipeline = Pipeline::new(&config, &registry);
                let doc = Document::from_text(format!("document number {}", i));
                pipeline.run(&doc, LanguageChoice::Automatic).map(|s| s.text)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap().unwrap(), format!("DOCUMENT NUMBER {}", i));
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}
