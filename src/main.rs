use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use docsum::config::validate_threshold;
use docsum::document::SUPPORTED_EXTENSIONS;
use docsum::nlp::language::arabic_ratio;
use docsum::{
    Backend, Document, LanguageChoice, ModelRegistry, Pipeline, Preset, Session, SessionState,
    Summary, SummarizerConfig,
};

#[derive(Parser)]
#[command(name = "docsum", about = "Summarize Arabic and English text and documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// Preset: compact, standard or detailed
    #[arg(long, default_value = "standard")]
    preset: String,
    /// JSON config file; replaces the preset
    #[arg(long)]
    config: Option<PathBuf>,
    /// Backend override: extractive or ollama
    #[arg(short, long)]
    backend: Option<String>,
    /// Language: automatic, english or arabic
    #[arg(short, long, default_value = "automatic")]
    lang: String,
    /// Pull missing ollama models on first use
    #[arg(long)]
    pull: bool,
}

impl ConfigArgs {
    fn load(&self) -> Result<SummarizerConfig> {
        let config = match &self.config {
            Some(path) => SummarizerConfig::from_file(path)?,
            None => SummarizerConfig::preset(self.preset.parse::<Preset>()?),
        };
        let mut config = config.with_env_overrides()?;
        if let Some(backend) = &self.backend {
            config.backend = backend.parse::<Backend>()?;
        }
        if self.pull {
            config.pull_missing = true;
        }
        Ok(config)
    }

    fn choice(&self) -> Result<LanguageChoice> {
        Ok(self.lang.parse()?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize typed text, a file, or every supported file under a directory
    Summarize {
        #[arg(short, long, conflicts_with_all = ["file", "dir"])]
        text: Option<String>,
        #[arg(short, long, conflicts_with = "dir")]
        file: Option<PathBuf>,
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Save the summary as plain text (a directory when --dir is used)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print the summary and statistics as JSON
        #[arg(long)]
        json: bool,
        /// Show a progress bar over units
        #[arg(long)]
        progress: bool,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Report the detected language of some text
    Detect {
        #[arg(short, long)]
        text: String,
        #[arg(long, default_value_t = docsum::nlp::language::DEFAULT_ARABIC_THRESHOLD, value_parser = parse_threshold)]
        threshold: f32,
    },
    /// Print the normalized units a document is split into
    Segment {
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Line-oriented summarize / save / back session
    Interactive {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn parse_threshold(s: &str) -> std::result::Result<f32, String> {
    let threshold: f32 = s.parse().map_err(|_| format!("invalid threshold: {}", s))?;
    validate_threshold(threshold).map_err(|e| e.to_string())?;
    Ok(threshold)
}

fn input_document(text: Option<String>, file: Option<PathBuf>) -> Result<Document> {
    match (text, file) {
        (Some(text), _) => Ok(Document::from_text(text)),
        (None, Some(path)) => Ok(Document::from_path(&path)?),
        (None, None) => Err(anyhow!("provide --text or --file")),
    }
}

fn collect_documents(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn print_summary(summary: &Summary) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(stdout, "Summary ({})", summary.language)?;
    stdout.reset()?;
    writeln!(stdout, "{}", summary.text)?;

    let stats = &summary.stats;
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    writeln!(
        stdout,
        "words: {} -> {} | chars: {} -> {} | reduction: {:.1}% | units: {}",
        stats.original_words,
        stats.summary_words,
        stats.original_chars,
        stats.summary_chars,
        stats.reduction_percent,
        stats.units
    )?;
    if stats.degraded_units > 0 {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(stdout, "{} unit(s) fell back to an excerpt", stats.degraded_units)?;
    }
    stdout.reset()?;
    Ok(())
}

fn emit(summary: &Summary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        Ok(())
    } else {
        print_summary(summary)
    }
}

fn summarize_dir(
    pipeline: &Pipeline<'_>,
    dir: &Path,
    choice: LanguageChoice,
    out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let files = collect_documents(dir);
    if files.is_empty() {
        return Err(anyhow!("no .txt, .md or .pdf files under {}", dir.display()));
    }
    if let Some(out) = out {
        fs::create_dir_all(out)?;
    }

    // documents run in parallel; units within a document stay sequential
    let results: Vec<(PathBuf, docsum::Result<Summary>)> = files
        .par_iter()
        .map(|p| {
            let result = Document::from_path(p).and_then(|doc| pipeline.run(&doc, choice));
            (p.clone(), result)
        })
        .collect();

    let mut failures = 0;
    for (path, result) in results {
        println!("== {}", path.display());
        match result {
            Ok(summary) => {
                emit(&summary, json)?;
                if let Some(out) = out {
                    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
                    fs::write(out.join(format!("{}.summary.txt", stem)), format!("{}\n", summary.text))?;
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("error: {}", e);
            }
        }
    }
    if failures > 0 {
        return Err(anyhow!("{} of {} documents failed", failures, files.len()));
    }
    Ok(())
}

enum InputBlock {
    Document(Document),
    Quit,
}

fn read_input_block<I>(lines: &mut I) -> Result<Option<InputBlock>>
where
    I: Iterator<Item = io::Result<String>>,
{
    let mut buffer: Vec<String> = Vec::new();
    for line in lines.by_ref() {
        let line = line?;
        let trimmed = line.trim();
        if buffer.is_empty() {
            if trimmed == ":quit" {
                return Ok(Some(InputBlock::Quit));
            }
            if let Some(path) = trimmed.strip_prefix(":file ") {
                return Ok(Some(InputBlock::Document(Document::from_path(Path::new(path.trim()))?)));
            }
        }
        if trimmed.is_empty() {
            if buffer.is_empty() {
                continue;
            }
            return Ok(Some(InputBlock::Document(Document::from_text(buffer.join("\n")))));
        }
        buffer.push(line);
    }
    if buffer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(InputBlock::Document(Document::from_text(buffer.join("\n")))))
    }
}

fn run_interactive(pipeline: &Pipeline<'_>, choice: LanguageChoice) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut session = Session::new();

    loop {
        if matches!(session.state(), SessionState::AwaitingInput) {
            println!("Enter text and finish with an empty line (:file PATH to load a document, :quit to exit)");
            let block = match read_input_block(&mut lines) {
                Ok(Some(block)) => block,
                Ok(None) => break,
                Err(e) => {
                    eprintln!("error: {}", e);
                    continue;
                }
            };
            let document = match block {
                InputBlock::Quit => break,
                InputBlock::Document(document) => document,
            };
            match session.submit(pipeline, document, choice) {
                Ok(summary) => print_summary(summary)?,
                Err(e) => eprintln!("error: {}", e),
            }
        } else {
            println!(":save PATH to export, :back for new input, :quit to exit");
            let Some(line) = lines.next() else { break };
            let line = line?;
            let command = line.trim();
            if command == ":quit" {
                break;
            } else if command == ":back" {
                session.reset();
            } else if let Some(path) = command.strip_prefix(":save ") {
                match session.export(Path::new(path.trim())) {
                    Ok(()) => println!("Saved to {}", path.trim()),
                    Err(e) => eprintln!("error: {}", e),
                }
            } else if !command.is_empty() {
                eprintln!("unknown command: {}", command);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("docsum=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Summarize {
            text,
            file,
            dir,
            out,
            json,
            progress,
            config,
        } => {
            let choice = config.choice()?;
            let mut config = config.load()?;
            config.show_progress = progress;
            let registry = ModelRegistry::from_config(&config);
            let pipeline = Pipeline::new(&config, &registry);

            if let Some(dir) = dir {
                return summarize_dir(&pipeline, &dir, choice, out.as_deref(), json);
            }
            let document = input_document(text, file)?;
            let summary = pipeline.run(&document, choice)?;
            emit(&summary, json)?;
            if let Some(out) = out {
                fs::write(&out, format!("{}\n", summary.text))?;
                tracing::info!("Saved summary to {}", out.display());
            }
        }
        Commands::Detect { text, threshold } => {
            let language = LanguageChoice::Automatic.resolve(&text, threshold);
            let ratio = arabic_ratio(&text).unwrap_or(0.0);
            println!("{} (arabic ratio {:.2}, threshold {:.2})", language, ratio, threshold);
        }
        Commands::Segment { text, file, config } => {
            let choice = config.choice()?;
            let config = config.load()?;
            let registry = ModelRegistry::from_config(&config);
            let pipeline = Pipeline::new(&config, &registry);
            let document = input_document(text, file)?;
            for unit in pipeline.units(&document, choice) {
                println!(
                    "[{}] ({} words, {} chars) {}",
                    unit.index,
                    unit.text.split_whitespace().count(),
                    unit.text.chars().count(),
                    unit.text
                );
            }
        }
        Commands::Interactive { config } => {
            let choice = config.choice()?;
            let config = config.load()?;
            let registry = ModelRegistry::from_config(&config);
            let pipeline = Pipeline::new(&config, &registry);
            run_interactive(&pipeline, choice)?;
        }
    }
    Ok(())
}
