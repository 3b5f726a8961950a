// Documents and text extraction from uploaded files.
// PDFs are read page by page, skipping pages without text. Plain text is
// decoded as UTF-8, falling back to UTF-16.
use std::any::Any;
use std::fmt;
use std::fs;
use std::panic;
use std::path::Path;

use crate::error::{Result, SummarizeError};

/// File extensions accepted for extraction.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "md", "pdf"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    DirectInput,
    File(String),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::DirectInput => write!(f, "direct-input"),
            Source::File(name) => write!(f, "{}", name),
        }
    }
}

/// Raw input text plus where it came from. Immutable once captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    source: Source,
}

impl Document {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: Source::DirectInput,
        }
    }

    pub fn from_file_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: Source::File(name.into()),
        }
    }

    /// Extract a document from a `.txt`, `.md` or `.pdf` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(SummarizeError::UnsupportedFormat(ext));
        }

        let bytes = fs::read(path)
            .map_err(|e| SummarizeError::Extraction(format!("failed to read {}: {}", path.display(), e)))?;
        let text = extract_text(&bytes, &ext)?;
        tracing::debug!("Extracted {} chars from {}", text.chars().count(), name);
        Ok(Self::from_file_text(name, text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &Source {
        &self.source
    }
}

/// Extract text from file bytes. Text with nothing readable is an error.
pub fn extract_text(bytes: &[u8], ext: &str) -> Result<String> {
    let text = match ext {
        "pdf" => extract_pdf(bytes)?,
        _ => decode_text(bytes)?,
    };
    if text.trim().is_empty() {
        return Err(SummarizeError::Extraction("no readable text found".to_string()));
    }
    Ok(text)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn extract_pdf(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some well-formed files, e.g. pages without font resources
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|payload| {
            SummarizeError::Extraction(format!("PDF extraction failed: {}", panic_message(payload.as_ref())))
        })?
        .map_err(|e| SummarizeError::Extraction(format!("PDF extraction failed: {}", e)))?;
    Ok(join_pages(pages))
}

/// Concatenate page texts, each followed by a newline, skipping empty pages.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut text = String::new();
    for page in pages {
        if page.trim().is_empty() {
            continue;
        }
        text.push_str(&page);
        text.push('\n');
    }
    text
}

/// Decode UTF-8, or UTF-16 (BOM-detected, little-endian by default) when that fails.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.trim_start_matches('\u{FEFF}').to_string());
    }

    if bytes.len() % 2 != 0 {
        return Err(SummarizeError::Extraction(
            "text is neither valid UTF-8 nor UTF-16".to_string(),
        ));
    }
    let (body, big_endian) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        _ => (bytes, false),
    };
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            if big_endian {
                u16::from_be_bytes([pair[0], pair[1]])
            } else {
                u16::from_le_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16(&units)
        .map_err(|_| SummarizeError::Extraction("text is neither valid UTF-8 nor UTF-16".to_string()))
}
