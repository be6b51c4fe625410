//! Plain text extraction for contract uploads.
//!
//! [`extract`] picks a reader from the file name (`.pdf`, `.docx`, anything
//! else is text), caps the raw input and the produced text, and never
//! fails: unreadable containers are logged and produce empty text, which
//! the analyzer turns into an empty result.

mod docx;
mod errors;
mod pdf;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use pdf::PAGE_MARK;

/// Raw inputs are truncated to this many bytes before decoding.
pub const RAW_SIZE_CAP: usize = 5_000_000;

/// Default cap on extracted characters.
pub const CHAR_CAP: usize = 60_000;

/// Default number of PDF pages read.
pub const DEFAULT_MAX_PAGES: usize = 20;

/// Container format an upload was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Txt,
    Pdf,
    Docx,
}

impl Format {
    /// Format implied by the file name's extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Self {
        let name = file_name.to_lowercase();
        if name.ends_with(".pdf") {
            Format::Pdf
        } else if name.ends_with(".docx") {
            Format::Docx
        } else {
            Format::Txt
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Pdf => "pdf",
            Format::Docx => "docx",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub max_pages: usize,
    pub max_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_chars: CHAR_CAP,
        }
    }
}

/// Extracted text and the format it was read as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extracted {
    pub text: String,
    pub format: Format,
}

/// Extract plain text from an uploaded document.
pub fn extract(bytes: &[u8], file_name: &str, options: &ExtractOptions) -> Extracted {
    let raw = &bytes[..bytes.len().min(RAW_SIZE_CAP)];
    if raw.len() < bytes.len() {
        debug!(size = bytes.len(), cap = RAW_SIZE_CAP, "truncated raw input");
    }

    let format = Format::from_file_name(file_name);
    let read = match format {
        Format::Pdf => pdf::pdf_text(raw, options.max_pages),
        Format::Docx => docx::docx_text(raw),
        Format::Txt => Ok(decode_text(raw)),
    };

    let text = match read {
        Ok(text) => text,
        Err(err) => {
            warn!(file = file_name, %format, error = %err, "could not read document, using empty text");
            String::new()
        }
    };

    Extracted {
        text: truncate_chars(text, options.max_chars),
        format,
    }
}

/// Read `path` and [`extract`] it. Fails only if the file cannot be read.
pub fn extract_file(path: &Path, options: &ExtractOptions) -> std::io::Result<Extracted> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(extract(&bytes, &file_name, options))
}

/// Lossy UTF-8 decoding that drops undecodable bytes.
fn decode_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}
