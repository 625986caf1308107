mod json;
mod text;
#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::America::Los_Angeles;
use serde::Serialize;

use crate::error::WriterError;
use crate::model::Note;

pub use json::JsonDocumentWriter;
pub use text::TextDocumentWriter;

const DEFAULT_DOCUMENT_TITLE: &str = "notes";
const DISPLAY_TIME_FORMAT: &str = "%B %d, %Y, %I:%M %p %Z";

#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry<'a> {
    pub note: &'a Note,
    pub reference: String,
}

pub trait DocumentWriter {
    fn write(
        &self,
        entries: &[DocumentEntry<'_>],
        output_path: &Path,
        template: Option<&Path>,
    ) -> Result<(), WriterError>;
}

fn document_title(output_path: &Path) -> String {
    output_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| DEFAULT_DOCUMENT_TITLE.to_string())
}

fn display_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Los_Angeles)
            .format(DISPLAY_TIME_FORMAT)
            .to_string();
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive
            .and_utc()
            .with_timezone(&Los_Angeles)
            .format(DISPLAY_TIME_FORMAT)
            .to_string();
    }

    raw.to_string()
}

fn write_document(output_path: &Path, contents: &[u8]) -> Result<(), WriterError> {
    let io_error = |source: std::io::Error| WriterError::Io {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(output_path, contents).map_err(io_error)
}
