use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source not found: {path}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source is not valid UTF-8: {path} (line {line})")]
    EncodingError { path: PathBuf, line: u64 },

    #[error(
        "malformed record in {path} at line {line}: expected {expected} fields, found {found}"
    )]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("failed to read {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitationError {
    #[error("unrecognized citation format: {url}")]
    UnrecognizedCitationFormat { url: String },

    #[error("malformed citation {url}: '{token}' is not a {field} number")]
    MalformedCitation {
        url: String,
        field: &'static str,
        token: String,
    },
}

impl CitationError {
    pub fn unrecognized(url: &str) -> Self {
        Self::UnrecognizedCitationFormat {
            url: url.to_string(),
        }
    }

    pub fn malformed(url: &str, field: &'static str, token: &str) -> Self {
        Self::MalformedCitation {
            url: url.to_string(),
            field,
            token: token.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("no template available (tried {tried})")]
    TemplateUnavailable {
        tried: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write document: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
