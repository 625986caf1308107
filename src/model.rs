use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub const FIELD_NAMES: [&str; 10] = [
    "type",
    "title",
    "note_text",
    "source_location",
    "tags",
    "notebooks",
    "study_set",
    "last_updated",
    "created",
    "highlight",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub kind: String,
    pub title: String,
    pub paragraphs: Vec<String>,
    pub source_location: String,
    pub tags: BTreeSet<String>,
    pub notebooks: BTreeSet<String>,
    pub study_set: String,
    pub last_updated: String,
    pub created: String,
    pub highlight: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    pub path: String,
    pub sha256: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionCounts {
    pub records_loaded: usize,
    pub duplicates_removed: usize,
    pub notes_written: usize,
    pub unranked_notes: usize,
    pub citation_failures: usize,
    pub locator_mismatches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub output_path: String,
    pub format: String,
    pub sources: Vec<SourceEntry>,
    pub counts: ConversionCounts,
    pub tags: BTreeSet<String>,
    pub notebooks: BTreeSet<String>,
    pub warnings: Vec<String>,
}
