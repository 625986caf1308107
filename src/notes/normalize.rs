use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{Note, RawRecord};

const IDENTIFIER_SEPARATOR: &str = "; ";
const HEADER_MARKER: &str = "[";
const RULER_MARKER: &str = "-----";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagAccumulator {
    pub tags: BTreeSet<String>,
    pub notebooks: BTreeSet<String>,
}

impl TagAccumulator {
    pub fn observe(&mut self, note: &Note) {
        self.tags.extend(note.tags.iter().cloned());
        self.notebooks.extend(note.notebooks.iter().cloned());
    }
}

pub fn normalize_record(record: &RawRecord, accumulator: &mut TagAccumulator) -> Note {
    let note = Note {
        kind: record.get("type").to_string(),
        title: record.get("title").to_string(),
        paragraphs: strip_boilerplate(split_paragraphs(record.get("note_text"))),
        source_location: record.get("source_location").to_string(),
        tags: split_identifiers(record.get("tags")),
        notebooks: split_identifiers(record.get("notebooks")),
        study_set: record.get("study_set").to_string(),
        last_updated: record.get("last_updated").to_string(),
        created: record.get("created").to_string(),
        highlight: record.get("highlight").to_string(),
    };

    accumulator.observe(&note);
    note
}

pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for raw_line in text.split('\n') {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

fn strip_boilerplate(paragraphs: Vec<String>) -> Vec<String> {
    paragraphs
        .into_iter()
        .map(|paragraph| {
            if is_boilerplate(&paragraph) {
                String::new()
            } else {
                paragraph
            }
        })
        .filter(|paragraph| !paragraph.trim().is_empty())
        .collect()
}

fn is_boilerplate(paragraph: &str) -> bool {
    paragraph.starts_with(HEADER_MARKER) || paragraph.starts_with(RULER_MARKER)
}

pub fn split_identifiers(raw: &str) -> BTreeSet<String> {
    raw.split(IDENTIFIER_SEPARATOR)
        .filter(|value| !value.trim().is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
