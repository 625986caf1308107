use std::collections::BTreeSet;
use std::fs;

use super::*;
use crate::error::WriterError;
use crate::notes::UNRESOLVED_REFERENCE;

fn sample_note() -> Note {
    Note {
        kind: "Journal".to_string(),
        title: "Genesis 1:1".to_string(),
        paragraphs: vec!["In the beginning.".to_string(), "A second thought.".to_string()],
        source_location:
            "https://www.churchofjesuschrist.org/study/scriptures/ot/genesis/1?lang=eng&id=p1"
                .to_string(),
        tags: BTreeSet::from(["creation".to_string()]),
        notebooks: BTreeSet::new(),
        study_set: String::new(),
        last_updated: "2021-03-04T05:06:07.000Z".to_string(),
        created: "2021-03-01T13:02:03.000Z".to_string(),
        highlight: String::new(),
    }
}

#[test]
fn display_timestamp_renders_pacific_time_and_keeps_unparseable_values() {
    assert_eq!(
        display_timestamp("2021-03-01T13:02:03.000Z"),
        "March 01, 2021, 05:02 AM PST"
    );
    assert_eq!(
        display_timestamp("2021-07-04T19:30:00Z"),
        "July 04, 2021, 12:30 PM PDT"
    );
    assert_eq!(
        display_timestamp("2021-03-01T01:02:03"),
        "February 28, 2021, 05:02 PM PST"
    );
    assert_eq!(display_timestamp("yesterday"), "yesterday");
    assert_eq!(display_timestamp(""), "");
}

#[test]
fn document_title_uses_output_stem() {
    assert_eq!(document_title(Path::new("out/My Notes.txt")), "My Notes");
    assert_eq!(document_title(Path::new("")), "notes");
}

#[test]
fn text_writer_renders_template_and_notes() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("default.txt"), "# {document_title}\n").expect("write template");
    let output = dir.path().join("Study Journal.txt");
    let note = sample_note();
    let entries = vec![DocumentEntry {
        note: &note,
        reference: "Old Testament, genesis 1:1".to_string(),
    }];

    TextDocumentWriter::new(dir.path())
        .write(&entries, &output, None)
        .expect("write should succeed");

    let written = fs::read_to_string(&output).expect("read output");
    assert!(written.starts_with("# Study Journal\n"));
    assert!(written.contains("\n\nGenesis 1:1\nMarch 01, 2021, 05:02 AM PST\n\n"));
    assert!(written.contains("In the beginning.\n\nA second thought.\n\n"));
    assert!(written.contains(
        "Source: Old Testament, genesis 1:1 (https://www.churchofjesuschrist.org/study/scriptures/ot/genesis/1?lang=eng&id=p1)\n"
    ));
}

#[test]
fn text_writer_prefers_valid_custom_template() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("default.txt"), "DEFAULT\n").expect("write default");
    let custom = dir.path().join("custom.txt");
    fs::write(&custom, "CUSTOM {document_title}\n").expect("write custom");
    let output = dir.path().join("out.txt");

    TextDocumentWriter::new(dir.path())
        .write(&[], &output, Some(&custom))
        .expect("write should succeed");

    assert_eq!(fs::read_to_string(&output).expect("read"), "CUSTOM out\n");
}

#[test]
fn text_writer_falls_back_when_custom_template_is_unusable() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("default.txt"), "DEFAULT\n").expect("write default");
    let wrong_extension = dir.path().join("custom.docx");
    fs::write(&wrong_extension, "ignored").expect("write custom");
    let output = dir.path().join("out.txt");

    let writer = TextDocumentWriter::new(dir.path());
    writer
        .write(&[], &output, Some(&wrong_extension))
        .expect("write should succeed");
    assert_eq!(fs::read_to_string(&output).expect("read"), "DEFAULT\n");

    writer
        .write(&[], &output, Some(&dir.path().join("missing.txt")))
        .expect("write should succeed");
    assert_eq!(fs::read_to_string(&output).expect("read"), "DEFAULT\n");
}

#[test]
fn text_writer_reports_missing_default_template() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out.txt");

    let err = TextDocumentWriter::new(dir.path().join("templates"))
        .write(&[], &output, None)
        .expect_err("missing template should fail");

    assert!(matches!(err, WriterError::TemplateUnavailable { .. }));
    assert!(!output.exists());
}

#[test]
fn json_writer_emits_notes_in_given_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("nested").join("notes.json");
    let first = sample_note();
    let mut second = sample_note();
    second.title = "Exodus 3:14".to_string();
    let entries = vec![
        DocumentEntry {
            note: &first,
            reference: "first".to_string(),
        },
        DocumentEntry {
            note: &second,
            reference: UNRESOLVED_REFERENCE.to_string(),
        },
    ];

    JsonDocumentWriter
        .write(&entries, &output, Some(Path::new("ignored.txt")))
        .expect("write should succeed");

    let raw = fs::read(&output).expect("read output");
    let value: serde_json::Value = serde_json::from_slice(&raw).expect("valid json");
    assert_eq!(value["title"], "notes");
    assert_eq!(value["note_count"], 2);
    assert_eq!(value["notes"][0]["note"]["title"], "Genesis 1:1");
    assert_eq!(value["notes"][1]["note"]["title"], "Exodus 3:14");
    assert_eq!(value["notes"][1]["reference"], UNRESOLVED_REFERENCE);
    assert_eq!(value["notes"][0]["note"]["tags"][0], "creation");
}
