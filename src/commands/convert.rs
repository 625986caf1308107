use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use super::load_display_names;
use crate::cli::{ConvertArgs, OutputFormat};
use crate::model::{
    ConversionCounts, ConversionRunManifest, FIELD_NAMES, Note, RawRecord, SourceEntry,
};
use crate::notes::{
    CanonicalOrder, Citation, DisplayNames, LoadedRecords, ManualCitation, NoteSorter,
    ScriptureCitation,
    StagingStore, TagAccumulator, UNRESOLVED_REFERENCE, WorkRank, load_records, normalize_record,
    parse_citation, render_reference,
};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};
use crate::writer::{DocumentEntry, DocumentWriter, JsonDocumentWriter, TextDocumentWriter};

#[cfg(test)]
mod tests;

#[derive(Debug, Default)]
struct Conversion {
    notes: Vec<Note>,
    references: Vec<String>,
    accumulator: TagAccumulator,
    unranked_notes: usize,
    citation_failures: usize,
    locator_mismatches: usize,
    warnings: Vec<String>,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(
        run_id = %run_id,
        sources = args.inputs.len(),
        output = %args.output.display(),
        format = args.format.as_str(),
        "starting conversion"
    );

    let order_path = args.data.order_path();
    let order = CanonicalOrder::load(&order_path)?;
    info!(
        path = %order_path.display(),
        titles = order.titles().len(),
        "loaded canonical order"
    );
    let names = load_display_names(&args.data.names_path())?;

    let loaded = load_sources(&args.inputs, args.staging_db.as_deref())?;
    info!(
        records = loaded.records.len(),
        duplicates_removed = loaded.duplicates_removed(),
        "loaded export records"
    );

    let sorter = NoteSorter::new()?;
    let conversion = convert_records(&loaded.records, &order, &names, &sorter);

    let entries = conversion
        .notes
        .iter()
        .zip(&conversion.references)
        .map(|(note, reference)| DocumentEntry {
            note,
            reference: reference.clone(),
        })
        .collect::<Vec<DocumentEntry<'_>>>();

    build_writer(&args)
        .write(&entries, &args.output, args.template.as_deref())
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    if let Some(report_path) = &args.report_path {
        let manifest = ConversionRunManifest {
            manifest_version: 1,
            run_id: run_id.clone(),
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            command: render_convert_command(&args),
            output_path: args.output.display().to_string(),
            format: args.format.as_str().to_string(),
            sources: collect_source_entries(&args.inputs)?,
            counts: ConversionCounts {
                records_loaded: loaded.rows_read,
                duplicates_removed: loaded.duplicates_removed(),
                notes_written: entries.len(),
                unranked_notes: conversion.unranked_notes,
                citation_failures: conversion.citation_failures,
                locator_mismatches: conversion.locator_mismatches,
            },
            tags: conversion.accumulator.tags.clone(),
            notebooks: conversion.accumulator.notebooks.clone(),
            warnings: conversion.warnings.clone(),
        };
        write_json_pretty(report_path, &manifest)?;
        info!(path = %report_path.display(), "wrote conversion report");
    }

    let stem = args
        .output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let location = args
        .output
        .parent()
        .map(|parent| parent.display().to_string())
        .unwrap_or_default();
    info!(
        notes = entries.len(),
        tags = conversion.accumulator.tags.len(),
        notebooks = conversion.accumulator.notebooks.len(),
        location = %location,
        "{stem} saved successfully"
    );

    Ok(())
}

fn load_sources(inputs: &[PathBuf], staging_db: Option<&Path>) -> Result<LoadedRecords> {
    match staging_db {
        Some(path) => {
            info!(path = %path.display(), "staging export records on disk");
            let mut store = StagingStore::open(path)?;
            store.load(inputs, &FIELD_NAMES)
        }
        None => Ok(load_records(inputs, &FIELD_NAMES)?),
    }
}

fn build_writer(args: &ConvertArgs) -> Box<dyn DocumentWriter> {
    match args.format {
        OutputFormat::Text => Box::new(TextDocumentWriter::new(&args.template_dir)),
        OutputFormat::Json => Box::new(JsonDocumentWriter),
    }
}

fn convert_records(
    records: &[RawRecord],
    order: &CanonicalOrder,
    names: &DisplayNames,
    sorter: &NoteSorter,
) -> Conversion {
    let mut conversion = Conversion::default();

    let notes = records
        .iter()
        .map(|record| normalize_record(record, &mut conversion.accumulator))
        .collect::<Vec<Note>>();

    let mut unranked_works = BTreeSet::new();
    for note in &notes {
        if sorter.sort_key(&note.title, order).rank == WorkRank::Unranked {
            conversion.unranked_notes += 1;
            unranked_works.insert(sorter.work_title(&note.title));
        }
    }
    for work in unranked_works {
        warn!(work = %work, "work title not in canonical order, sorting last");
    }

    let sorted = sorter.sort(notes, order);
    let references = sorted
        .iter()
        .map(|note| conversion.reference_for(note, names, sorter))
        .collect::<Vec<String>>();
    conversion.notes = sorted;
    conversion.references = references;

    conversion
}

impl Conversion {
    fn reference_for(&mut self, note: &Note, names: &DisplayNames, sorter: &NoteSorter) -> String {
        if note.source_location.is_empty() {
            return String::new();
        }

        let citation = match parse_citation(&note.source_location, names) {
            Ok(citation) => citation,
            Err(err) => {
                warn!(title = %note.title, error = %err, "citation unavailable, using placeholder");
                self.citation_failures += 1;
                self.warnings.push(format!("{}: {err}", note.title));
                return UNRESOLVED_REFERENCE.to_string();
            }
        };

        if let Some(from_link) = link_locator(&citation) {
            let from_title = sorter.title_locator(&note.title);
            if from_title != from_link {
                warn!(
                    title = %note.title,
                    title_chapter = from_title.0,
                    title_verse = from_title.1,
                    link_chapter = from_link.0,
                    link_verse = from_link.1,
                    "title and source link disagree on locator"
                );
                self.locator_mismatches += 1;
                self.warnings.push(format!(
                    "{}: title locator {}:{} differs from source link {}:{}",
                    note.title, from_title.0, from_title.1, from_link.0, from_link.1
                ));
            }
        }

        render_reference(&citation)
    }
}

fn link_locator(citation: &Citation) -> Option<(u64, u64)> {
    match citation {
        Citation::Scripture(ScriptureCitation {
            chapter: Some(chapter),
            verse,
            ..
        })
        | Citation::Manual(ManualCitation { chapter, verse, .. }) => {
            Some((u64::from(*chapter), u64::from(*verse)))
        }
        Citation::Scripture(_) | Citation::Periodical(_) => None,
    }
}

fn collect_source_entries(inputs: &[PathBuf]) -> Result<Vec<SourceEntry>> {
    inputs
        .iter()
        .map(|path| {
            let bytes = fs::metadata(path)
                .with_context(|| format!("failed to inspect {}", path.display()))?
                .len();
            Ok(SourceEntry {
                path: path.display().to_string(),
                sha256: sha256_file(path)?,
                bytes,
            })
        })
        .collect()
}

fn render_convert_command(args: &ConvertArgs) -> String {
    let mut command = vec!["notes-converter".to_string(), "convert".to_string()];

    for input in &args.inputs {
        command.push("--input".to_string());
        command.push(input.display().to_string());
    }
    command.push("--output".to_string());
    command.push(args.output.display().to_string());
    command.push("--format".to_string());
    command.push(args.format.as_str().to_string());

    if let Some(path) = &args.template {
        command.push("--template".to_string());
        command.push(path.display().to_string());
    }
    command.push("--template-dir".to_string());
    command.push(args.template_dir.display().to_string());
    command.push("--data-dir".to_string());
    command.push(args.data.data_dir.display().to_string());
    if let Some(path) = &args.data.order_path {
        command.push("--order-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.data.names_path {
        command.push("--names-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.staging_db {
        command.push("--staging-db".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.report_path {
        command.push("--report-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
