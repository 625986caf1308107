use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use tracing::debug;

use crate::error::LoadError;
use crate::model::RawRecord;

#[derive(Debug, Default)]
pub struct LoadedRecords {
    pub records: Vec<RawRecord>,
    pub rows_read: usize,
}

impl LoadedRecords {
    pub fn duplicates_removed(&self) -> usize {
        self.rows_read.saturating_sub(self.records.len())
    }
}

pub fn load_records<P: AsRef<Path>>(
    sources: &[P],
    field_names: &[&str],
) -> Result<LoadedRecords, LoadError> {
    let mut merged = Vec::new();

    for source in sources {
        let path = source.as_ref();
        let file = open_source(path)?;
        let before = merged.len();

        read_records(file, path, field_names, |record| {
            merged.push(record);
            Ok::<(), LoadError>(())
        })?;

        debug!(
            path = %path.display(),
            rows = merged.len() - before,
            "read export source"
        );
    }

    let rows_read = merged.len();
    Ok(LoadedRecords {
        records: dedup_records(merged),
        rows_read,
    })
}

pub(super) fn open_source(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_records<R, F, E>(
    input: R,
    path: &Path,
    field_names: &[&str],
    mut visit: F,
) -> Result<(), E>
where
    R: Read,
    F: FnMut(RawRecord) -> Result<(), E>,
    E: From<LoadError>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut row = ByteRecord::new();
    let mut row_index = 0_u64;

    loop {
        let has_row = reader
            .read_byte_record(&mut row)
            .map_err(|source| LoadError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        if !has_row {
            break;
        }

        row_index += 1;
        let line = row
            .position()
            .map(|position| position.line())
            .unwrap_or(row_index);

        let values = row
            .iter()
            .map(std::str::from_utf8)
            .collect::<Result<Vec<&str>, _>>()
            .map_err(|_| LoadError::EncodingError {
                path: path.to_path_buf(),
                line,
            })?;

        if row_index == 1 {
            continue;
        }

        if values.len() != field_names.len() {
            return Err(LoadError::MalformedRecord {
                path: path.to_path_buf(),
                line,
                expected: field_names.len(),
                found: values.len(),
            }
            .into());
        }

        visit(RawRecord::from_pairs(
            field_names.iter().copied().zip(values),
        ))?;
    }

    Ok(())
}

pub fn dedup_records(records: Vec<RawRecord>) -> Vec<RawRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}
