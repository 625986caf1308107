use std::path::Path;

use serde::Serialize;

use super::{DocumentEntry, DocumentWriter, document_title, write_document};
use crate::error::WriterError;
use crate::util::now_utc_string;

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    title: String,
    generated_at: String,
    note_count: usize,
    notes: &'a [DocumentEntry<'a>],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentWriter;

impl DocumentWriter for JsonDocumentWriter {
    fn write(
        &self,
        entries: &[DocumentEntry<'_>],
        output_path: &Path,
        _template: Option<&Path>,
    ) -> Result<(), WriterError> {
        let document = JsonDocument {
            title: document_title(output_path),
            generated_at: now_utc_string(),
            note_count: entries.len(),
            notes: entries,
        };

        let mut data =
            serde_json::to_vec_pretty(&document).map_err(|source| WriterError::Json {
                path: output_path.to_path_buf(),
                source,
            })?;
        data.push(b'\n');

        write_document(output_path, &data)
    }
}
