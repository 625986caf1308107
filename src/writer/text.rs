use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{DocumentEntry, DocumentWriter, display_timestamp, document_title, write_document};
use crate::error::WriterError;

const DEFAULT_TEMPLATE: &str = "default.txt";
const TEMPLATE_EXTENSION: &str = "txt";
const TITLE_PLACEHOLDER: &str = "{document_title}";

#[derive(Debug, Clone)]
pub struct TextDocumentWriter {
    template_dir: PathBuf,
}

impl TextDocumentWriter {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }

    fn resolve_template(&self, custom: Option<&Path>) -> PathBuf {
        let default_template = self.template_dir.join(DEFAULT_TEMPLATE);

        match custom {
            Some(path) if path.is_file() && has_template_extension(path) => path.to_path_buf(),
            Some(path) => {
                warn!(
                    template = %path.display(),
                    fallback = %default_template.display(),
                    "custom template unusable, using default"
                );
                default_template
            }
            None => default_template,
        }
    }

    fn load_template(&self, custom: Option<&Path>) -> Result<String, WriterError> {
        let path = self.resolve_template(custom);
        fs::read_to_string(&path)
            .map_err(|source| WriterError::TemplateUnavailable { tried: path, source })
    }
}

impl DocumentWriter for TextDocumentWriter {
    fn write(
        &self,
        entries: &[DocumentEntry<'_>],
        output_path: &Path,
        template: Option<&Path>,
    ) -> Result<(), WriterError> {
        let preamble = self.load_template(template)?;
        let mut document = preamble.replace(TITLE_PLACEHOLDER, &document_title(output_path));

        for entry in entries {
            let note = entry.note;
            document.push_str("\n\n");
            document.push_str(&note.title);
            document.push('\n');
            document.push_str(&display_timestamp(&note.created));
            document.push_str("\n\n");

            for paragraph in &note.paragraphs {
                document.push_str(paragraph);
                document.push_str("\n\n");
            }

            if !note.source_location.is_empty() {
                document.push_str(&format!(
                    "Source: {} ({})\n",
                    entry.reference, note.source_location
                ));
            }
        }

        write_document(output_path, document.as_bytes())
    }
}

fn has_template_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION))
        .unwrap_or(false)
}
