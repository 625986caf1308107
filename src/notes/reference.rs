use std::fmt;

use super::citation::{
    Citation, DisplayNames, ManualCitation, PeriodicalCitation, ScriptureCitation, parse_citation,
};
use crate::error::CitationError;

pub const UNRESOLVED_REFERENCE: &str = "(unrecognized source)";

pub fn render_reference(citation: &Citation) -> String {
    match citation {
        Citation::Scripture(ScriptureCitation {
            book,
            sub_book,
            chapter: Some(chapter),
            verse,
        }) => format!("{book}, {sub_book} {chapter}:{verse}"),
        Citation::Scripture(ScriptureCitation {
            book,
            sub_book,
            chapter: None,
            verse,
        }) => format!("{book}, {sub_book} {verse}"),
        Citation::Manual(ManualCitation {
            manual,
            chapter,
            verse,
        }) => format!("{manual}, {chapter}:{verse}"),
        Citation::Periodical(PeriodicalCitation {
            year,
            month,
            article,
            verse,
        }) => format!("Ensign, {month} {year}, {article}, {verse}"),
    }
}

pub fn render_reference_line(url: &str, names: &DisplayNames) -> Result<String, CitationError> {
    parse_citation(url, names).map(|citation| render_reference(&citation))
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_reference(self))
    }
}
