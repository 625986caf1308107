use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::CitationError;
use crate::util::read_json;

const STUDY_HOST: &str = "www.churchofjesuschrist.org";
const HOST_SEGMENT_INDEX: usize = 2;
const STUDY_SEGMENT: &str = "study";
const STUDY_SEGMENT_INDEX: usize = 3;
const GRAMMAR_SEGMENT_INDEX: usize = 4;
const MIN_URL_SEGMENTS: usize = 7;
const PARAGRAPH_PARAMETER: &str = "id";
const PARAGRAPH_PREFIX: char = 'p';

const FRONT_MATTER_PAGES: [&str; 4] = ["three", "js", "eight", "introduction"];

const GRAMMARS: [(&str, Grammar); 3] = [
    ("scriptures", Grammar::Scripture),
    ("manual", Grammar::Manual),
    ("ensign", Grammar::Periodical),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Citation {
    Scripture(ScriptureCitation),
    Manual(ManualCitation),
    Periodical(PeriodicalCitation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptureCitation {
    pub book: String,
    pub sub_book: String,
    pub chapter: Option<u32>,
    pub verse: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualCitation {
    pub manual: String,
    pub chapter: u32,
    pub verse: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodicalCitation {
    pub year: String,
    pub month: String,
    pub article: String,
    pub verse: u32,
}

/// Which URL grammar a study link is read with.
///
/// `DefaultScripture` covers every discriminant not in the dispatch table.
/// It is a heuristic: periodicals other than the Ensign land here and are
/// read as scripture links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Scripture,
    Manual,
    Periodical,
    DefaultScripture,
}

impl Grammar {
    pub fn for_segment(segment: &str) -> Self {
        GRAMMARS
            .iter()
            .find(|(name, _)| *name == segment)
            .map(|(_, grammar)| *grammar)
            .unwrap_or(Self::DefaultScripture)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scripture => "scripture",
            Self::Manual => "manual",
            Self::Periodical => "periodical",
            Self::DefaultScripture => "default_scripture",
        }
    }

    fn parse(self, path: &StudyPath<'_>, names: &DisplayNames) -> Result<Citation, CitationError> {
        match self {
            Self::Scripture | Self::DefaultScripture => parse_scripture(path, names),
            Self::Manual => parse_manual(path, names),
            Self::Periodical => parse_periodical(path, names),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DisplayNames(HashMap<String, String>);

impl DisplayNames {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    pub fn resolve(&self, token: &str) -> String {
        self.0
            .get(token)
            .cloned()
            .unwrap_or_else(|| token.to_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DisplayNames {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

pub fn parse_citation(url: &str, names: &DisplayNames) -> Result<Citation, CitationError> {
    let path = StudyPath::parse(url)?;
    Grammar::for_segment(path.discriminant()).parse(&path, names)
}

pub fn grammar_for(url: &str) -> Result<Grammar, CitationError> {
    StudyPath::parse(url).map(|path| Grammar::for_segment(path.discriminant()))
}

struct StudyPath<'a> {
    url: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> StudyPath<'a> {
    fn parse(url: &'a str) -> Result<Self, CitationError> {
        let trimmed = url.trim();
        let without_fragment = trimmed.split('#').next().unwrap_or(trimmed);
        let segments = without_fragment.split('/').collect::<Vec<&str>>();

        let has_scheme = segments.first().is_some_and(|scheme| scheme.ends_with(':'))
            && segments.get(1).is_some_and(|empty| empty.is_empty());
        let is_study_host = segments
            .get(HOST_SEGMENT_INDEX)
            .is_some_and(|host| host.eq_ignore_ascii_case(STUDY_HOST));
        let is_study_link = segments.get(STUDY_SEGMENT_INDEX) == Some(&STUDY_SEGMENT);

        if segments.len() < MIN_URL_SEGMENTS || !has_scheme || !is_study_host || !is_study_link {
            return Err(CitationError::unrecognized(url));
        }

        Ok(Self {
            url,
            segments: segments[GRAMMAR_SEGMENT_INDEX..].to_vec(),
        })
    }

    fn discriminant(&self) -> &'a str {
        self.segment(0)
    }

    fn segment(&self, index: usize) -> &'a str {
        self.segments.get(index).copied().unwrap_or("")
    }

    fn leaf(&self) -> &'a str {
        self.segments.last().copied().unwrap_or("")
    }

    fn parent(&self) -> &'a str {
        self.segments
            .len()
            .checked_sub(2)
            .map(|index| self.segment(index))
            .unwrap_or("")
    }

    fn leaf_stem(&self) -> &'a str {
        let leaf = self.leaf();
        leaf.split('?').next().unwrap_or(leaf)
    }

    fn paragraph(&self) -> Result<u32, CitationError> {
        let id = self
            .leaf()
            .split_once('?')
            .and_then(|(_, query)| {
                query.split('&').find_map(|pair| match pair.split_once('=') {
                    Some((key, value)) if key == PARAGRAPH_PARAMETER => Some(value),
                    _ => None,
                })
            })
            .ok_or_else(|| CitationError::unrecognized(self.url))?;
        let token = id.strip_prefix(PARAGRAPH_PREFIX).unwrap_or(id);
        parse_number(self.url, "verse", token)
    }
}

fn parse_number(url: &str, field: &'static str, token: &str) -> Result<u32, CitationError> {
    if token.is_empty() || !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(CitationError::malformed(url, field, token));
    }

    token
        .parse::<u32>()
        .map_err(|_| CitationError::malformed(url, field, token))
}

fn parse_scripture(path: &StudyPath<'_>, names: &DisplayNames) -> Result<Citation, CitationError> {
    let book = names.resolve(path.segment(1));
    let chapter_token = path.leaf_stem();
    let verse = path.paragraph()?;

    if FRONT_MATTER_PAGES.contains(&chapter_token) {
        return Ok(Citation::Scripture(ScriptureCitation {
            book,
            sub_book: names.resolve(chapter_token),
            chapter: None,
            verse,
        }));
    }

    Ok(Citation::Scripture(ScriptureCitation {
        book,
        sub_book: names.resolve(path.parent()),
        chapter: Some(parse_number(path.url, "chapter", chapter_token)?),
        verse,
    }))
}

fn parse_manual(path: &StudyPath<'_>, names: &DisplayNames) -> Result<Citation, CitationError> {
    Ok(Citation::Manual(ManualCitation {
        manual: names.resolve(path.segment(1)),
        chapter: parse_number(path.url, "chapter", path.leaf_stem())?,
        verse: path.paragraph()?,
    }))
}

fn parse_periodical(path: &StudyPath<'_>, names: &DisplayNames) -> Result<Citation, CitationError> {
    if path.segments.len() < 4 {
        return Err(CitationError::unrecognized(path.url));
    }

    Ok(Citation::Periodical(PeriodicalCitation {
        year: names.resolve(path.segment(1)),
        month: names.resolve(path.segment(2)),
        article: names.resolve(path.leaf_stem()),
        verse: path.paragraph()?,
    }))
}
