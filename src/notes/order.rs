use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::Note;
use crate::util::read_json;

const LOCATOR_PATTERN: &str = r"\W([0-9]+)|;|:.*";

#[derive(Debug, Clone, Default)]
pub struct CanonicalOrder {
    titles: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl CanonicalOrder {
    pub fn new(titles: Vec<String>) -> Self {
        let ranks = titles
            .iter()
            .enumerate()
            .map(|(index, title)| (title.clone(), index))
            .collect();
        Self { titles, ranks }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let titles: Vec<String> = read_json(path)?;
        Ok(Self::new(titles))
    }

    pub fn rank(&self, work_title: &str) -> WorkRank {
        self.ranks
            .get(work_title)
            .map(|index| WorkRank::Known(*index))
            .unwrap_or(WorkRank::Unranked)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkRank {
    Known(usize),
    Unranked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub rank: WorkRank,
    pub chapter: u64,
    pub verse: u64,
}

#[derive(Debug)]
pub struct NoteSorter {
    locator: Regex,
}

impl NoteSorter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            locator: Regex::new(LOCATOR_PATTERN).context("failed to compile locator regex")?,
        })
    }

    pub fn work_title(&self, title: &str) -> String {
        self.locator.replace_all(title, "").into_owned()
    }

    pub fn title_locator(&self, title: &str) -> (u64, u64) {
        let mut numbers = self
            .locator
            .captures_iter(title)
            .filter_map(|captures| captures.get(1))
            .map(|number| number.as_str().parse::<u64>().unwrap_or(u64::MAX));

        match numbers.next() {
            Some(chapter) => (chapter, numbers.next().unwrap_or(0)),
            None => (0, 0),
        }
    }

    pub fn sort_key(&self, title: &str, order: &CanonicalOrder) -> SortKey {
        let (chapter, verse) = self.title_locator(title);
        SortKey {
            rank: order.rank(&self.work_title(title)),
            chapter,
            verse,
        }
    }

    pub fn sort(&self, mut notes: Vec<Note>, order: &CanonicalOrder) -> Vec<Note> {
        notes.sort_by_cached_key(|note| self.sort_key(&note.title, order));
        notes
    }
}
