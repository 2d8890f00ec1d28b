// src/corpus/mod.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::extractors::segment::{ContentItem, SectionRecord};

/// Storage slot for one title. The first record for a title is stored as-is;
/// the first collision promotes the slot to `Many` and every later collision
/// extends it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CorpusContent {
    Single(Vec<ContentItem>),
    Many(Vec<ContentItem>),
}

impl CorpusContent {
    /// Appends colliding content. The `Single` -> `Many` promotion happens
    /// exactly once; appending to `Many` is a plain extend.
    fn append(&mut self, items: Vec<ContentItem>) {
        match self {
            CorpusContent::Single(existing) => {
                let mut merged = std::mem::take(existing);
                merged.extend(items);
                *self = CorpusContent::Many(merged);
            }
            CorpusContent::Many(existing) => existing.extend(items),
        }
    }

    fn into_items(self) -> Vec<ContentItem> {
        match self {
            CorpusContent::Single(items) | CorpusContent::Many(items) => items,
        }
    }
}

/// One exported corpus entry: everything accumulated under a title.
/// Section types are not retained in the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub title: String,
    pub content: Vec<ContentItem>,
}

/// Accumulates section records across documents into a title-keyed corpus.
///
/// Titles keep first-insertion order; content under an existing title only
/// ever grows. All mutation goes through [`merge`](CorpusMerger::merge) on an
/// explicit instance threaded through the run.
#[derive(Debug, Default)]
pub struct CorpusMerger {
    entries: Vec<(String, CorpusContent)>,
    index: HashMap<String, usize>,
}

impl CorpusMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one document's records into the corpus, in emission order.
    /// Titles are taken as-is; an empty title is an ordinary (if unusual)
    /// title string.
    pub fn merge(&mut self, records: Vec<SectionRecord>) {
        for record in records {
            match self.index.get(&record.title) {
                Some(&i) => self.entries[i].1.append(record.content),
                None => {
                    self.index.insert(record.title.clone(), self.entries.len());
                    self.entries
                        .push((record.title, CorpusContent::Single(record.content)));
                }
            }
        }
    }

    /// Number of distinct titles accumulated so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads the corpus out as `{title, content}` pairs, in first-insertion
    /// order of titles.
    pub fn export(self) -> Vec<CorpusEntry> {
        self.entries
            .into_iter()
            .map(|(title, content)| CorpusEntry {
                title,
                content: content.into_items(),
            })
            .collect()
    }
}
