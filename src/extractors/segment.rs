// src/extractors/segment.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::markup::{Node, TagRole};

// --- Regex Patterns for Text Matching (Lazy Static) ---
/// Matches text that begins with the literal word "Definition" followed by
/// digits, e.g. "Definition 7". Used both as a heading trigger and for
/// title-based type inference.
static DEFINITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Definition \d+").expect("Failed to compile DEFINITION_RE"));

/// Rules for inferring a section type from its title at the end-of-document
/// flush, evaluated in fixed priority order; the first hit wins. The
/// substring checks are case-insensitive, while the in-document sub-section
/// markers are matched case-sensitively against node text. The two
/// vocabularies are intentionally not unified.
static TITLE_TYPE_RULES: [(fn(&str) -> bool, SectionType); 4] = [
    (
        |title| title.to_lowercase().contains("solution"),
        SectionType::Solution,
    ),
    (
        |title| title.to_lowercase().contains("proof"),
        SectionType::Proof,
    ),
    (
        |title| title.to_lowercase().contains("sources"),
        SectionType::Sources,
    ),
    (|title| DEFINITION_RE.is_match(title), SectionType::Definition),
];

// --- Data Structures ---

/// Semantic role assigned to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Definition,
    Proof,
    Solution,
    Sources,
}

impl SectionType {
    /// Maps a bare sub-section marker to its type. The marker vocabulary is
    /// matched case-sensitively, exactly as it appears in the text.
    fn from_marker(text: &str) -> Option<Self> {
        match text {
            "Proof" => Some(SectionType::Proof),
            "Solution" => Some(SectionType::Solution),
            "Sources" => Some(SectionType::Sources),
            _ => None,
        }
    }
}

/// One ordered unit of section content: a prose fragment or a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentItem {
    Text(String),
    Table(Vec<Vec<String>>),
}

/// A titled span of one document's content. A document may emit several
/// records sharing a title (each sub-section marker closes one out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub title: String,
    pub content: Vec<ContentItem>,
    #[serde(rename = "type")]
    pub kind: Option<SectionType>,
}

// --- Main Segmenter Structure ---
pub struct SectionSegmenter;

impl SectionSegmenter {
    pub fn new() -> Self {
        Self {}
    }

    /// Partitions a document's node sequence into titled section records.
    ///
    /// Scans `nodes` in order, accumulating content under the most recent
    /// heading or definition marker. Body text is appended as running
    /// context without touching section boundaries. A bare "Proof" /
    /// "Solution" / "Sources" node closes the accumulated content out as a
    /// typed sub-section under the same title. Content seen before the first
    /// title is discarded; a heading with empty text leaves the accumulator
    /// untitled.
    pub fn segment(&self, nodes: &[Node]) -> Vec<SectionRecord> {
        let mut records = Vec::new();
        let mut current_title: Option<String> = None;
        let mut current_content: Vec<ContentItem> = Vec::new();

        for node in nodes {
            if node.role == TagRole::Body {
                if !node.text.is_empty() {
                    current_content.push(ContentItem::Text(node.text.clone()));
                }
            } else if node.role.is_heading() || DEFINITION_RE.is_match(&node.text) {
                if let Some(title) = current_title.take() {
                    let kind = if DEFINITION_RE.is_match(&title) {
                        Some(SectionType::Definition)
                    } else {
                        None
                    };
                    records.push(SectionRecord {
                        title,
                        content: std::mem::take(&mut current_content),
                        kind,
                    });
                }
                current_title = if node.text.is_empty() {
                    None
                } else {
                    Some(node.text.clone())
                };
                current_content.clear();
            } else if node.role == TagRole::Table {
                current_content.push(ContentItem::Table(node.rows.clone()));
            } else if node.role == TagRole::Text && !node.text.is_empty() {
                match (SectionType::from_marker(&node.text), &current_title) {
                    (Some(kind), Some(title)) => {
                        records.push(SectionRecord {
                            title: title.clone(),
                            content: std::mem::take(&mut current_content),
                            kind: Some(kind),
                        });
                    }
                    _ => current_content.push(ContentItem::Text(node.text.clone())),
                }
            }
        }

        if let Some(title) = current_title {
            let kind = infer_title_type(&title);
            records.push(SectionRecord {
                title,
                content: current_content,
                kind,
            });
        }

        records
    }
}

fn infer_title_type(title: &str) -> Option<SectionType> {
    TITLE_TYPE_RULES
        .iter()
        .find(|(matches, _)| matches(title))
        .map(|&(_, kind)| kind)
}
