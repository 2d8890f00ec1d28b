// src/markup/mod.rs
pub mod parser;

pub use parser::parse_nodes;

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE"));

/// Collapses every whitespace run (spaces, newlines, tabs) to a single space
/// and trims the result. Applied to all extracted text, including table cells,
/// before it is compared or stored.
pub fn normalize_text(value: &str) -> String {
    WHITESPACE_RE.replace_all(value, " ").trim().to_string()
}

/// Semantic role of a markup tag, as far as segmentation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRole {
    Heading1,
    Heading2,
    Heading3,
    Table,
    /// The document-level body tag. Its full text is appended as running
    /// context and never opens or closes a section.
    Body,
    /// Content-bearing tags (p, div, td, blockquote, ...).
    Text,
    /// Inline/structural tags with no content value (span, meta, links,
    /// lists, list items). Filtered from content.
    Structural,
}

impl TagRole {
    pub fn is_heading(self) -> bool {
        matches!(self, TagRole::Heading1 | TagRole::Heading2 | TagRole::Heading3)
    }
}

/// One tagged, ordered unit of parsed markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub role: TagRole,
    /// Whitespace-normalized full text of the tag, including for tables.
    pub text: String,
    /// Row/cell structure, populated for `Table` nodes only.
    pub rows: Vec<Vec<String>>,
}

impl Node {
    pub fn new(role: TagRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: normalize_text(&text.into()),
            rows: Vec::new(),
        }
    }

    /// Builds a table node from raw rows of cell text; cells are normalized.
    pub fn table(text: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.iter().map(|cell| normalize_text(cell)).collect())
            .collect();
        Self {
            role: TagRole::Table,
            text: normalize_text(&text.into()),
            rows,
        }
    }
}
