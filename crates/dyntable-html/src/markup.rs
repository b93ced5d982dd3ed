// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use dyntable_app::{IndicatorPalette, Table};

pub type Attributes = Vec<(String, String)>;

/// Markup of one cell, kept verbatim apart from any injected controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMarkup {
    pub tag: String,
    pub attributes: Attributes,
    pub inner_html: String,
}

impl CellMarkup {
    pub fn empty_header() -> Self {
        Self {
            tag: "th".to_owned(),
            attributes: Vec::new(),
            inner_html: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMarkup {
    pub attributes: Attributes,
    pub cells: Vec<CellMarkup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadMarkup {
    pub attributes: Attributes,
    /// First header row; the one that receives the controls.
    pub row: Option<RowMarkup>,
    /// Serialized nodes after the first row.
    pub rest: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyMarkup {
    pub attributes: Attributes,
    /// Indexed by `RowId`, in original document order.
    pub rows: Vec<RowMarkup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Raw(String),
    Head(HeadMarkup),
    Body(BodyMarkup),
}

/// Everything about a table's markup that the model does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMarkup {
    pub(crate) attributes: Attributes,
    pub(crate) parts: Vec<Part>,
    pub(crate) head_insert_at: usize,
    pub(crate) original: String,
}

impl TableMarkup {
    /// Serialized table element exactly as the document serializes it.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

/// A table pulled out of a document: the engine model plus the markup
/// needed to write it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTable {
    pub table: Table,
    pub markup: TableMarkup,
}

impl ExtractedTable {
    pub fn render(&self, palette: &IndicatorPalette) -> String {
        self.markup.render(&self.table, palette)
    }
}
