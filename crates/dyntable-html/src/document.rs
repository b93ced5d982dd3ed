// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use dyntable_app::{IndicatorPalette, TableId};
use scraper::{Html, Selector};

use crate::extract::extract_table;
use crate::markup::{ExtractedTable, TableMarkup};

/// A parsed HTML document holding zero or more tables.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        let html = Html::parse_document(source);
        if !html.errors.is_empty() {
            log::debug!("html parser recovered from {} errors", html.errors.len());
        }
        Self { html }
    }

    /// Ids of every table element that has one, in document order.
    pub fn table_ids(&self) -> Result<Vec<String>> {
        let selector = table_selector("table[id]")?;
        Ok(self
            .html
            .select(&selector)
            .filter_map(|table| table.value().id())
            .map(str::to_owned)
            .collect())
    }

    /// Reads the first table whose id is `id`. Returns `None` when the
    /// document has no such table.
    pub fn extract(&self, id: &TableId) -> Option<ExtractedTable> {
        let selector = table_selector("table").ok()?;
        let element = self
            .html
            .select(&selector)
            .find(|table| table.value().id() == Some(id.as_str()));
        let Some(element) = element else {
            log::debug!("no table with id {id:?}");
            return None;
        };
        Some(extract_table(element, id))
    }

    /// Serializes the whole document with `markup`'s table swapped for
    /// `rendered`.
    pub fn replace_table(&self, markup: &TableMarkup, rendered: &str) -> String {
        self.html.html().replacen(markup.original(), rendered, 1)
    }

    /// Activates the table `id` and returns the enhanced document. Returns
    /// `None` when there is no such table.
    pub fn make_table_dynamic(&self, id: &TableId, palette: &IndicatorPalette) -> Option<String> {
        let mut extracted = self.extract(id)?;
        extracted.table.make_dynamic();
        let rendered = extracted.render(palette);
        Some(self.replace_table(&extracted.markup, &rendered))
    }

    pub fn html(&self) -> String {
        self.html.html()
    }
}

fn table_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|error| anyhow!("parse selector {selector:?}: {error}"))
}
