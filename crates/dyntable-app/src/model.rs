// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::{RowId, TableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Number,
}

impl ColumnType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
        }
    }

    /// Reads a `data-type` attribute value. Anything other than `number`
    /// sorts as text.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("number") => Self::Number,
            _ => Self::String,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Spelling used by the `data-direction` attribute.
    pub const fn as_attr(self) -> &'static str {
        match self {
            Self::Ascending => "up",
            Self::Descending => "down",
        }
    }

    pub fn parse_attr(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Ascending),
            "down" => Some(Self::Descending),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Rotation applied to the bordered box that draws the arrow.
    pub const fn rotation_degrees(self) -> i32 {
        match self {
            Self::Ascending => -135,
            Self::Descending => 45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndicatorColor {
    #[default]
    Inactive,
    Active,
}

/// Visual state of one column's sort arrow. The recorded direction is the
/// source of truth for the column's current sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Indicator {
    pub color: IndicatorColor,
    pub direction: SortDirection,
}

impl Indicator {
    pub const fn is_active(self) -> bool {
        matches!(self.color, IndicatorColor::Active)
    }

    pub const fn rotation_degrees(self) -> i32 {
        self.direction.rotation_degrees()
    }
}

pub const DEFAULT_INACTIVE_COLOR: &str = "#c6c6c6";
pub const DEFAULT_ACTIVE_COLOR: &str = "black";

/// CSS colors for inactive and active indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPalette {
    pub inactive: String,
    pub active: String,
}

impl Default for IndicatorPalette {
    fn default() -> Self {
        Self {
            inactive: DEFAULT_INACTIVE_COLOR.to_owned(),
            active: DEFAULT_ACTIVE_COLOR.to_owned(),
        }
    }
}

impl IndicatorPalette {
    pub fn color(&self, color: IndicatorColor) -> &str {
        match color {
            IndicatorColor::Inactive => &self.inactive,
            IndicatorColor::Active => &self.active,
        }
    }
}

impl Indicator {
    /// Inline style declarations that draw the arrow: a bordered box
    /// rotated to point up or down.
    pub fn css_declarations(self, palette: &IndicatorPalette) -> Vec<(&'static str, String)> {
        let rotate = format!("rotate({}deg)", self.rotation_degrees());
        vec![
            ("border", format!("solid {}", palette.color(self.color))),
            ("border-width", "0 3px 3px 0".to_owned()),
            ("display", "inline-block".to_owned()),
            ("padding", "3px".to_owned()),
            ("cursor", "pointer".to_owned()),
            ("transform", rotate.clone()),
            ("-webkit-transform", rotate),
        ]
    }

    pub fn css(self, palette: &IndicatorPalette) -> String {
        self.css_declarations(palette)
            .into_iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Controls injected into a header cell on activation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnControls {
    pub filter: String,
    pub indicator: Indicator,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderCell {
    pub label: String,
    pub column_type: ColumnType,
    pub controls: Option<ColumnControls>,
}

impl HeaderCell {
    pub fn new(label: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            label: label.into(),
            column_type,
            controls: None,
        }
    }

    pub fn filter(&self) -> &str {
        self.controls
            .as_ref()
            .map(|controls| controls.filter.as_str())
            .unwrap_or("")
    }

    pub fn indicator(&self) -> Option<Indicator> {
        self.controls.as_ref().map(|controls| controls.indicator)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRow {
    pub id: RowId,
    pub cells: Vec<String>,
    pub visible: bool,
}

impl BodyRow {
    pub fn new(id: RowId, cells: Vec<String>) -> Self {
        Self {
            id,
            cells,
            visible: true,
        }
    }

    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// In-memory picture of one table: an optional header row and an optional
/// body, mirroring `tHead.rows[0]` and `tBodies[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub header: Option<Vec<HeaderCell>>,
    pub body: Option<Vec<BodyRow>>,
}

impl Table {
    pub fn new(id: TableId, header: Option<Vec<HeaderCell>>, body: Option<Vec<BodyRow>>) -> Self {
        Self { id, header, body }
    }

    /// Builds a table from plain text rows, numbering rows in order.
    pub fn from_rows<I, R, S>(
        id: impl Into<TableId>,
        header: Option<Vec<HeaderCell>>,
        rows: I,
    ) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let body = rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| {
                BodyRow::new(RowId::new(index), cells.into_iter().map(Into::into).collect())
            })
            .collect();
        Self::new(id.into(), header, Some(body))
    }

    /// Column count as the header defines it, falling back to the first
    /// body row when no header exists.
    pub fn column_count(&self) -> usize {
        match &self.header {
            Some(cells) => cells.len(),
            None => self
                .rows()
                .first()
                .map(|row| row.cells.len())
                .unwrap_or(0),
        }
    }

    pub fn header_cells(&self) -> &[HeaderCell] {
        self.header.as_deref().unwrap_or(&[])
    }

    pub fn rows(&self) -> &[BodyRow] {
        self.body.as_deref().unwrap_or(&[])
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &BodyRow> {
        self.rows().iter().filter(|row| row.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    pub fn column_type(&self, column: usize) -> ColumnType {
        self.header_cells()
            .get(column)
            .map(|cell| cell.column_type)
            .unwrap_or_default()
    }

    /// Creates a header row of empty cells when none exists. Returns true
    /// when a header was synthesized.
    pub fn ensure_header(&mut self) -> bool {
        if self.header.is_some() {
            return false;
        }
        let Some(first) = self.rows().first() else {
            log::debug!("table {}: no rows to derive a header from", self.id);
            return false;
        };
        let columns = first.cells.len();
        self.header = Some(vec![HeaderCell::default(); columns]);
        log::debug!("table {}: synthesized header with {columns} cells", self.id);
        true
    }

    /// True once every header cell carries filter and sort controls.
    pub fn is_dynamic(&self) -> bool {
        let cells = self.header_cells();
        !cells.is_empty() && cells.iter().all(|cell| cell.controls.is_some())
    }

    /// Injects one filter input and one sort indicator per header cell.
    /// Returns the activation summary, or `None` when the table was already
    /// dynamic or has no columns to enhance.
    pub fn make_dynamic(&mut self) -> Option<Activation> {
        let synthesized_header = self.ensure_header();
        if self.is_dynamic() {
            log::debug!("table {}: already dynamic", self.id);
            return None;
        }
        let cells = self.header.as_mut()?;
        if cells.is_empty() {
            return None;
        }
        for cell in cells.iter_mut() {
            cell.controls.get_or_insert_with(ColumnControls::default);
        }
        Some(Activation {
            columns: cells.len(),
            synthesized_header,
        })
    }

    /// The single active sort column, if any.
    pub fn active_sort(&self) -> Option<(usize, SortDirection)> {
        self.header_cells()
            .iter()
            .enumerate()
            .find_map(|(column, cell)| {
                cell.indicator()
                    .filter(|indicator| indicator.is_active())
                    .map(|indicator| (column, indicator.direction))
            })
    }

    /// Resolves a column by zero-based index or by header label.
    pub fn find_column(&self, key: &str) -> Option<usize> {
        let key = key.trim();
        if let Ok(index) = key.parse::<usize>() {
            return (index < self.column_count()).then_some(index);
        }
        self.header_cells()
            .iter()
            .position(|cell| cell.label.trim() == key)
            .or_else(|| {
                self.header_cells()
                    .iter()
                    .position(|cell| cell.label.trim().eq_ignore_ascii_case(key))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    pub columns: usize,
    pub synthesized_header: bool,
}
