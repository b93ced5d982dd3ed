// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{BodyRow, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    pub visible: usize,
    pub total: usize,
}

/// Current text of every header filter input, ordered by column.
pub fn filter_values(table: &Table) -> Vec<String> {
    table
        .header_cells()
        .iter()
        .map(|cell| cell.filter().to_owned())
        .collect()
}

/// True when every cell contains the filter text of its column. Columns
/// without a filter, and filters without a cell, pass.
pub fn row_matches(row: &BodyRow, filters: &[String]) -> bool {
    row.cells
        .iter()
        .zip(filters)
        .all(|(cell, filter)| cell.contains(filter.as_str()))
}

/// Recomputes the visibility of every body row from the current filter
/// inputs. Returns `None` when the table has no body.
pub fn filter_columns(table: &mut Table) -> Option<FilterOutcome> {
    let filters = filter_values(table);
    let Some(rows) = table.body.as_mut() else {
        log::debug!("table {}: no body to filter", table.id);
        return None;
    };

    let mut visible = 0;
    for row in rows.iter_mut() {
        row.visible = row_matches(row, &filters);
        if row.visible {
            visible += 1;
        }
    }
    log::trace!(
        "table {}: filter {filters:?} keeps {visible}/{} rows",
        table.id,
        rows.len()
    );
    Some(FilterOutcome {
        visible,
        total: rows.len(),
    })
}

/// Sets one column's filter input, as a keystroke would, and re-filters.
/// Returns `None` when the column has no filter input.
pub fn set_filter(table: &mut Table, column: usize, value: &str) -> Option<FilterOutcome> {
    let controls = table
        .header
        .as_mut()?
        .get_mut(column)?
        .controls
        .as_mut()?;
    value.clone_into(&mut controls.filter);
    filter_columns(table)
}

/// Empties every filter input and shows every row again.
pub fn clear_filters(table: &mut Table) -> Option<FilterOutcome> {
    for cell in table.header.iter_mut().flatten() {
        if let Some(controls) = cell.controls.as_mut() {
            controls.filter.clear();
        }
    }
    filter_columns(table)
}
