// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;
use std::cmp::Ordering;

use crate::model::{BodyRow, ColumnType, Indicator, IndicatorColor, SortDirection, Table};

/// How rows are reordered once a column's direction is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// Stable insertion ordering; ties and unordered pairs never move.
    #[default]
    Stable,
    /// Pairwise relocation: for every pair i<j, an out-of-order row j is
    /// moved to just before row i.
    Relocate,
}

impl SortStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Relocate => "relocate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stable" => Some(Self::Stable),
            "relocate" => Some(Self::Relocate),
            _ => None,
        }
    }

    pub fn apply(
        self,
        rows: &mut Vec<BodyRow>,
        column: usize,
        column_type: ColumnType,
        direction: SortDirection,
    ) {
        match self {
            Self::Stable => stable_order(rows, column, column_type, direction),
            Self::Relocate => order(rows, column, column_type, direction),
        }
    }
}

pub fn apply_indicator_style(
    indicator: &mut Indicator,
    color: IndicatorColor,
    direction: SortDirection,
) {
    indicator.color = color;
    indicator.direction = direction;
}

/// Puts every indicator of the table back to its inactive, upward state.
pub fn reset_indicators(table: &mut Table) {
    for cell in table.header.iter_mut().flatten() {
        if let Some(controls) = cell.controls.as_mut() {
            apply_indicator_style(
                &mut controls.indicator,
                IndicatorColor::Inactive,
                SortDirection::Ascending,
            );
        }
    }
}

/// Parses the leading number of `text` the way a lenient float parser
/// does: surrounding garbage after the number is ignored, and text with no
/// leading number is NaN.
pub fn parse_leading_number(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if trimmed[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - digits_start;
    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        digits += fraction_end - fraction_start;
        if digits > 0 {
            end = fraction_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while bytes.get(exponent_end).is_some_and(u8::is_ascii_digit) {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    trimmed[..end].parse().unwrap_or(f64::NAN)
}

/// Compares two cell texts case-insensitively, numerically for number
/// columns. `None` means the pair is unordered (a NaN was involved).
pub fn compare_cells(left: &str, right: &str, column_type: ColumnType) -> Option<Ordering> {
    let left = left.to_lowercase();
    let right = right.to_lowercase();
    match column_type {
        ColumnType::String => Some(left.cmp(&right)),
        ColumnType::Number => parse_leading_number(&left).partial_cmp(&parse_leading_number(&right)),
    }
}

/// True when `earlier` must come after `later` for the requested direction.
fn out_of_order(
    earlier: &BodyRow,
    later: &BodyRow,
    column: usize,
    column_type: ColumnType,
    direction: SortDirection,
) -> bool {
    let (Some(left), Some(right)) = (earlier.cell(column), later.cell(column)) else {
        return false;
    };
    let wanted = match direction {
        SortDirection::Ascending => Ordering::Greater,
        SortDirection::Descending => Ordering::Less,
    };
    compare_cells(left, right, column_type) == Some(wanted)
}

/// Moves row `j` to just before row `i` when the pair is out of order.
/// Returns true when a row moved.
pub fn switch_rows(
    rows: &mut Vec<BodyRow>,
    i: usize,
    j: usize,
    column: usize,
    column_type: ColumnType,
    direction: SortDirection,
) -> bool {
    if i >= j || j >= rows.len() {
        return false;
    }
    if !out_of_order(&rows[i], &rows[j], column, column_type, direction) {
        return false;
    }
    let row = rows.remove(j);
    rows.insert(i, row);
    true
}

/// Pairwise relocation over every pair i<j.
pub fn order(
    rows: &mut Vec<BodyRow>,
    column: usize,
    column_type: ColumnType,
    direction: SortDirection,
) {
    if rows.len() < 2 {
        return;
    }
    for i in 0..rows.len() {
        for j in i + 1..rows.len() {
            switch_rows(rows, i, j, column, column_type, direction);
        }
    }
}

/// True when the row has a comparable key at `column`: a cell exists and,
/// for number columns, its leading number parses.
fn has_sort_key(row: &BodyRow, column: usize, column_type: ColumnType) -> bool {
    match (row.cell(column), column_type) {
        (None, _) => false,
        (Some(_), ColumnType::String) => true,
        (Some(text), ColumnType::Number) => !parse_leading_number(&text.to_lowercase()).is_nan(),
    }
}

/// Stable ordering with the same comparator as [`order`]. Rows without a
/// comparable key keep their slots; the other rows are sorted into the
/// remaining slots, ties keeping their relative order.
pub fn stable_order(
    rows: &mut [BodyRow],
    column: usize,
    column_type: ColumnType,
    direction: SortDirection,
) {
    let slots = (0..rows.len())
        .filter(|&index| has_sort_key(&rows[index], column, column_type))
        .collect::<Vec<_>>();
    let mut keyed = slots
        .iter()
        .map(|&index| rows[index].clone())
        .collect::<Vec<_>>();
    keyed.sort_by(|left, right| {
        let ordering = match (left.cell(column), right.cell(column)) {
            (Some(left), Some(right)) => {
                compare_cells(left, right, column_type).unwrap_or(Ordering::Equal)
            }
            _ => Ordering::Equal,
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    for (index, row) in slots.into_iter().zip(keyed) {
        rows[index] = row;
    }
}

/// Handles a click on a column's indicator: an inactive column activates
/// ascending, the active column flips. All other indicators reset. Returns
/// the applied direction, or `None` when the column has no indicator.
pub fn click_indicator(
    table: &mut Table,
    column: usize,
    strategy: SortStrategy,
) -> Option<SortDirection> {
    let current = table.header_cells().get(column)?.indicator()?;
    let direction = if current.is_active() {
        current.direction.toggled()
    } else {
        SortDirection::Ascending
    };

    reset_indicators(table);
    let controls = table
        .header
        .as_mut()?
        .get_mut(column)?
        .controls
        .as_mut()?;
    apply_indicator_style(&mut controls.indicator, IndicatorColor::Active, direction);

    let column_type = table.column_type(column);
    let Some(rows) = table.body.as_mut() else {
        log::debug!("table {}: no body to sort", table.id);
        return Some(direction);
    };
    strategy.apply(rows, column, column_type, direction);
    log::debug!(
        "table {}: sorted column {column} {} as {} ({})",
        table.id,
        direction.label(),
        column_type.as_str(),
        strategy.as_str()
    );
    Some(direction)
}

#[cfg(test)]
mod tests {
    use super::{
        SortStrategy, click_indicator, compare_cells, order, parse_leading_number,
        reset_indicators, stable_order, switch_rows,
    };
    use crate::model::{BodyRow, ColumnType, HeaderCell, SortDirection, Table};
    use std::cmp::Ordering;

    fn rows(values: &[&str]) -> Vec<BodyRow> {
        Table::from_rows("t", None, values.iter().map(|value| [*value]))
            .body
            .unwrap_or_default()
    }

    fn texts(rows: &[BodyRow]) -> Vec<&str> {
        rows.iter().filter_map(|row| row.cell(0)).collect()
    }

    fn table(column_type: ColumnType, values: &[&str]) -> Table {
        let mut table = Table::from_rows(
            "t",
            Some(vec![HeaderCell::new("Value", column_type)]),
            values.iter().map(|value| [*value]),
        );
        table.make_dynamic();
        table
    }

    #[test]
    fn leading_number_parse_is_lenient() {
        assert_eq!(parse_leading_number("42"), 42.0);
        assert_eq!(parse_leading_number("  -3.5kg"), -3.5);
        assert_eq!(parse_leading_number(".5"), 0.5);
        assert_eq!(parse_leading_number("7."), 7.0);
        assert_eq!(parse_leading_number("1e3x"), 1000.0);
        assert_eq!(parse_leading_number("2e"), 2.0);
        assert_eq!(parse_leading_number("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_leading_number("abc").is_nan());
        assert!(parse_leading_number("").is_nan());
        assert!(parse_leading_number("-.").is_nan());
    }

    #[test]
    fn string_compare_ignores_case() {
        assert_eq!(compare_cells("apple", "Banana", ColumnType::String), Some(Ordering::Less));
        assert_eq!(compare_cells("ABC", "abc", ColumnType::String), Some(Ordering::Equal));
    }

    #[test]
    fn numeric_compare_with_nan_is_unordered() {
        assert_eq!(compare_cells("10", "2", ColumnType::Number), Some(Ordering::Greater));
        assert_eq!(compare_cells("n/a", "2", ColumnType::Number), None);
    }

    #[test]
    fn switch_rows_relocates_later_row_before_earlier() {
        let mut values = rows(&["c", "a", "b"]);
        assert!(switch_rows(&mut values, 0, 2, 0, ColumnType::String, SortDirection::Ascending));
        assert_eq!(texts(&values), vec!["b", "c", "a"]);
        assert!(!switch_rows(&mut values, 1, 1, 0, ColumnType::String, SortDirection::Ascending));
        assert!(!switch_rows(&mut values, 0, 9, 0, ColumnType::String, SortDirection::Ascending));
    }

    #[test]
    fn numeric_and_string_orders_differ() {
        for strategy in [SortStrategy::Stable, SortStrategy::Relocate] {
            let mut numeric = rows(&["10", "2", "33"]);
            strategy.apply(&mut numeric, 0, ColumnType::Number, SortDirection::Ascending);
            assert_eq!(texts(&numeric), vec!["2", "10", "33"], "{strategy:?}");

            let mut lexical = rows(&["10", "2", "33"]);
            strategy.apply(&mut lexical, 0, ColumnType::String, SortDirection::Ascending);
            assert_eq!(texts(&lexical), vec!["10", "2", "33"], "{strategy:?}");
        }
    }

    #[test]
    fn descending_reverses_numeric_order() {
        let mut values = rows(&["5", "40", "3", "12"]);
        order(&mut values, 0, ColumnType::Number, SortDirection::Descending);
        assert_eq!(texts(&values), vec!["40", "12", "5", "3"]);
    }

    #[test]
    fn ties_keep_their_relative_order() {
        for strategy in [SortStrategy::Stable, SortStrategy::Relocate] {
            let mut values =
                Table::from_rows("t", None, [["b", "1"], ["a", "2"], ["B", "3"], ["a", "4"]])
                    .body
                    .unwrap_or_default();
            strategy.apply(&mut values, 0, ColumnType::String, SortDirection::Ascending);
            let ids: Vec<&str> = values.iter().filter_map(|row| row.cell(1)).collect();
            assert_eq!(ids, vec!["2", "4", "1", "3"], "{strategy:?}");
        }
    }

    #[test]
    fn descending_ties_keep_their_relative_order() {
        let mut values = Table::from_rows("t", None, [["1", "a"], ["2", "b"], ["1", "c"], ["2", "d"]])
            .body
            .unwrap_or_default();
        stable_order(&mut values, 0, ColumnType::Number, SortDirection::Descending);
        let ids: Vec<&str> = values.iter().filter_map(|row| row.cell(1)).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn unparseable_cells_do_not_block_numeric_ordering() {
        for strategy in [SortStrategy::Stable, SortStrategy::Relocate] {
            let mut values = rows(&["40", "n/a", "30", "2", "10"]);
            strategy.apply(&mut values, 0, ColumnType::Number, SortDirection::Ascending);
            let numbers: Vec<&str> = texts(&values)
                .into_iter()
                .filter(|text| *text != "n/a")
                .collect();
            assert_eq!(numbers, vec!["2", "10", "30", "40"], "{strategy:?}");
        }
    }

    #[test]
    fn stable_order_keeps_unparseable_rows_in_place() {
        let mut ascending = rows(&["40", "n/a", "30", "2", "10"]);
        stable_order(&mut ascending, 0, ColumnType::Number, SortDirection::Ascending);
        assert_eq!(texts(&ascending), vec!["2", "n/a", "10", "30", "40"]);

        let mut descending = rows(&["2", "10", "-", "40", "30"]);
        stable_order(&mut descending, 0, ColumnType::Number, SortDirection::Descending);
        assert_eq!(texts(&descending), vec!["40", "30", "-", "10", "2"]);
    }

    #[test]
    fn relocate_moves_numbers_past_unparseable_rows() {
        let mut values = rows(&["40", "n/a", "30", "2", "10"]);
        order(&mut values, 0, ColumnType::Number, SortDirection::Ascending);
        assert_eq!(texts(&values), vec!["2", "10", "30", "40", "n/a"]);
    }

    #[test]
    fn rows_without_numbers_never_move() {
        for strategy in [SortStrategy::Stable, SortStrategy::Relocate] {
            let mut values = rows(&["n/a", "x", "-"]);
            strategy.apply(&mut values, 0, ColumnType::Number, SortDirection::Ascending);
            assert_eq!(texts(&values), vec!["n/a", "x", "-"], "{strategy:?}");
        }
    }

    #[test]
    fn fewer_than_two_rows_is_a_noop() {
        let mut values = rows(&["only"]);
        order(&mut values, 0, ColumnType::String, SortDirection::Descending);
        assert_eq!(texts(&values), vec!["only"]);
        let mut empty = Vec::new();
        order(&mut empty, 0, ColumnType::String, SortDirection::Descending);
        assert!(empty.is_empty());
    }

    #[test]
    fn click_toggles_direction_on_the_same_column() {
        let mut table = table(ColumnType::Number, &["10", "2", "33"]);

        let first = click_indicator(&mut table, 0, SortStrategy::Stable);
        assert_eq!(first, Some(SortDirection::Ascending));
        assert_eq!(texts(table.rows()), vec!["2", "10", "33"]);

        let second = click_indicator(&mut table, 0, SortStrategy::Stable);
        assert_eq!(second, Some(SortDirection::Descending));
        assert_eq!(texts(table.rows()), vec!["33", "10", "2"]);
        assert_eq!(table.active_sort(), Some((0, SortDirection::Descending)));
    }

    #[test]
    fn click_on_another_column_resets_the_previous_one() {
        let mut table = Table::from_rows(
            "t",
            Some(vec![
                HeaderCell::new("Name", ColumnType::String),
                HeaderCell::new("Age", ColumnType::Number),
            ]),
            [["Bob", "30"], ["Al", "5"]],
        );
        table.make_dynamic();

        click_indicator(&mut table, 0, SortStrategy::Stable);
        click_indicator(&mut table, 0, SortStrategy::Stable);
        click_indicator(&mut table, 1, SortStrategy::Stable);

        let name = table.header_cells()[0].indicator().unwrap_or_default();
        assert!(!name.is_active());
        assert_eq!(name.direction, SortDirection::Ascending);
        assert_eq!(table.active_sort(), Some((1, SortDirection::Ascending)));
        assert_eq!(texts(table.rows()), vec!["Al", "Bob"]);
    }

    #[test]
    fn reset_indicators_clears_active_state() {
        let mut table = table(ColumnType::String, &["b", "a"]);
        click_indicator(&mut table, 0, SortStrategy::Relocate);
        reset_indicators(&mut table);
        assert_eq!(table.active_sort(), None);
    }

    #[test]
    fn click_without_indicator_is_a_noop() {
        let mut table = Table::from_rows("t", None, [["b"], ["a"]]);
        assert_eq!(click_indicator(&mut table, 0, SortStrategy::Stable), None);
        assert_eq!(texts(table.rows()), vec!["b", "a"]);

        let mut active = self::table(ColumnType::String, &["b"]);
        assert_eq!(click_indicator(&mut active, 3, SortStrategy::Stable), None);
    }

    #[test]
    fn strategy_parses_config_spelling() {
        assert_eq!(SortStrategy::parse("stable"), Some(SortStrategy::Stable));
        assert_eq!(SortStrategy::parse("relocate"), Some(SortStrategy::Relocate));
        assert_eq!(SortStrategy::parse("bubble"), None);
    }
}
