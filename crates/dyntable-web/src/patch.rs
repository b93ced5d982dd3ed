// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use dyntable_app::{IndicatorPalette, RowId, Table};

/// Where one body row must end up after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPatch {
    pub id: RowId,
    pub visible: bool,
}

/// Value for a row's `display` property.
pub const fn display_value(visible: bool) -> &'static str {
    if visible { "" } else { "none" }
}

/// Every body row in model order. Appending the row elements in this
/// order to their section reproduces the model's order in the page.
pub fn row_layout(table: &Table) -> Vec<RowPatch> {
    table
        .rows()
        .iter()
        .map(|row| RowPatch {
            id: row.id,
            visible: row.visible,
        })
        .collect()
}

/// True when the page rows, identified by original position, are already
/// in the model's order.
pub fn in_page_order(layout: &[RowPatch]) -> bool {
    layout
        .iter()
        .enumerate()
        .all(|(index, patch)| patch.id.get() == index)
}

/// Attributes the indicator element of `column` carries.
pub fn indicator_attributes(
    table: &Table,
    column: usize,
    palette: &IndicatorPalette,
) -> Option<Vec<(&'static str, String)>> {
    let indicator = table.header_cells().get(column)?.indicator()?;
    Some(vec![
        ("data-index", column.to_string()),
        ("data-direction", indicator.direction.as_attr().to_owned()),
        ("data-active", indicator.is_active().to_string()),
        ("style", indicator.css(palette)),
    ])
}

#[cfg(test)]
mod tests {
    use super::{display_value, in_page_order, indicator_attributes, row_layout};
    use dyntable_app::{IndicatorPalette, SortStrategy, click_indicator, set_filter};
    use dyntable_testkit::people_table;

    #[test]
    fn layout_follows_model_order_and_visibility() {
        let mut table = people_table();
        table.make_dynamic();
        assert!(in_page_order(&row_layout(&table)));

        click_indicator(&mut table, 1, SortStrategy::Stable);
        set_filter(&mut table, 0, "B");
        let layout = row_layout(&table);
        assert!(!in_page_order(&layout));
        let ids: Vec<(usize, bool)> = layout
            .iter()
            .map(|patch| (patch.id.get(), patch.visible))
            .collect();
        assert_eq!(ids, vec![(1, false), (0, true)]);
        assert_eq!(display_value(layout[0].visible), "none");
        assert_eq!(display_value(layout[1].visible), "");
    }

    #[test]
    fn indicator_attributes_track_state() {
        let palette = IndicatorPalette::default();
        let mut table = people_table();
        assert!(indicator_attributes(&table, 0, &palette).is_none());

        table.make_dynamic();
        click_indicator(&mut table, 0, SortStrategy::Stable);
        let active = indicator_attributes(&table, 0, &palette).unwrap_or_default();
        assert!(active.contains(&("data-active", "true".to_owned())));
        assert!(active.contains(&("data-direction", "up".to_owned())));

        let idle = indicator_attributes(&table, 1, &palette).unwrap_or_default();
        assert!(idle.contains(&("data-active", "false".to_owned())));
        assert!(indicator_attributes(&table, 2, &palette).is_none());
    }
}
