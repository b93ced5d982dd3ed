// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::filter::{FilterOutcome, clear_filters, set_filter};
use crate::model::{SortDirection, Table};
use crate::sort::{SortStrategy, click_indicator};

/// Owns one table and applies UI events to it synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableController {
    table: Table,
    strategy: SortStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    Activate,
    /// A keystroke left `value` in the filter input of `column`.
    FilterKeyUp { column: usize, value: String },
    ClearFilters,
    ClickIndicator(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    HeaderSynthesized,
    Activated { columns: usize },
    Filtered(FilterOutcome),
    Sorted { column: usize, direction: SortDirection },
}

impl TableController {
    pub fn new(table: Table) -> Self {
        Self::with_strategy(table, SortStrategy::default())
    }

    pub fn with_strategy(table: Table, strategy: SortStrategy) -> Self {
        Self { table, strategy }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub const fn strategy(&self) -> SortStrategy {
        self.strategy
    }

    /// Applies one command. Commands that find nothing to act on produce no
    /// events.
    pub fn dispatch(&mut self, command: TableCommand) -> Vec<TableEvent> {
        match command {
            TableCommand::Activate => {
                let Some(activation) = self.table.make_dynamic() else {
                    return Vec::new();
                };
                let mut events = Vec::with_capacity(2);
                if activation.synthesized_header {
                    events.push(TableEvent::HeaderSynthesized);
                }
                events.push(TableEvent::Activated {
                    columns: activation.columns,
                });
                events
            }
            TableCommand::FilterKeyUp { column, value } => {
                set_filter(&mut self.table, column, &value)
                    .map(TableEvent::Filtered)
                    .into_iter()
                    .collect()
            }
            TableCommand::ClearFilters => {
                if !self.table.is_dynamic() {
                    return Vec::new();
                }
                clear_filters(&mut self.table)
                    .map(TableEvent::Filtered)
                    .into_iter()
                    .collect()
            }
            TableCommand::ClickIndicator(column) => {
                click_indicator(&mut self.table, column, self.strategy)
                    .map(|direction| TableEvent::Sorted { column, direction })
                    .into_iter()
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TableCommand, TableController, TableEvent};
    use crate::filter::FilterOutcome;
    use crate::model::{ColumnType, HeaderCell, SortDirection, Table};
    use crate::sort::SortStrategy;

    fn people() -> Table {
        Table::from_rows(
            "people",
            Some(vec![
                HeaderCell::new("Name", ColumnType::String),
                HeaderCell::new("Age", ColumnType::Number),
            ]),
            [["Bob", "30"], ["Al", "5"], ["Cy", "13"]],
        )
    }

    #[test]
    fn activate_reports_columns_once() {
        let mut controller = TableController::new(people());
        assert_eq!(
            controller.dispatch(TableCommand::Activate),
            vec![TableEvent::Activated { columns: 2 }],
        );
        assert!(controller.dispatch(TableCommand::Activate).is_empty());
    }

    #[test]
    fn activate_headerless_table_synthesizes_header() {
        let mut controller = TableController::new(Table::from_rows("t", None, [["x", "y"]]));
        assert_eq!(
            controller.dispatch(TableCommand::Activate),
            vec![
                TableEvent::HeaderSynthesized,
                TableEvent::Activated { columns: 2 },
            ],
        );
    }

    #[test]
    fn keyup_filters_rows() {
        let mut controller = TableController::new(people());
        controller.dispatch(TableCommand::Activate);

        let events = controller.dispatch(TableCommand::FilterKeyUp {
            column: 1,
            value: "3".to_owned(),
        });
        assert_eq!(
            events,
            vec![TableEvent::Filtered(FilterOutcome {
                visible: 2,
                total: 3
            })],
        );

        let events = controller.dispatch(TableCommand::ClearFilters);
        assert_eq!(
            events,
            vec![TableEvent::Filtered(FilterOutcome {
                visible: 3,
                total: 3
            })],
        );
    }

    #[test]
    fn commands_before_activation_are_ignored() {
        let mut controller = TableController::new(people());
        assert!(
            controller
                .dispatch(TableCommand::FilterKeyUp {
                    column: 0,
                    value: "B".to_owned(),
                })
                .is_empty()
        );
        assert!(controller.dispatch(TableCommand::ClearFilters).is_empty());
        assert!(controller.dispatch(TableCommand::ClickIndicator(0)).is_empty());
    }

    #[test]
    fn clicks_sort_and_toggle() {
        let mut controller = TableController::with_strategy(people(), SortStrategy::Relocate);
        controller.dispatch(TableCommand::Activate);

        assert_eq!(
            controller.dispatch(TableCommand::ClickIndicator(1)),
            vec![TableEvent::Sorted {
                column: 1,
                direction: SortDirection::Ascending
            }],
        );
        let ages: Vec<&str> = controller
            .table()
            .rows()
            .iter()
            .filter_map(|row| row.cell(1))
            .collect();
        assert_eq!(ages, vec!["5", "13", "30"]);

        assert_eq!(
            controller.dispatch(TableCommand::ClickIndicator(1)),
            vec![TableEvent::Sorted {
                column: 1,
                direction: SortDirection::Descending
            }],
        );
    }

    #[test]
    fn hidden_rows_stay_hidden_after_sorting() {
        let mut controller = TableController::new(people());
        controller.dispatch(TableCommand::Activate);
        controller.dispatch(TableCommand::FilterKeyUp {
            column: 0,
            value: "l".to_owned(),
        });
        controller.dispatch(TableCommand::ClickIndicator(0));

        let table = controller.into_table();
        let names: Vec<(&str, bool)> = table
            .rows()
            .iter()
            .filter_map(|row| row.cell(0).map(|name| (name, row.visible)))
            .collect();
        assert_eq!(names, vec![("Al", true), ("Bob", false), ("Cy", false)]);
    }
}
