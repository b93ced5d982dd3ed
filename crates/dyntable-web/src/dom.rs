// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use dyntable_app::{
    BodyRow, ColumnControls, ColumnType, HeaderCell, Indicator, IndicatorColor, IndicatorPalette,
    RowId, SortDirection, SortStrategy, Table, TableCommand, TableController, TableId,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlInputElement, HtmlTableElement, HtmlTableRowElement,
    HtmlTableSectionElement,
};

use crate::patch::{display_value, in_page_order, indicator_attributes, row_layout};

/// A table wired to its page elements. Rows are indexed by `RowId`.
struct BoundTable {
    controller: TableController,
    palette: IndicatorPalette,
    body: Option<HtmlTableSectionElement>,
    rows: Vec<HtmlTableRowElement>,
    indicators: Vec<Element>,
}

thread_local! {
    static BOUND: RefCell<HashMap<String, Rc<RefCell<BoundTable>>>> = RefCell::new(HashMap::new());
}

/// Adds a filter input and a sort indicator to every header cell of the
/// table whose id is `table_id`. Unknown ids and repeated calls do nothing.
#[wasm_bindgen(js_name = makeTableDynamic)]
pub fn make_table_dynamic(table_id: &str) -> Result<(), JsValue> {
    make_table_dynamic_with(table_id, IndicatorPalette::default(), SortStrategy::default())
}

/// Like `makeTableDynamic` with explicit indicator colors and
/// `"stable"` or `"relocate"` ordering.
#[wasm_bindgen(js_name = makeTableDynamicWith)]
pub fn make_table_dynamic_with_options(
    table_id: &str,
    inactive_color: &str,
    active_color: &str,
    strategy: &str,
) -> Result<(), JsValue> {
    let strategy = SortStrategy::parse(strategy)
        .ok_or_else(|| JsValue::from_str(&format!("unknown sort strategy {strategy:?}")))?;
    let palette = IndicatorPalette {
        inactive: inactive_color.to_owned(),
        active: active_color.to_owned(),
    };
    make_table_dynamic_with(table_id, palette, strategy)
}

fn make_table_dynamic_with(
    table_id: &str,
    palette: IndicatorPalette,
    strategy: SortStrategy,
) -> Result<(), JsValue> {
    crate::console::install(log::LevelFilter::Debug);
    if BOUND.with(|bound| bound.borrow().contains_key(table_id)) {
        log::debug!("table {table_id} already bound");
        return Ok(());
    }
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(element) = document.get_element_by_id(table_id) else {
        log::debug!("no element with id {table_id:?}");
        return Ok(());
    };
    let Ok(table_element) = element.dyn_into::<HtmlTableElement>() else {
        log::debug!("element {table_id:?} is not a table");
        return Ok(());
    };

    let id = TableId::new(table_id);
    let body = first_body(&table_element)?;
    let (rows, row_elements) = read_body(body.as_ref())?;
    let header_row = match header_row(&table_element)? {
        Some(row) => row,
        None if rows.is_empty() => {
            log::debug!("table {id}: no rows to derive a header from");
            return Ok(());
        }
        None => synthesize_header(&document, &table_element, rows[0].cells.len())?,
    };
    let header = read_header(&header_row, &id)?;
    let mut controller =
        TableController::with_strategy(Table::new(id.clone(), Some(header), Some(rows)), strategy);
    controller.dispatch(TableCommand::Activate);

    let bound = Rc::new(RefCell::new(BoundTable {
        controller,
        palette,
        body,
        rows: row_elements,
        indicators: Vec::new(),
    }));
    attach_controls(&document, &header_row, &id, &bound)?;
    bound.borrow().sync()?;
    BOUND.with(|registry| {
        registry
            .borrow_mut()
            .insert(table_id.to_owned(), Rc::clone(&bound))
    });
    Ok(())
}

impl BoundTable {
    fn apply(&mut self, command: TableCommand) -> Result<(), JsValue> {
        let events = self.controller.dispatch(command);
        if events.is_empty() {
            return Ok(());
        }
        self.sync()
    }

    /// Mirrors the model onto the page: indicator styles, row visibility
    /// and row order.
    fn sync(&self) -> Result<(), JsValue> {
        let table = self.controller.table();
        for (column, indicator) in self.indicators.iter().enumerate() {
            let attributes = indicator_attributes(table, column, &self.palette);
            for (name, value) in attributes.unwrap_or_default() {
                indicator.set_attribute(name, &value)?;
            }
        }

        let layout = row_layout(table);
        for patch in &layout {
            if let Some(row) = self.rows.get(patch.id.get()) {
                row.style()
                    .set_property("display", display_value(patch.visible))?;
            }
        }
        if in_page_order(&layout) {
            return Ok(());
        }
        if let Some(body) = &self.body {
            for patch in &layout {
                if let Some(row) = self.rows.get(patch.id.get()) {
                    body.append_child(row)?;
                }
            }
        }
        Ok(())
    }
}

fn first_body(table: &HtmlTableElement) -> Result<Option<HtmlTableSectionElement>, JsValue> {
    table
        .t_bodies()
        .item(0)
        .map(|body| body.dyn_into::<HtmlTableSectionElement>())
        .transpose()
        .map_err(JsValue::from)
}

fn read_body(
    body: Option<&HtmlTableSectionElement>,
) -> Result<(Vec<BodyRow>, Vec<HtmlTableRowElement>), JsValue> {
    let Some(body) = body else {
        return Ok((Vec::new(), Vec::new()));
    };
    let collection = body.rows();
    let mut rows = Vec::new();
    let mut elements = Vec::new();
    for index in 0..collection.length() {
        let Some(row) = collection.item(index) else {
            continue;
        };
        let row = row.dyn_into::<HtmlTableRowElement>().map_err(JsValue::from)?;
        let cells = row.cells();
        let texts = (0..cells.length())
            .filter_map(|cell| cells.item(cell))
            .map(|cell| cell.text_content().unwrap_or_default())
            .collect();
        let mut model = BodyRow::new(RowId::new(rows.len()), texts);
        model.visible = row.style().get_property_value("display")? != "none";
        rows.push(model);
        elements.push(row);
    }
    Ok((rows, elements))
}

fn header_row(table: &HtmlTableElement) -> Result<Option<HtmlTableRowElement>, JsValue> {
    let Some(head) = table.t_head() else {
        return Ok(None);
    };
    head.rows()
        .item(0)
        .map(|row| row.dyn_into::<HtmlTableRowElement>())
        .transpose()
        .map_err(JsValue::from)
}

/// Creates a `<thead>` holding one row of `columns` empty header cells.
fn synthesize_header(
    document: &Document,
    table: &HtmlTableElement,
    columns: usize,
) -> Result<HtmlTableRowElement, JsValue> {
    let head = table
        .create_t_head()
        .dyn_into::<HtmlTableSectionElement>()
        .map_err(JsValue::from)?;
    let row = head
        .insert_row()?
        .dyn_into::<HtmlTableRowElement>()
        .map_err(JsValue::from)?;
    for _ in 0..columns {
        row.append_child(&document.create_element("th")?)?;
    }
    log::debug!("synthesized header with {columns} cells");
    Ok(row)
}

/// Reads labels, column types and any controls already present in the
/// header row.
fn read_header(row: &HtmlTableRowElement, id: &TableId) -> Result<Vec<HeaderCell>, JsValue> {
    let selector = format!(".{}", id.indicator_class());
    let cells = row.cells();
    let mut header = Vec::new();
    for index in 0..cells.length() {
        let Some(cell) = cells.item(index) else {
            continue;
        };
        let mut header_cell = HeaderCell::new(
            cell.text_content().unwrap_or_default(),
            ColumnType::from_attr(cell.get_attribute("data-type").as_deref()),
        );
        if let Some(indicator) = cell.query_selector(&selector)? {
            let filter = cell
                .query_selector("input")?
                .and_then(|input| input.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            header_cell.controls = Some(ColumnControls {
                filter,
                indicator: read_indicator(&indicator),
            });
        }
        header.push(header_cell);
    }
    Ok(header)
}

fn read_indicator(element: &Element) -> Indicator {
    let direction = element
        .get_attribute("data-direction")
        .as_deref()
        .and_then(SortDirection::parse_attr)
        .unwrap_or_default();
    let color = if element.get_attribute("data-active").as_deref() == Some("true") {
        IndicatorColor::Active
    } else {
        IndicatorColor::Inactive
    };
    Indicator { color, direction }
}

/// Gives every header cell an indicator followed by a line break and a
/// text input, reusing controls a previous render already placed.
fn attach_controls(
    document: &Document,
    row: &HtmlTableRowElement,
    id: &TableId,
    bound: &Rc<RefCell<BoundTable>>,
) -> Result<(), JsValue> {
    let class = id.indicator_class();
    let selector = format!(".{class}");
    let cells = row.cells();
    for column in 0..cells.length() {
        let Some(cell) = cells.item(column) else {
            continue;
        };
        let column = column as usize;
        let (indicator, input) = match cell.query_selector(&selector)? {
            Some(indicator) => {
                let input = cell
                    .query_selector("input")?
                    .ok_or_else(|| JsValue::from_str("indicator without filter input"))?
                    .dyn_into::<HtmlInputElement>()
                    .map_err(JsValue::from)?;
                (indicator, input)
            }
            None => {
                let indicator = document.create_element("div")?;
                indicator.set_class_name(&class);
                cell.append_child(&indicator)?;
                cell.append_child(&document.create_element("br")?)?;
                let input = document
                    .create_element("input")?
                    .dyn_into::<HtmlInputElement>()
                    .map_err(JsValue::from)?;
                input.set_type("text");
                cell.append_child(&input)?;
                (indicator, input)
            }
        };

        let on_click = {
            let bound = Rc::clone(bound);
            Closure::wrap(Box::new(move |_event: Event| {
                if let Err(error) = bound
                    .borrow_mut()
                    .apply(TableCommand::ClickIndicator(column))
                {
                    web_sys::console::error_1(&error);
                }
            }) as Box<dyn FnMut(_)>)
        };
        indicator.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();

        let on_keyup = {
            let bound = Rc::clone(bound);
            let input = input.clone();
            Closure::wrap(Box::new(move |_event: Event| {
                let command = TableCommand::FilterKeyUp {
                    column,
                    value: input.value(),
                };
                if let Err(error) = bound.borrow_mut().apply(command) {
                    web_sys::console::error_1(&error);
                }
            }) as Box<dyn FnMut(_)>)
        };
        input.add_event_listener_with_callback("keyup", on_keyup.as_ref().unchecked_ref())?;
        on_keyup.forget();

        bound.borrow_mut().indicators.push(indicator);
    }
    Ok(())
}
