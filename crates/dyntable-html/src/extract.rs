// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use dyntable_app::{
    BodyRow, ColumnControls, ColumnType, HeaderCell, Indicator, IndicatorColor, RowId,
    SortDirection, Table, TableId,
};
use scraper::{ElementRef, Node};

use crate::markup::{
    Attributes, BodyMarkup, CellMarkup, ExtractedTable, HeadMarkup, Part, RowMarkup, TableMarkup,
};

pub(crate) fn extract_table(element: ElementRef<'_>, id: &TableId) -> ExtractedTable {
    let indicator_class = id.indicator_class();
    let mut parts = Vec::new();
    let mut header = None;
    let mut body = None;
    let mut head_insert_at = None;

    for child in element.children() {
        let Some(section) = ElementRef::wrap(child) else {
            parts.push(Part::Raw(node_html(child.value(), None)));
            continue;
        };
        let name = section.value().name();
        if head_insert_at.is_none() && !matches!(name, "caption" | "colgroup") {
            head_insert_at = Some(parts.len());
        }
        match name {
            "thead" if header.is_none() => {
                let (cells, markup) = extract_head(section, &indicator_class);
                header = Some(cells);
                parts.push(Part::Head(markup));
            }
            "tbody" if body.is_none() => {
                let (rows, markup) = extract_body(section);
                body = Some(rows);
                parts.push(Part::Body(markup));
            }
            _ => parts.push(Part::Raw(section.html())),
        }
    }

    let header = header.flatten();
    let table = Table::new(id.clone(), header, body);
    let markup = TableMarkup {
        attributes: attributes_of(element),
        head_insert_at: head_insert_at.unwrap_or(parts.len()),
        parts,
        original: element.html(),
    };
    ExtractedTable { table, markup }
}

/// Reads the first header row. A `<thead>` without rows yields no header
/// cells so that one is synthesized from the body.
fn extract_head(
    section: ElementRef<'_>,
    indicator_class: &str,
) -> (Option<Vec<HeaderCell>>, HeadMarkup) {
    let mut row = None;
    let mut cells = None;
    let mut rest = Vec::new();

    for child in section.children() {
        if row.is_none() {
            if let Some(tr) = ElementRef::wrap(child).filter(|el| el.value().name() == "tr") {
                let (header_cells, markup) = extract_head_row(tr, indicator_class);
                cells = Some(header_cells);
                row = Some(markup);
            }
            continue;
        }
        rest.push(node_html(child.value(), ElementRef::wrap(child)));
    }

    let markup = HeadMarkup {
        attributes: attributes_of(section),
        row,
        rest,
    };
    (cells, markup)
}

fn extract_head_row(tr: ElementRef<'_>, indicator_class: &str) -> (Vec<HeaderCell>, RowMarkup) {
    let mut cells = Vec::new();
    let mut markup = Vec::new();
    for cell in cell_elements(tr) {
        let (header_cell, cell_markup) = extract_header_cell(cell, indicator_class);
        cells.push(header_cell);
        markup.push(cell_markup);
    }
    let row = RowMarkup {
        attributes: attributes_of(tr),
        cells: markup,
    };
    (cells, row)
}

/// Splits a header cell into its own content and any controls a previous
/// activation injected.
fn extract_header_cell(cell: ElementRef<'_>, indicator_class: &str) -> (HeaderCell, CellMarkup) {
    let mut indicator = None;
    let mut filter = None;
    let mut inner_html = String::new();

    for child in cell.children() {
        if let Some(element) = ElementRef::wrap(child) {
            let value = element.value();
            if value.name() == "div" && value.classes().any(|class| class == indicator_class) {
                indicator = Some(parse_indicator(element));
                continue;
            }
            if indicator.is_some() && value.name() == "br" {
                continue;
            }
            if indicator.is_some()
                && value.name() == "input"
                && value.attr("type").is_none_or(|kind| kind == "text")
            {
                filter = Some(value.attr("value").unwrap_or_default().to_owned());
                continue;
            }
        }
        inner_html.push_str(&node_html(child.value(), ElementRef::wrap(child)));
    }

    let controls = indicator.map(|indicator| ColumnControls {
        filter: filter.unwrap_or_default(),
        indicator,
    });
    let header_cell = HeaderCell {
        label: cell.text().collect(),
        column_type: ColumnType::from_attr(cell.value().attr("data-type")),
        controls,
    };
    let markup = CellMarkup {
        tag: cell.value().name().to_owned(),
        attributes: attributes_of(cell),
        inner_html,
    };
    (header_cell, markup)
}

fn parse_indicator(element: ElementRef<'_>) -> Indicator {
    let value = element.value();
    let direction = value
        .attr("data-direction")
        .and_then(SortDirection::parse_attr)
        .unwrap_or_default();
    let color = if value.attr("data-active") == Some("true") {
        IndicatorColor::Active
    } else {
        IndicatorColor::Inactive
    };
    Indicator { color, direction }
}

fn extract_body(section: ElementRef<'_>) -> (Vec<BodyRow>, BodyMarkup) {
    let mut rows = Vec::new();
    let mut markup = Vec::new();
    let tr_rows = section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr");

    for (index, tr) in tr_rows.enumerate() {
        let mut texts = Vec::new();
        let mut cells = Vec::new();
        for cell in cell_elements(tr) {
            texts.push(cell.text().collect::<String>());
            cells.push(CellMarkup {
                tag: cell.value().name().to_owned(),
                attributes: attributes_of(cell),
                inner_html: cell.inner_html(),
            });
        }
        let mut row = BodyRow::new(RowId::new(index), texts);
        row.visible = !tr
            .value()
            .attr("style")
            .is_some_and(declares_display_none);
        rows.push(row);
        markup.push(RowMarkup {
            attributes: attributes_of(tr),
            cells,
        });
    }

    let body = BodyMarkup {
        attributes: attributes_of(section),
        rows: markup,
    };
    (rows, body)
}

fn cell_elements<'a>(tr: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
}

/// Attributes sorted by name so output does not depend on parser map order.
pub(crate) fn attributes_of(element: ElementRef<'_>) -> Attributes {
    let mut attributes: Attributes = element
        .value()
        .attrs()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect();
    attributes.sort();
    attributes
}

pub(crate) fn declares_display_none(style: &str) -> bool {
    style.split(';').any(|declaration| {
        let mut pair = declaration.splitn(2, ':');
        let property = pair.next().unwrap_or_default().trim();
        let value = pair.next().unwrap_or_default().trim();
        property.eq_ignore_ascii_case("display") && value.eq_ignore_ascii_case("none")
    })
}

/// Serializes a child node; `element` is the same node wrapped when it is
/// an element.
pub(crate) fn node_html(node: &Node, element: Option<ElementRef<'_>>) -> String {
    match node {
        Node::Text(text) => html_escape::encode_text(&**text).into_owned(),
        Node::Comment(comment) => format!("<!--{}-->", &**comment),
        Node::Element(_) => element.map(|element| element.html()).unwrap_or_default(),
        _ => String::new(),
    }
}
