// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use dyntable_app::{BodyRow, HeaderCell, IndicatorPalette, Table};
use std::fmt::Write as _;

use crate::markup::{BodyMarkup, CellMarkup, HeadMarkup, Part, RowMarkup, TableMarkup};

impl TableMarkup {
    /// Writes `table` back out as markup: header controls reflect the
    /// model's inputs and indicators, body rows follow the model's order
    /// and visibility.
    pub fn render(&self, table: &Table, palette: &IndicatorPalette) -> String {
        let mut out = String::new();
        out.push_str("<table");
        write_attributes(&mut out, &self.attributes);
        out.push('>');

        let has_head = self.parts.iter().any(|part| matches!(part, Part::Head(_)));
        for (index, part) in self.parts.iter().enumerate() {
            if !has_head && index == self.head_insert_at {
                render_synthesized_head(&mut out, table, palette);
            }
            match part {
                Part::Raw(html) => out.push_str(html),
                Part::Head(head) => render_head(&mut out, head, table, palette),
                Part::Body(body) => render_body(&mut out, body, table),
            }
        }
        if !has_head && self.head_insert_at >= self.parts.len() {
            render_synthesized_head(&mut out, table, palette);
        }

        out.push_str("</table>");
        out
    }
}

fn render_synthesized_head(out: &mut String, table: &Table, palette: &IndicatorPalette) {
    if table.header.is_none() {
        return;
    }
    out.push_str("<thead>");
    render_head_row(out, None, table, palette);
    out.push_str("</thead>");
}

fn render_head(out: &mut String, head: &HeadMarkup, table: &Table, palette: &IndicatorPalette) {
    out.push_str("<thead");
    write_attributes(out, &head.attributes);
    out.push('>');
    if head.row.is_some() || table.header.is_some() {
        render_head_row(out, head.row.as_ref(), table, palette);
    }
    for html in &head.rest {
        out.push_str(html);
    }
    out.push_str("</thead>");
}

fn render_head_row(
    out: &mut String,
    row: Option<&RowMarkup>,
    table: &Table,
    palette: &IndicatorPalette,
) {
    out.push_str("<tr");
    if let Some(row) = row {
        write_attributes(out, &row.attributes);
    }
    out.push('>');
    let empty = CellMarkup::empty_header();
    for (column, cell) in table.header_cells().iter().enumerate() {
        let markup = row
            .and_then(|row| row.cells.get(column))
            .unwrap_or(&empty);
        render_header_cell(out, markup, cell, column, table, palette);
    }
    out.push_str("</tr>");
}

fn render_header_cell(
    out: &mut String,
    markup: &CellMarkup,
    cell: &HeaderCell,
    column: usize,
    table: &Table,
    palette: &IndicatorPalette,
) {
    let _ = write!(out, "<{}", markup.tag);
    write_attributes(out, &markup.attributes);
    out.push('>');
    out.push_str(&markup.inner_html);
    if let Some(controls) = &cell.controls {
        let indicator = controls.indicator;
        let _ = write!(
            out,
            "<div class=\"{}\" data-index=\"{column}\" data-direction=\"{}\" data-active=\"{}\" style=\"{}\"></div>",
            html_escape::encode_double_quoted_attribute(&table.id.indicator_class()),
            indicator.direction.as_attr(),
            indicator.is_active(),
            html_escape::encode_double_quoted_attribute(&indicator.css(palette)),
        );
        out.push_str("<br>");
        let _ = write!(
            out,
            "<input type=\"text\" value=\"{}\">",
            html_escape::encode_double_quoted_attribute(&controls.filter)
        );
    }
    let _ = write!(out, "</{}>", markup.tag);
}

fn render_body(out: &mut String, body: &BodyMarkup, table: &Table) {
    out.push_str("<tbody");
    write_attributes(out, &body.attributes);
    out.push_str(">\n");
    for row in table.rows() {
        render_body_row(out, body.rows.get(row.id.get()), row);
        out.push('\n');
    }
    out.push_str("</tbody>");
}

fn render_body_row(out: &mut String, markup: Option<&RowMarkup>, row: &BodyRow) {
    let attributes = markup
        .map(|markup| markup.attributes.as_slice())
        .unwrap_or_default();
    let mut style = None;
    out.push_str("<tr");
    for (name, value) in attributes {
        if name == "style" {
            style = Some(value.as_str());
            continue;
        }
        write_attribute(out, name, value);
    }
    let style = row_style(style.unwrap_or_default(), row.visible);
    if !style.is_empty() {
        write_attribute(out, "style", &style);
    }
    out.push('>');

    match markup {
        Some(markup) => {
            for cell in &markup.cells {
                let _ = write!(out, "<{}", cell.tag);
                write_attributes(out, &cell.attributes);
                let _ = write!(out, ">{}</{}>", cell.inner_html, cell.tag);
            }
        }
        None => {
            for text in &row.cells {
                let _ = write!(out, "<td>{}</td>", html_escape::encode_text(text));
            }
        }
    }
    out.push_str("</tr>");
}

/// Rebuilds a row's inline style: every `display` declaration is dropped
/// and `display: none` appended when the row is hidden.
pub(crate) fn row_style(style: &str, visible: bool) -> String {
    let mut declarations: Vec<&str> = style
        .split(';')
        .map(str::trim)
        .filter(|declaration| !declaration.is_empty())
        .filter(|declaration| {
            let property = declaration.split(':').next().unwrap_or_default();
            !property.trim().eq_ignore_ascii_case("display")
        })
        .collect();
    if !visible {
        declarations.push("display: none");
    }
    if declarations.is_empty() {
        return String::new();
    }
    let mut style = declarations.join("; ");
    style.push(';');
    style
}

fn write_attributes(out: &mut String, attributes: &[(String, String)]) {
    for (name, value) in attributes {
        write_attribute(out, name, value);
    }
}

fn write_attribute(out: &mut String, name: &str, value: &str) {
    let _ = write!(
        out,
        " {name}=\"{}\"",
        html_escape::encode_double_quoted_attribute(value)
    );
}

#[cfg(test)]
mod tests {
    use super::row_style;

    #[test]
    fn hidden_rows_gain_display_none() {
        assert_eq!(row_style("", false), "display: none;");
        assert_eq!(row_style("color: red", false), "color: red; display: none;");
    }

    #[test]
    fn visible_rows_drop_display_declarations() {
        assert_eq!(row_style("display: none;", true), "");
        assert_eq!(row_style("color: red; display:none", true), "color: red;");
        assert_eq!(row_style("", true), "");
    }
}
