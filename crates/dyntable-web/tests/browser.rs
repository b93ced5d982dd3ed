// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#![cfg(target_arch = "wasm32")]

use dyntable_web::make_table_dynamic;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, HtmlTableRowElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|window| window.document())
        .expect("document")
}

fn mount(id: &str, html: &str) -> HtmlElement {
    let document = document();
    let host = document
        .create_element("div")
        .expect("create host")
        .dyn_into::<HtmlElement>()
        .expect("host element");
    host.set_inner_html(html);
    document.body().expect("body").append_child(&host).expect("mount");
    assert!(document.get_element_by_id(id).is_some());
    host
}

fn body_rows(host: &HtmlElement) -> Vec<HtmlTableRowElement> {
    let rows = host.query_selector_all("tbody tr").expect("rows");
    (0..rows.length())
        .filter_map(|index| rows.item(index))
        .filter_map(|row| row.dyn_into::<HtmlTableRowElement>().ok())
        .collect()
}

fn first_cells(host: &HtmlElement) -> Vec<String> {
    body_rows(host)
        .iter()
        .filter_map(|row| row.cells().item(0))
        .filter_map(|cell| cell.text_content())
        .collect()
}

#[wasm_bindgen_test]
fn adds_controls_to_every_header_cell() {
    let host = mount(
        "web-people",
        r#"<table id="web-people"><thead><tr><th>Name</th><th data-type="number">Age</th></tr></thead>
<tbody><tr><td>Bob</td><td>30</td></tr><tr><td>Al</td><td>5</td></tr></tbody></table>"#,
    );
    make_table_dynamic("web-people").expect("activate");
    make_table_dynamic("web-people").expect("activate twice");

    let inputs = host.query_selector_all("thead input").expect("inputs");
    let arrows = host.query_selector_all(".web-people-arrow").expect("arrows");
    assert_eq!(inputs.length(), 2);
    assert_eq!(arrows.length(), 2);
}

#[wasm_bindgen_test]
fn keyup_hides_rows_without_substring() {
    let host = mount(
        "web-filter",
        r#"<table id="web-filter"><thead><tr><th>Name</th><th>Age</th></tr></thead>
<tbody><tr><td>Bob</td><td>30</td></tr><tr><td>Al</td><td>5</td></tr></tbody></table>"#,
    );
    make_table_dynamic("web-filter").expect("activate");

    let input = host
        .query_selector_all("thead input")
        .expect("inputs")
        .item(1)
        .and_then(|node| node.dyn_into::<HtmlInputElement>().ok())
        .expect("age input");
    input.set_value("3");
    input
        .dispatch_event(&Event::new("keyup").expect("event"))
        .expect("dispatch");

    let display: Vec<String> = body_rows(&host)
        .iter()
        .map(|row| row.style().get_property_value("display").unwrap_or_default())
        .collect();
    assert_eq!(display, vec![String::new(), "none".to_owned()]);
}

#[wasm_bindgen_test]
fn indicator_click_sorts_and_toggles() {
    let host = mount(
        "web-sort",
        r#"<table id="web-sort"><thead><tr><th data-type="number">N</th></tr></thead>
<tbody><tr><td>10</td></tr><tr><td>2</td></tr><tr><td>33</td></tr></tbody></table>"#,
    );
    make_table_dynamic("web-sort").expect("activate");
    let arrow = host
        .query_selector(".web-sort-arrow")
        .expect("query")
        .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        .expect("arrow");

    arrow.click();
    assert_eq!(first_cells(&host), vec!["2", "10", "33"]);
    assert_eq!(arrow.get_attribute("data-active").as_deref(), Some("true"));

    arrow.click();
    assert_eq!(first_cells(&host), vec!["33", "10", "2"]);
    assert_eq!(arrow.get_attribute("data-direction").as_deref(), Some("down"));
}

#[wasm_bindgen_test]
fn headerless_table_gets_header_row() {
    let host = mount(
        "web-bare",
        r#"<table id="web-bare"><tr><td>x</td><td>y</td></tr></table>"#,
    );
    make_table_dynamic("web-bare").expect("activate");
    assert_eq!(host.query_selector_all("thead th").expect("th").length(), 2);
    assert_eq!(body_rows(&host).len(), 1);
}

#[wasm_bindgen_test]
fn unknown_id_is_ignored() {
    make_table_dynamic("web-missing").expect("missing table is not an error");
}

#[wasm_bindgen_test]
fn activation_routes_debug_logs_to_the_console() {
    make_table_dynamic("web-unlogged").expect("missing table is not an error");
    assert_eq!(log::max_level(), log::LevelFilter::Debug);
    let metadata = log::Metadata::builder().level(log::Level::Debug).build();
    assert!(log::logger().enabled(&metadata));
}
