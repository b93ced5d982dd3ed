// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use dyntable_app::{ColumnType, HeaderCell, Table};
use std::fmt::Write as _;
use std::path::PathBuf;

pub const DEMO_TABLE_ID: &str = "demo";
pub const DEMO_ROWS: usize = 40;

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];
const CITIES: [&str; 14] = [
    "Austin",
    "Seattle",
    "Denver",
    "Madison",
    "Raleigh",
    "Pittsburgh",
    "Portland",
    "Boise",
    "Phoenix",
    "Nashville",
    "Columbus",
    "Minneapolis",
    "Omaha",
    "Tucson",
];
const TEAMS: [&str; 6] = ["core", "infra", "web", "data", "mobile", "support"];

/// Two-column table from the `[Name, Age]` scenario: Bob 30, Al 5.
pub fn people_table() -> Table {
    Table::from_rows(
        "people",
        Some(vec![
            HeaderCell::new("Name", ColumnType::String),
            HeaderCell::new("Age", ColumnType::Number),
        ]),
        [["Bob", "30"], ["Al", "5"]],
    )
}

pub fn people_document() -> &'static str {
    r#"<!DOCTYPE html>
<html>
<head><title>people</title></head>
<body>
<table id="people" class="listing">
<thead><tr><th>Name</th><th data-type="number">Age</th></tr></thead>
<tbody>
<tr><td>Bob</td><td>30</td></tr>
<tr class="odd"><td><b>Al</b></td><td>5</td></tr>
</tbody>
</table>
</body>
</html>
"#
}

/// Document whose table has no `<thead>`; the first row is data.
pub fn headerless_document() -> &'static str {
    r#"<!DOCTYPE html>
<html>
<head><title>scores</title></head>
<body>
<p>before</p>
<table id="scores">
<tr><td>10</td><td>ten</td><td>x</td></tr>
<tr><td>2</td><td>two</td><td>y</td></tr>
<tr><td>33</td><td>thirty-three</td><td>z</td></tr>
</table>
<p>after</p>
</body>
</html>
"#
}

/// Document with a header but no body rows at all.
pub fn bodyless_document() -> &'static str {
    r#"<!DOCTYPE html>
<html><body>
<table id="empty"><thead><tr><th>Only</th></tr></thead></table>
</body></html>
"#
}

pub fn temp_html_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("table.html");
    Ok((dir, path))
}

/// Deterministic generator for demo tables.
#[derive(Debug, Clone)]
pub struct TableFaker {
    rng: DeterministicRng,
}

impl TableFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn header() -> Vec<HeaderCell> {
        vec![
            HeaderCell::new("Name", ColumnType::String),
            HeaderCell::new("City", ColumnType::String),
            HeaderCell::new("Team", ColumnType::String),
            HeaderCell::new("Age", ColumnType::Number),
            HeaderCell::new("Score", ColumnType::Number),
        ]
    }

    /// One row of `[name, city, team, age, score]`. Roughly one age in
    /// twenty is `n/a` so numeric sorting meets unparsable text.
    pub fn row(&mut self) -> [String; 5] {
        let name = format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES));
        let city = self.pick(&CITIES).to_owned();
        let team = self.pick(&TEAMS).to_owned();
        let age = if self.rng.int_n(20) == 0 {
            "n/a".to_owned()
        } else {
            (18 + self.rng.int_n(50)).to_string()
        };
        let score = format!("{}.{}", self.rng.int_n(100), self.rng.int_n(10));
        [name, city, team, age, score]
    }

    pub fn table(&mut self, id: &str, rows: usize) -> Table {
        let rows: Vec<[String; 5]> = (0..rows).map(|_| self.row()).collect();
        Table::from_rows(id, Some(Self::header()), rows)
    }

    /// Full HTML document wrapping a generated table with `data-type`
    /// attributes on numeric columns.
    pub fn document(&mut self, id: &str, rows: usize) -> String {
        let mut html =
            String::from("<!DOCTYPE html>\n<html>\n<head><title>demo</title></head>\n<body>\n");
        let _ = writeln!(html, "<table id=\"{id}\">");
        html.push_str("<thead><tr>");
        for cell in Self::header() {
            match cell.column_type {
                ColumnType::Number => {
                    let _ = write!(html, "<th data-type=\"number\">{}</th>", cell.label);
                }
                ColumnType::String => {
                    let _ = write!(html, "<th>{}</th>", cell.label);
                }
            }
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for _ in 0..rows {
            html.push_str("<tr>");
            for value in self.row() {
                let _ = write!(html, "<td>{value}</td>");
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
        html
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}
