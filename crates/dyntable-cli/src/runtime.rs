// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use dyntable_app::{IndicatorPalette, Table};
use dyntable_html::{Document, TableMarkup};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const SNAPSHOT_SUFFIX: &str = "dyntable.html";

/// Saves terminal-viewer snapshots of one table back into its document.
pub struct FileRuntime {
    document: Document,
    markup: TableMarkup,
    palette: IndicatorPalette,
    snapshot_path: PathBuf,
}

impl FileRuntime {
    pub fn new(
        document: Document,
        markup: TableMarkup,
        palette: IndicatorPalette,
        snapshot_path: PathBuf,
    ) -> Self {
        Self {
            document,
            markup,
            palette,
            snapshot_path,
        }
    }
}

impl dyntable_tui::TableRuntime for FileRuntime {
    fn save_snapshot(&mut self, table: &Table) -> Result<PathBuf> {
        let html = render_document(&self.document, &self.markup, table, &self.palette);
        write_output(&self.snapshot_path, &html)?;
        log::info!("saved snapshot {}", self.snapshot_path.display());
        Ok(self.snapshot_path.clone())
    }
}

/// The whole document with `table` rendered in place of its original.
pub fn render_document(
    document: &Document,
    markup: &TableMarkup,
    table: &Table,
    palette: &IndicatorPalette,
) -> String {
    document.replace_table(markup, &markup.render(table, palette))
}

/// `<stem>.dyntable.html` beside the input; demo snapshots land in the
/// working directory.
pub fn snapshot_path_for(input: Option<&Path>) -> PathBuf {
    match input {
        Some(input) => {
            let stem = input
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "table".to_owned());
            input.with_file_name(format!("{stem}.{SNAPSHOT_SUFFIX}"))
        }
        None => PathBuf::from(format!("demo.{SNAPSHOT_SUFFIX}")),
    }
}

pub fn is_json_output(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

#[derive(Debug, Serialize)]
struct SortSnapshot<'a> {
    column: usize,
    label: &'a str,
    direction: &'static str,
}

#[derive(Debug, Serialize)]
struct TableSnapshot<'a> {
    table: &'a str,
    columns: Vec<&'a str>,
    sort: Option<SortSnapshot<'a>>,
    total_rows: usize,
    rows: Vec<&'a [String]>,
}

/// Visible rows in display order plus the active sort, as pretty JSON.
pub fn snapshot_json(table: &Table) -> Result<String> {
    let columns = table
        .header_cells()
        .iter()
        .map(|cell| cell.label.trim())
        .collect::<Vec<_>>();
    let sort = table
        .active_sort()
        .map(|(column, direction)| SortSnapshot {
            column,
            label: columns.get(column).copied().unwrap_or_default(),
            direction: direction.label(),
        });
    let snapshot = TableSnapshot {
        table: table.id.as_str(),
        columns,
        sort,
        total_rows: table.rows().len(),
        rows: table.visible_rows().map(|row| row.cells.as_slice()).collect(),
    };
    let mut json = serde_json::to_string_pretty(&snapshot).context("serialize table snapshot")?;
    json.push('\n');
    Ok(json)
}

/// Writes `contents` to `path`, or to stdout when `path` is `-`.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if path == Path::new("-") {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(contents.as_bytes())
            .context("write to stdout")?;
        return stdout.flush().context("flush stdout");
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write output {}", path.display()))
}
