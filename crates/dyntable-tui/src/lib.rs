// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use dyntable_app::{
    BodyRow, IndicatorColor, IndicatorPalette, SortDirection, Table, TableCommand, TableController,
    TableEvent,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const ARROW_UP: &str = "▲";
const ARROW_DOWN: &str = "▼";
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

/// Side effects the terminal UI asks its host to perform.
pub trait TableRuntime {
    /// Writes the table as it currently stands and returns where it went.
    fn save_snapshot(&mut self, table: &Table) -> Result<PathBuf>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewOptions {
    pub palette: IndicatorPalette,
    /// Render filtered-out rows dimmed instead of leaving them out.
    pub show_hidden_rows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCommand {
    Quit,
    MoveColumn(isize),
    MoveRow(isize),
    Input(char),
    Backspace,
    ClearFilter,
    ClearAllFilters,
    ClickIndicator,
    SaveSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableStatus {
    Filtered {
        label: String,
        visible: usize,
        total: usize,
    },
    FiltersCleared,
    NoRows,
    SortAsc(String),
    SortDesc(String),
    SortUnavailable,
    Saved(PathBuf),
    SaveFailed(String),
}

impl TableStatus {
    fn message(self) -> String {
        match self {
            Self::Filtered {
                label,
                visible,
                total,
            } => format!("filter {label}: {visible}/{total} rows"),
            Self::FiltersCleared => "filters cleared".to_owned(),
            Self::NoRows => "no rows to filter".to_owned(),
            Self::SortAsc(label) => format!("sort {label} asc"),
            Self::SortDesc(label) => format!("sort {label} desc"),
            Self::SortUnavailable => "sort unavailable".to_owned(),
            Self::Saved(path) => format!("saved {}", path.display()),
            Self::SaveFailed(error) => format!("save failed: {error}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    options: ViewOptions,
    selected_col: usize,
    selected_row: usize,
    status_line: Option<String>,
    status_token: u64,
}

/// Runs the interactive table view until the user quits. The table is
/// activated first so every column has a filter and an indicator.
pub fn run_app<R: TableRuntime>(
    controller: &mut TableController,
    runtime: &mut R,
    options: ViewOptions,
) -> Result<()> {
    controller.dispatch(TableCommand::Activate);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        options,
        ..ViewData::default()
    };
    let result = event_loop(
        &mut terminal,
        controller,
        runtime,
        &mut view_data,
        next_terminal_event,
    );

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn next_terminal_event() -> Result<Option<Event>> {
    if !event::poll(Duration::from_millis(120)).context("poll event")? {
        return Ok(None);
    }
    event::read().context("read event").map(Some)
}

/// Draws and handles events until quit. Errors return here so the caller
/// can restore the terminal before reporting them.
fn event_loop<B, R, E>(
    terminal: &mut Terminal<B>,
    controller: &mut TableController,
    runtime: &mut R,
    view_data: &mut ViewData,
    mut next_event: E,
) -> Result<()>
where
    B: Backend,
    R: TableRuntime,
    E: FnMut() -> Result<Option<Event>>,
{
    let (internal_tx, internal_rx) = mpsc::channel();
    loop {
        process_internal_events(view_data, &internal_rx);

        terminal
            .draw(|frame| render(frame, controller.table(), &*view_data))
            .context("draw frame")?;

        if let Some(Event::Key(key)) = next_event()? {
            if handle_key_event(controller, runtime, view_data, &internal_tx, key) {
                return Ok(());
            }
        }
    }
}

fn process_internal_events(view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>, status: TableStatus) {
    let message = status.message();
    log::debug!("status: {message}");
    view_data.status_line = Some(message);
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Applies one key press. Returns true when the UI should exit.
fn handle_key_event<R: TableRuntime>(
    controller: &mut TableController,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let Some(command) = key_command_for_key(key) else {
        return false;
    };

    let status = match command {
        KeyCommand::Quit => return true,
        KeyCommand::MoveColumn(delta) => {
            move_col(controller.table(), view_data, delta);
            None
        }
        KeyCommand::MoveRow(delta) => {
            move_row(controller.table(), view_data, delta);
            None
        }
        KeyCommand::Input(ch) => {
            let mut value = focused_filter(controller.table(), view_data);
            value.push(ch);
            Some(update_filter(controller, view_data, value))
        }
        KeyCommand::Backspace => {
            let mut value = focused_filter(controller.table(), view_data);
            value.pop();
            Some(update_filter(controller, view_data, value))
        }
        KeyCommand::ClearFilter => Some(update_filter(controller, view_data, String::new())),
        KeyCommand::ClearAllFilters => {
            let events = controller.dispatch(TableCommand::ClearFilters);
            Some(if events.is_empty() {
                TableStatus::NoRows
            } else {
                TableStatus::FiltersCleared
            })
        }
        KeyCommand::ClickIndicator => Some(click_focused(controller, view_data)),
        KeyCommand::SaveSnapshot => Some(match runtime.save_snapshot(controller.table()) {
            Ok(path) => TableStatus::Saved(path),
            Err(error) => TableStatus::SaveFailed(format!("{error:#}")),
        }),
    };

    clamp_cursor(controller.table(), view_data);
    if let Some(status) = status {
        emit_status(view_data, internal_tx, status);
    }
    false
}

fn key_command_for_key(key: KeyEvent) -> Option<KeyCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), modifiers) | (KeyCode::Char('c'), modifiers)
            if modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(KeyCommand::Quit)
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyCommand::ClearFilter)
        }
        (KeyCode::Char('s'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyCommand::ClickIndicator)
        }
        (KeyCode::Char('w'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyCommand::SaveSnapshot)
        }
        (KeyCode::Left, _) | (KeyCode::BackTab, _) => Some(KeyCommand::MoveColumn(-1)),
        (KeyCode::Right, _) | (KeyCode::Tab, _) => Some(KeyCommand::MoveColumn(1)),
        (KeyCode::Up, _) => Some(KeyCommand::MoveRow(-1)),
        (KeyCode::Down, _) => Some(KeyCommand::MoveRow(1)),
        (KeyCode::Enter, _) => Some(KeyCommand::ClickIndicator),
        (KeyCode::Esc, _) => Some(KeyCommand::ClearAllFilters),
        (KeyCode::Backspace, _) => Some(KeyCommand::Backspace),
        (KeyCode::Char(ch), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            Some(KeyCommand::Input(ch))
        }
        _ => None,
    }
}

fn focused_filter(table: &Table, view_data: &ViewData) -> String {
    table
        .header_cells()
        .get(view_data.selected_col)
        .map(|cell| cell.filter().to_owned())
        .unwrap_or_default()
}

fn update_filter(
    controller: &mut TableController,
    view_data: &ViewData,
    value: String,
) -> TableStatus {
    let column = view_data.selected_col;
    let events = controller.dispatch(TableCommand::FilterKeyUp { column, value });
    match events.as_slice() {
        [TableEvent::Filtered(outcome)] => TableStatus::Filtered {
            label: column_label(controller.table(), column),
            visible: outcome.visible,
            total: outcome.total,
        },
        _ => TableStatus::NoRows,
    }
}

fn click_focused(controller: &mut TableController, view_data: &ViewData) -> TableStatus {
    let column = view_data.selected_col;
    let events = controller.dispatch(TableCommand::ClickIndicator(column));
    let label = column_label(controller.table(), column);
    match events.as_slice() {
        [
            TableEvent::Sorted {
                direction: SortDirection::Ascending,
                ..
            },
        ] => TableStatus::SortAsc(label),
        [
            TableEvent::Sorted {
                direction: SortDirection::Descending,
                ..
            },
        ] => TableStatus::SortDesc(label),
        _ => TableStatus::SortUnavailable,
    }
}

fn displayed_rows<'a>(table: &'a Table, view_data: &ViewData) -> Vec<&'a BodyRow> {
    table
        .rows()
        .iter()
        .filter(|row| view_data.options.show_hidden_rows || row.visible)
        .collect()
}

fn move_row(table: &Table, view_data: &mut ViewData, delta: isize) {
    let row_count = displayed_rows(table, view_data).len();
    if row_count == 0 {
        view_data.selected_row = 0;
        return;
    }

    let current = view_data.selected_row;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_row = next.min(row_count.saturating_sub(1));
}

fn move_col(table: &Table, view_data: &mut ViewData, delta: isize) {
    let column_count = table.column_count();
    if column_count == 0 {
        view_data.selected_col = 0;
        return;
    }

    let current = view_data.selected_col;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_col = next.min(column_count - 1);
}

fn clamp_cursor(table: &Table, view_data: &mut ViewData) {
    let rows = displayed_rows(table, view_data).len();
    view_data.selected_row = view_data.selected_row.min(rows.saturating_sub(1));
    let columns = table.column_count();
    view_data.selected_col = view_data.selected_col.min(columns.saturating_sub(1));
}

/// Header label for status messages; synthesized headers have none.
fn column_label(table: &Table, column: usize) -> String {
    table
        .header_cells()
        .get(column)
        .map(|cell| cell.label.trim())
        .filter(|label| !label.is_empty())
        .map_or_else(|| format!("column {}", column + 1), str::to_owned)
}

fn palette_color(palette: &IndicatorPalette, color: IndicatorColor, fallback: Color) -> Color {
    Color::from_str(palette.color(color)).unwrap_or(fallback)
}

fn render(frame: &mut ratatui::Frame<'_>, table: &Table, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());

    render_table(frame, layout[0], table, view_data);

    let status_widget = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[1]);
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, table: &Table, view_data: &ViewData) {
    let columns = table.column_count();
    let widths = vec![Constraint::Min(8); columns.max(1)];

    let header_cells = (0..columns).map(|column| header_cell(table, view_data, column));
    let header = Row::new(header_cells).height(2);

    let rows = displayed_rows(table, view_data);
    let body = rows.iter().enumerate().map(|(row_index, row)| {
        let selected_row = row_index == view_data.selected_row;
        let cells = (0..columns)
            .map(|column| {
                let mut style = Style::default();
                if !row.visible {
                    style = style.fg(Color::DarkGray);
                }
                if selected_row {
                    style = style.bg(Color::DarkGray);
                }
                if selected_row && column == view_data.selected_col {
                    style = Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD);
                }
                Cell::from(row.cell(column).unwrap_or_default().to_owned()).style(style)
            })
            .collect::<Vec<_>>();
        Row::new(cells)
    });

    let widget = ratatui::widgets::Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(table))
                .borders(Borders::ALL),
        );
    frame.render_widget(widget, area);
}

/// Two lines per header cell: label plus indicator, then the filter input.
fn header_cell(table: &Table, view_data: &ViewData, column: usize) -> Cell<'static> {
    let Some(cell) = table.header_cells().get(column) else {
        return Cell::from(String::new());
    };
    let focused = column == view_data.selected_col;
    let mut label_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    if focused {
        label_style = label_style.add_modifier(Modifier::UNDERLINED);
    }

    let mut title = vec![Span::styled(cell.label.trim().to_owned(), label_style)];
    if let Some(indicator) = cell.indicator() {
        let palette = &view_data.options.palette;
        let color = if indicator.is_active() {
            palette_color(palette, IndicatorColor::Active, Color::White)
        } else {
            palette_color(palette, IndicatorColor::Inactive, Color::DarkGray)
        };
        let arrow = match indicator.direction {
            SortDirection::Ascending => ARROW_UP,
            SortDirection::Descending => ARROW_DOWN,
        };
        title.push(Span::raw(" "));
        title.push(Span::styled(arrow, Style::default().fg(color)));
    }

    let cursor = if focused { "_" } else { "" };
    let filter_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    let filter = Line::from(Span::styled(
        format!("/{}{cursor}", cell.filter()),
        filter_style,
    ));
    Cell::from(Text::from(vec![Line::from(title), filter]))
}

fn table_title(table: &Table) -> String {
    let total = table.rows().len();
    let visible = table.visible_count();
    let sort = table
        .active_sort()
        .map(|(column, direction)| {
            format!(" | sort {} {}", column_label(table, column), direction.label())
        })
        .unwrap_or_default();
    format!("{} ({visible}/{total} rows){sort}", table.id)
}

fn status_text(view_data: &ViewData) -> String {
    let default = "←/→ col ↑/↓ row | type to filter ctrl+u esc | enter sort | ctrl+w save | ctrl+q";
    match &view_data.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default.to_owned(),
    }
}
