// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use dyntable_app::{TableCommand, TableController, TableEvent, TableId};
use dyntable_html::Document;
use dyntable_testkit::{DEMO_ROWS, DEMO_TABLE_ID, TableFaker};
use runtime::FileRuntime;
use std::env;
use std::fs;
use std::path::PathBuf;

const DEMO_SEED: u64 = 20_260_101;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `dyntable --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    logging::init(&config)?;

    let (source, table_id) = load_source(&options)?;
    let document = Document::parse(&source);
    let extracted = document.extract(&table_id).ok_or_else(|| {
        let known = document.table_ids().unwrap_or_default();
        anyhow!(
            "no table with id {:?} in {}; tables with ids: [{}]",
            table_id.as_str(),
            source_label(&options),
            known.join(", ")
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    let palette = config.palette();
    let mut controller =
        TableController::with_strategy(extracted.table.clone(), config.sort_strategy());
    controller.dispatch(TableCommand::Activate);
    apply_cli_commands(&mut controller, &options)?;

    match &options.output {
        Some(path) => {
            let contents = if runtime::is_json_output(path) {
                runtime::snapshot_json(controller.table())?
            } else {
                runtime::render_document(&document, &extracted.markup, controller.table(), &palette)
            };
            runtime::write_output(path, &contents)
        }
        None => {
            let view = dyntable_tui::ViewOptions {
                palette: palette.clone(),
                show_hidden_rows: config.show_hidden_rows(),
            };
            let snapshot_path = runtime::snapshot_path_for(options.input.as_deref());
            let mut runtime =
                FileRuntime::new(document, extracted.markup, palette, snapshot_path);
            dyntable_tui::run_app(&mut controller, &mut runtime, view)
        }
    }
}

/// Document source and the id of the table to enhance.
fn load_source(options: &CliOptions) -> Result<(String, TableId)> {
    if options.demo {
        let id = options.table.as_deref().unwrap_or(DEMO_TABLE_ID);
        let source = TableFaker::new(DEMO_SEED).document(id, DEMO_ROWS);
        return Ok((source, TableId::new(id)));
    }

    let input = options
        .input
        .as_ref()
        .ok_or_else(|| anyhow!("missing input file; run with --help to see usage"))?;
    let table = options
        .table
        .as_deref()
        .ok_or_else(|| anyhow!("--table <id> is required unless --demo is given"))?;
    let source = fs::read_to_string(input)
        .with_context(|| format!("read input document {}", input.display()))?;
    Ok((source, TableId::new(table)))
}

fn source_label(options: &CliOptions) -> String {
    match (&options.input, options.demo) {
        (_, true) => "demo document".to_owned(),
        (Some(input), false) => input.display().to_string(),
        (None, false) => "input".to_owned(),
    }
}

/// Replays `--filter` values as keystrokes, then `--sort` columns as
/// indicator clicks in the order given.
fn apply_cli_commands(controller: &mut TableController, options: &CliOptions) -> Result<()> {
    for (key, value) in &options.filters {
        let column = resolve_column(controller, key, "--filter")?;
        let events = controller.dispatch(TableCommand::FilterKeyUp {
            column,
            value: value.clone(),
        });
        if let [TableEvent::Filtered(outcome)] = events.as_slice() {
            log::info!(
                "filter column {column} by {value:?}: {}/{} rows",
                outcome.visible,
                outcome.total
            );
        }
    }
    for key in &options.sorts {
        let column = resolve_column(controller, key, "--sort")?;
        for event in controller.dispatch(TableCommand::ClickIndicator(column)) {
            if let TableEvent::Sorted { column, direction } = event {
                log::info!("sort column {column} {}", direction.label());
            }
        }
    }
    Ok(())
}

fn resolve_column(controller: &TableController, key: &str, flag: &str) -> Result<usize> {
    let table = controller.table();
    table.find_column(key).ok_or_else(|| {
        let labels = table
            .header_cells()
            .iter()
            .map(|cell| cell.label.trim())
            .collect::<Vec<_>>();
        anyhow!(
            "{flag} column {key:?} not found; use a 0-based index below {} or one of [{}]",
            table.column_count(),
            labels.join(", ")
        )
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    input: Option<PathBuf>,
    table: Option<String>,
    filters: Vec<(String, String)>,
    sorts: Vec<String>,
    output: Option<PathBuf>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        input: None,
        table: None,
        filters: Vec::new(),
        sorts: Vec::new(),
        output: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--table" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--table requires a table id"))?;
                options.table = Some(value.as_ref().to_owned());
            }
            "--filter" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--filter requires <column>=<text>"))?;
                let Some((column, text)) = value.as_ref().split_once('=') else {
                    bail!(
                        "--filter expects <column>=<text>, got {:?}",
                        value.as_ref()
                    );
                };
                options.filters.push((column.to_owned(), text.to_owned()));
            }
            "--sort" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--sort requires a column index or label"))?;
                options.sorts.push(value.as_ref().to_owned());
            }
            "--output" | "-o" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--output requires a file path or -"))?;
                options.output = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown if unknown.starts_with('-') => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
            path => {
                if let Some(previous) = &options.input {
                    bail!(
                        "only one input file is supported, got {} and {path}",
                        previous.display()
                    );
                }
                options.input = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("dyntable [options] <file.html>");
    println!("  --table <id>             Table to enhance (required unless --demo)");
    println!("  --filter <col>=<text>    Type <text> into a column filter (repeatable)");
    println!("  --sort <col>             Click a column's sort indicator (repeatable)");
    println!("  --output <path>          Write the result instead of opening the viewer");
    println!("                           (- for stdout, .json for a row snapshot)");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Use a generated demo table");
    println!("  --check                  Validate config, input and table id");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, apply_cli_commands, parse_cli_args};
    use anyhow::Result;
    use dyntable_app::{TableCommand, TableController};
    use dyntable_testkit::people_table;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/dyntable-config.toml")
    }

    fn controller() -> TableController {
        let mut controller = TableController::new(people_table());
        controller.dispatch(TableCommand::Activate);
        controller
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                input: None,
                table: None,
                filters: Vec::new(),
                sorts: Vec::new(),
                output: None,
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_collects_table_commands_in_order() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "report.html",
                "--table",
                "people",
                "--filter",
                "Age=3",
                "--filter",
                "0=B=b",
                "--sort",
                "Age",
                "--sort",
                "Age",
                "-o",
                "-",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.input, Some(PathBuf::from("report.html")));
        assert_eq!(options.table.as_deref(), Some("people"));
        assert_eq!(
            options.filters,
            vec![
                ("Age".to_owned(), "3".to_owned()),
                ("0".to_owned(), "B=b".to_owned()),
            ]
        );
        assert_eq!(options.sorts, vec!["Age".to_owned(), "Age".to_owned()]);
        assert_eq!(options.output, Some(PathBuf::from("-")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        for flag in ["--config", "--table", "--filter", "--sort", "--output"] {
            let error = parse_cli_args(vec![flag], default_options_path())
                .expect_err("missing value should fail");
            assert!(error.to_string().contains("requires"), "{flag}: {error}");
        }
    }

    #[test]
    fn parse_cli_args_rejects_filter_without_equals() {
        let error = parse_cli_args(vec!["--filter", "Age"], default_options_path())
            .expect_err("filter without = should fail");
        assert!(error.to_string().contains("<column>=<text>"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_rejects_second_input() {
        let error = parse_cli_args(vec!["a.html", "b.html"], default_options_path())
            .expect_err("two inputs should fail");
        assert!(error.to_string().contains("only one input file"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check", "--demo"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(options.demo);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn cli_commands_filter_then_click() -> Result<()> {
        let options = parse_cli_args(
            vec!["--filter", "name=o", "--sort", "1", "--sort", "1"],
            default_options_path(),
        )?;
        let mut controller = controller();
        apply_cli_commands(&mut controller, &options)?;

        let table = controller.table();
        assert_eq!(table.visible_count(), 1);
        assert_eq!(
            table.active_sort(),
            Some((1, dyntable_app::SortDirection::Descending))
        );
        let names: Vec<&str> = table.rows().iter().filter_map(|row| row.cell(0)).collect();
        assert_eq!(names, vec!["Bob", "Al"]);
        Ok(())
    }

    #[test]
    fn cli_commands_report_unknown_columns() -> Result<()> {
        let options = parse_cli_args(vec!["--sort", "Height"], default_options_path())?;
        let mut controller = controller();
        let error = apply_cli_commands(&mut controller, &options)
            .expect_err("unknown column should fail");
        let message = error.to_string();
        assert!(message.contains("--sort column \"Height\" not found"));
        assert!(message.contains("[Name, Age]"));
        Ok(())
    }
}
