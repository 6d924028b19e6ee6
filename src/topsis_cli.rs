mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_output;

use log::{debug, info, warn};

use snafu::{prelude::*, Backtrace, ErrorCompat, Snafu};
use topsis_engine::builder::{parse_impacts, parse_weights, Builder};
use topsis_engine::*;

use std::fs;
use std::path::Path;

use text_diff::print_diff;

use crate::args::Args;
use crate::topsis_cli::config_reader::*;
use crate::topsis_cli::io_common::*;

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("Input file not found: {path}"))]
    MissingInput { path: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of CSV file {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display("Error opening spreadsheet {path}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The spreadsheet {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The spreadsheet {path} does not contain a worksheet named {name}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Input file {path} must contain 3 or more columns, but {found} found"))]
    TooFewColumns { path: String, found: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error writing spreadsheet {path}"))]
    XlsxWrite {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display(
        "Cannot write {path}: only CSV (.csv) and spreadsheet (.xlsx) output files are supported"
    ))]
    UnsupportedOutput { path: String },
    #[snafu(display(
        "Missing {name}. Usage: topsis <inputFile> <weights> <impacts> [outputFile] or topsis --config <configFile>"
    ))]
    MissingArgument { name: String },
    #[snafu(display("Invalid data or parameters for the TOPSIS method"))]
    Topsis { source: TopsisErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
        backtrace: Option<Backtrace>,
    },
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Excel,
}

/// Everything needed for one run, once the command line and the configuration file are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input_path: String,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
    pub weights: String,
    pub impacts: String,
    pub output_path: Option<String>,
    pub summary_path: Option<String>,
    pub reference_path: Option<String>,
    pub rules: TopsisRules,
}

fn parse_input_type(path: &str, input_type: Option<&str>) -> CliResult<InputType> {
    match input_type {
        Some("csv") => Ok(InputType::Csv),
        Some("excel") => Ok(InputType::Excel),
        Some(x) => whatever!("Unknown input type {:?}, expected csv or excel", x),
        None if path.to_lowercase().ends_with(".csv") => Ok(InputType::Csv),
        None => Ok(InputType::Excel),
    }
}

fn parse_tie_mode(tie_mode: Option<&str>) -> CliResult<TopsisRules> {
    match tie_mode {
        None => Ok(TopsisRules::DEFAULT_RULES),
        Some(s) => match s.parse::<RankTieMode>() {
            Ok(tie_mode) => Ok(TopsisRules { tie_mode }),
            Err(msg) => whatever!("{}", msg),
        },
    }
}

/// Merges the command line arguments with the configuration file, if any.
/// The command line takes precedence.
pub fn settings_from_args(args: &Args) -> CliResult<RunSettings> {
    let config: Option<(TopsisConfig, String)> = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_path = Path::new(config_path.as_str())
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            Some((config, root_path))
        }
        None => None,
    };
    debug!("settings_from_args: config: {:?}", config);

    let resolve = |p: &String| match &config {
        Some((_, root_path)) => resolve_path(root_path, p),
        None => p.clone(),
    };

    let input_path = args
        .input
        .clone()
        .or_else(|| config.as_ref().map(|(c, _)| resolve(&c.input.file_path)))
        .context(MissingArgumentSnafu {
            name: "input file",
        })?;
    let weights = args
        .weights
        .clone()
        .or_else(|| config.as_ref().map(|(c, _)| c.weights.clone()))
        .context(MissingArgumentSnafu { name: "weights" })?;
    let impacts = args
        .impacts
        .clone()
        .or_else(|| config.as_ref().map(|(c, _)| c.impacts.clone()))
        .context(MissingArgumentSnafu { name: "impacts" })?;

    let input_settings = config.as_ref().map(|(c, _)| c.input.clone());
    let output_settings = config.as_ref().and_then(|(c, _)| c.output.clone());
    let rules_settings = config.as_ref().and_then(|(c, _)| c.rules.clone());

    let input_type_s = args
        .input_type
        .clone()
        .or_else(|| input_settings.as_ref().and_then(|i| i.input_type.clone()));
    let input_type = parse_input_type(&input_path, input_type_s.as_deref())?;

    let tie_mode_s = args
        .tie_mode
        .clone()
        .or_else(|| rules_settings.and_then(|r| r.tie_mode));

    Ok(RunSettings {
        input_path,
        input_type,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| input_settings.and_then(|i| i.excel_worksheet_name)),
        weights,
        impacts,
        output_path: args.output.clone().or_else(|| {
            output_settings
                .as_ref()
                .and_then(|o| o.file_path.as_ref().map(resolve))
        }),
        summary_path: args.summary.clone().or_else(|| {
            output_settings
                .as_ref()
                .and_then(|o| o.summary_path.as_ref())
                .map(|p| if p == STDOUT { p.clone() } else { resolve(p) })
        }),
        reference_path: args.reference.clone(),
        rules: parse_tie_mode(tie_mode_s.as_deref())?,
    })
}

fn read_table(settings: &RunSettings) -> CliResult<ParsedTable> {
    let path = &settings.input_path;
    ensure!(Path::new(path).exists(), MissingInputSnafu { path });
    info!("Attempting to read input file {:?}", path);
    let table = match settings.input_type {
        InputType::Csv => io_csv::read_csv_table(path)?,
        InputType::Excel => {
            io_excel::read_excel_table(path, settings.excel_worksheet_name.as_deref())?
        }
    };
    ensure!(
        table.header.len() >= 3,
        TooFewColumnsSnafu {
            path,
            found: table.header.len(),
        }
    );
    debug!(
        "read_table: header: {:?}, {} rows",
        table.header,
        table.rows.len()
    );
    Ok(table)
}

fn build_matrix(table: &ParsedTable, settings: &RunSettings) -> CliResult<Builder> {
    let weights = parse_weights(&settings.weights).context(TopsisSnafu {})?;
    let impacts = parse_impacts(&settings.impacts).context(TopsisSnafu {})?;
    let mut builder = Builder::new(&settings.rules)
        .criteria(&table.header[1..], &weights, &impacts)
        .context(TopsisSnafu {})?;
    for row in table.rows.iter() {
        builder
            .add_alternative_text(&row.label, &row.cells)
            .context(TopsisSnafu {})?;
    }
    Ok(builder)
}

/// Reads the table, runs the TOPSIS method and writes all the requested outputs.
pub fn run_topsis_file(settings: &RunSettings) -> CliResult<TopsisResult> {
    info!("settings: {:?}", settings);
    let table = read_table(settings)?;
    let result = build_matrix(&table, settings)?
        .run()
        .context(TopsisSnafu {})?;

    if let Some(output_path) = &settings.output_path {
        let lower_path = output_path.to_lowercase();
        if lower_path.ends_with(".csv") {
            io_output::write_csv_table(output_path, &table, &result)?;
        } else if lower_path.ends_with(".xlsx") {
            io_output::write_xlsx_table(output_path, &table, &result)?;
        } else {
            return UnsupportedOutputSnafu { path: output_path }.fail();
        }
        info!("Result saved in {}", output_path);
    }

    let summary_js = io_output::build_summary_js(settings, &result);
    let pretty_js_summary = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    match settings.summary_path.as_deref() {
        Some(STDOUT) => println!("{}", pretty_js_summary),
        Some(summary_path) => {
            fs::write(summary_path, &pretty_js_summary).context(WritingOutputSnafu {
                path: summary_path,
            })?;
            info!("Summary saved in {}", summary_path);
        }
        None if settings.output_path.is_none() => println!("{}", pretty_js_summary),
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &settings.reference_path {
        let summary_ref = read_summary(reference_path)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_summary {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_summary.as_str(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
        info!("The summary matches the reference {}", reference_path);
    }

    Ok(result)
}

/// The diagnostic printed when a run fails: the error, its causes and the backtrace
/// when one was captured (`RUST_BACKTRACE=1`).
pub fn error_report(e: &CliError) -> String {
    let mut lines: Vec<String> = vec![format!("Error: {}", e)];
    for cause in ErrorCompat::iter_chain(e).skip(1) {
        lines.push(format!("Caused by: {}", cause));
    }
    if let Some(backtrace) = ErrorCompat::backtrace(e) {
        lines.push(format!("Backtrace:\n{:?}", backtrace));
    }
    lines.join("\n")
}

pub fn run_with_args(args: &Args) -> CliResult<()> {
    let settings = settings_from_args(args)?;
    run_topsis_file(&settings)?;
    Ok(())
}
