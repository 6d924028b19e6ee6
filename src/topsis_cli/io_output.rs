// Writers for the result table and the JSON summary.

use rust_xlsxwriter::Workbook;
use serde_json::json;
use serde_json::Value as JSValue;

use crate::topsis_cli::{io_common::*, *};

pub fn write_csv_table(path: &str, table: &ParsedTable, result: &TopsisResult) -> CliResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;

    let mut header = table.header.clone();
    header.push(SCORE_COLUMN.to_string());
    header.push(RANK_COLUMN.to_string());
    wtr.write_record(&header).context(CsvWriteSnafu { path })?;

    // Rows stay in input order.
    for ((row, score), rank) in table
        .rows
        .iter()
        .zip(result.scores.iter())
        .zip(result.ranks.iter())
    {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(row.label.clone());
        record.extend(row.cells.iter().cloned());
        record.push(score.to_string());
        record.push(rank.to_string());
        wtr.write_record(&record).context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingOutputSnafu { path })?;
    Ok(())
}

/// Writes the result table as a single worksheet.
///
/// The criteria cells were validated as numbers and are written as numbers, the labels as text.
pub fn write_xlsx_table(path: &str, table: &ParsedTable, result: &TopsisResult) -> CliResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let mut header = table.header.clone();
    header.push(SCORE_COLUMN.to_string());
    header.push(RANK_COLUMN.to_string());
    for (col, name) in header.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, name)
            .context(XlsxWriteSnafu { path })?;
    }

    let score_col = table.header.len() as u16;
    for (idx, ((row, score), rank)) in table
        .rows
        .iter()
        .zip(result.scores.iter())
        .zip(result.ranks.iter())
        .enumerate()
    {
        let r = (idx + 1) as u32;
        worksheet
            .write_string(r, 0, &row.label)
            .context(XlsxWriteSnafu { path })?;
        for (col, cell) in row.cells.iter().enumerate() {
            let c = (col + 1) as u16;
            let written = match cell.trim().parse::<f64>() {
                Ok(x) => worksheet.write_number(r, c, x),
                Err(_) => worksheet.write_string(r, c, cell),
            };
            written.context(XlsxWriteSnafu { path })?;
        }
        worksheet
            .write_number(r, score_col, *score)
            .context(XlsxWriteSnafu { path })?;
        worksheet
            .write_number(r, score_col + 1, *rank)
            .context(XlsxWriteSnafu { path })?;
    }
    workbook.save(path).context(XlsxWriteSnafu { path })?;
    Ok(())
}

// The summary is meant to be compared with reference files: the values are rounded.
fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

pub fn build_summary_js(settings: &RunSettings, result: &TopsisResult) -> JSValue {
    // The parameters were already validated to build the result.
    let weights: Vec<f64> = parse_weights(&settings.weights).unwrap_or_default();
    let ideal_best: Vec<f64> = result.ideal_best.iter().map(|x| round6(*x)).collect();
    let ideal_worst: Vec<f64> = result.ideal_worst.iter().map(|x| round6(*x)).collect();
    let impacts: Vec<String> = parse_impacts(&settings.impacts)
        .unwrap_or_default()
        .iter()
        .map(|i| i.symbol().to_string())
        .collect();

    let mut order: Vec<usize> = (0..result.ranks.len()).collect();
    order.sort_by_key(|idx| result.ranks[*idx]);
    let results: Vec<JSValue> = order
        .iter()
        .map(|&idx| {
            json!({
                "alternative": result.labels[idx],
                "score": round6(result.scores[idx]),
                "rank": result.ranks[idx],
                "distanceBest": round6(result.distance_best[idx]),
                "distanceWorst": round6(result.distance_worst[idx]),
            })
        })
        .collect();

    json!({
        "config": {
            "input": simplify_file_name(&settings.input_path),
            "weights": weights,
            "impacts": impacts,
            "tieMode": settings.rules.tie_mode.to_string(),
        },
        "idealBest": ideal_best,
        "idealWorst": ideal_worst,
        "results": results,
    })
}
