// Primitives for reading spreadsheets.

use calamine::{open_workbook_auto, DataType, Range, Reader};

use crate::topsis_cli::{io_common::ParsedTable, *};

pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> CliResult<ParsedTable> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = match iter.next() {
        Some(row) => row.iter().map(read_cell).collect(),
        None => Vec::new(),
    };
    debug!("read_excel_table: header: {:?}", header);

    let mut records: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        debug!("read_excel_table: idx: {:?} row: {:?}", idx, row);
        records.push(row.iter().map(read_cell).collect());
    }
    Ok(ParsedTable::from_records(header, records))
}

// Numbers are rendered back to text: the numeric validation happens in one place for all the inputs.
fn read_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Empty => String::new(),
        other => format!("{:?}", other),
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> CliResult<Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.len() > 1 {
            warn!(
                "The spreadsheet {} contains multiple worksheets {:?}, using the first one",
                path, sheet_names
            );
        }
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}
