use std::path::Path;

/// Name of the summary destination that prints to the standard output.
pub const STDOUT: &str = "stdout";

pub const SCORE_COLUMN: &str = "Topsis Score";
pub const RANK_COLUMN: &str = "Rank";

/// A row of the input table, before any numeric validation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedRow {
    pub label: String,
    pub cells: Vec<String>,
}

/// The input table as read by the readers.
///
/// The header includes the name of the label column.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedTable {
    pub header: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

impl ParsedTable {
    pub fn from_records(header: Vec<String>, records: Vec<Vec<String>>) -> ParsedTable {
        let rows = records
            .into_iter()
            .map(|mut record| {
                let cells = if record.is_empty() {
                    record.push(String::new());
                    Vec::new()
                } else {
                    record.split_off(1)
                };
                ParsedRow {
                    label: record.swap_remove(0),
                    cells,
                }
            })
            .collect();
        ParsedTable { header, rows }
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn resolve_path(root_path: &str, path: &str) -> String {
    if Path::new(path).is_absolute() || root_path.is_empty() {
        path.to_string()
    } else {
        Path::new(root_path).join(path).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_to_rows() {
        let table = ParsedTable::from_records(
            vec!["Name".to_string(), "a".to_string(), "b".to_string()],
            vec![
                vec!["x".to_string(), "1".to_string(), "2".to_string()],
                vec![],
            ],
        );
        assert_eq!(table.rows[0].label, "x");
        assert_eq!(table.rows[0].cells, vec!["1", "2"]);
        assert_eq!(table.rows[1].label, "");
        assert!(table.rows[1].cells.is_empty());
    }

    #[test]
    fn paths() {
        assert_eq!(simplify_file_name("/tmp/data/phones.csv"), "phones.csv");
        assert_eq!(resolve_path("", "phones.csv"), "phones.csv");
        assert_eq!(resolve_path("/tmp", "/data/phones.csv"), "/data/phones.csv");
        assert_eq!(resolve_path("/tmp", "phones.csv"), "/tmp/phones.csv");
    }
}
