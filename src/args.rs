use clap::Parser;

/// This is a TOPSIS ranking program: it scores and ranks the rows of a table against weighted criteria.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The table of alternatives, in CSV or spreadsheet format. The first column contains
    /// the names of the alternatives, all the other columns are numeric criteria.
    #[clap(value_parser)]
    pub input: Option<String>,

    /// (list of comma-separated numbers, optional) The weight of each criterion, for example "1,1,1,2".
    #[clap(value_parser, allow_hyphen_values = true)]
    pub weights: Option<String>,

    /// (list of comma-separated + or -, optional) The impact of each criterion, for example "+,+,-,+".
    /// Use + when higher values are better and - when lower values are better.
    #[clap(value_parser, allow_hyphen_values = true)]
    pub impacts: Option<String>,

    /// (file path, optional) If specified, the input table with the score and the rank of each alternative
    /// will be written to this location, as CSV (.csv) or as a spreadsheet (.xlsx).
    #[clap(value_parser)]
    pub output: Option<String>,

    /// (file path, optional) A JSON file containing the description of the run. The positional arguments and
    /// the other options override the values of this file. For more information about the file format,
    /// read the documentation of the topsis_engine::manual module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the summary of a run in JSON format. If provided, topsis will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the run will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (csv or excel) The type of the input. By default, files ending with .csv are read as CSV and all the other
    /// files as spreadsheets.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using a spreadsheet, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (competition, dense or ordinal, default competition) How alternatives with equal scores are ranked.
    #[clap(long, value_parser)]
    pub tie_mode: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positionals_starting_with_a_hyphen() {
        let args = Args::try_parse_from(["topsis", "data.csv", "-1,2", "-,+", "out.csv"]).unwrap();
        assert_eq!(args.weights.as_deref(), Some("-1,2"));
        assert_eq!(args.impacts.as_deref(), Some("-,+"));
        assert_eq!(args.output.as_deref(), Some("out.csv"));
    }
}
