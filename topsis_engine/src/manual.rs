/*!

This is the long-form manual for `topsis_engine` and the `topsis` program.

## The method

TOPSIS (Technique for Order Preference by Similarity to Ideal Solution) ranks
alternatives scored against several numeric criteria. Each criterion has a
weight and an impact: `+` when higher values are preferred (a benefit),
`-` when lower values are preferred (a cost).

The computation runs in the following stages:

1. **Normalize**: every value is divided by the euclidean norm of its column.
   A column containing only zeros cannot be normalized and is rejected.
2. **Weight**: every normalized value is multiplied by the weight of its
   criterion. Weights do not need to sum to 1.
3. **Ideal points**: for each criterion, the ideal best value is the largest
   weighted value for a benefit and the smallest one for a cost. The ideal
   worst value is the opposite.
4. **Distances**: the euclidean distance of each alternative to the ideal
   best point and to the ideal worst point.
5. **Score**: `distance_worst / (distance_best + distance_worst)`, between 0
   and 1. An alternative at distance zero of both points (this only happens
   when every criterion is constant across the alternatives) scores 0.5.
6. **Rank**: the highest score gets the rank 1.

## Ties

Alternatives with exactly equal scores are ranked according to the tie mode:

| mode          | scores `[0.7, 0.5, 0.5, 0.2]` |
|---------------|-------------------------------|
| `competition` | `[1, 2, 2, 4]` (default)      |
| `dense`       | `[1, 2, 2, 3]`                |
| `ordinal`     | `[1, 2, 3, 4]`                |

## Input formats

The input is a table with a header row. The first column contains the names
of the alternatives and is passed through unchanged. All the other columns
are criteria and must contain numbers only. At least 3 columns are required.

### `csv`

Comma Separated Values. This is the default for files ending with `.csv`.

### `excel`

Spreadsheet files (`.xlsx`, `.xls`, `.xlsb`, `.ods`). When the workbook
contains multiple worksheets, the name of the worksheet should be provided
with `--excel-worksheet-name`, otherwise the first one is used.

## Running `topsis`

```bash
topsis data.csv "1,1,1,2" "+,+,-,+" result.csv
```

The result table contains the original columns followed by `Topsis Score`
and `Rank`. It is written as CSV or, when the output file ends with `.xlsx`,
as a spreadsheet. The `--summary` flag writes a JSON summary with the ideal points
and the distances of every alternative:

```bash
topsis data.csv "1,1,1,2" "+,+,-,+" --summary stdout
```

## Configuration

All the options can also be stored in a JSON file passed with `--config`.
Relative paths are resolved from the directory of the configuration file.
Options passed on the command line take precedence.

```json
{
  "input": {
    "filePath": "data.csv",
    "inputType": "csv"
  },
  "weights": "1,1,1,2",
  "impacts": "+,+,-,+",
  "output": {
    "filePath": "result.csv",
    "summaryPath": "summary.json"
  },
  "rules": {
    "tieMode": "competition"
  }
}
```

With `--reference`, the computed summary is compared to a reference summary
and the program fails if they differ.

*/
