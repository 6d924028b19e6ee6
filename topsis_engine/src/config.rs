// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// The preference direction of a criterion.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Impact {
    /// Higher raw values are preferred ("+").
    Benefit,
    /// Lower raw values are preferred ("-").
    Cost,
}

impl Impact {
    pub fn symbol(&self) -> &'static str {
        match self {
            Impact::Benefit => "+",
            Impact::Cost => "-",
        }
    }
}

impl FromStr for Impact {
    type Err = TopsisErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Impact::Benefit),
            "-" => Ok(Impact::Cost),
            x => Err(TopsisErrors::InvalidImpact {
                position: 0,
                symbol: x.to_string(),
            }),
        }
    }
}

impl Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One column of the decision matrix.
#[derive(PartialEq, Debug, Clone)]
pub struct Criterion {
    pub name: String,
    pub weight: f64,
    pub impact: Impact,
}

/// One row of the decision matrix. The label is opaque and only passed through.
#[derive(PartialEq, Debug, Clone)]
pub struct Alternative {
    pub label: String,
    pub values: Vec<f64>,
}

/// A table of alternatives scored against criteria.
///
/// The values of each alternative are aligned positionally with the criteria.
/// The matrix is not validated at construction: this is done by [crate::run_topsis].
/// It is usually simpler to assemble one with the [crate::builder::Builder].
#[derive(PartialEq, Debug, Clone, Default)]
pub struct DecisionMatrix {
    pub criteria: Vec<Criterion>,
    pub alternatives: Vec<Alternative>,
}

impl DecisionMatrix {
    pub fn weights(&self) -> Vec<f64> {
        self.criteria.iter().map(|c| c.weight).collect()
    }

    pub fn impacts(&self) -> Vec<Impact> {
        self.criteria.iter().map(|c| c.impact).collect()
    }

    pub fn values(&self) -> Vec<Vec<f64>> {
        self.alternatives.iter().map(|a| a.values.clone()).collect()
    }
}

// ******** Output data structures *********

/// One alternative with its closeness coefficient and its rank.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedAlternative {
    pub label: String,
    pub score: f64,
    pub rank: u32,
}

/// The outcome of a TOPSIS run.
///
/// All the vectors indexed by alternative follow the input order of the rows.
/// The intermediate stages are kept for reporting purposes.
#[derive(PartialEq, Debug, Clone)]
pub struct TopsisResult {
    pub labels: Vec<String>,
    pub normalized: Vec<Vec<f64>>,
    pub weighted: Vec<Vec<f64>>,
    pub ideal_best: Vec<f64>,
    pub ideal_worst: Vec<f64>,
    pub distance_best: Vec<f64>,
    pub distance_worst: Vec<f64>,
    pub scores: Vec<f64>,
    pub ranks: Vec<u32>,
}

impl TopsisResult {
    /// The alternatives ordered by rank. Alternatives sharing a rank keep their input order.
    pub fn ranking(&self) -> Vec<RankedAlternative> {
        let mut res: Vec<RankedAlternative> = self
            .labels
            .iter()
            .zip(self.scores.iter())
            .zip(self.ranks.iter())
            .map(|((label, score), rank)| RankedAlternative {
                label: label.clone(),
                score: *score,
                rank: *rank,
            })
            .collect();
        res.sort_by_key(|ra| ra.rank);
        res
    }
}

/// Errors that prevent the algorithm from completing successfully.
///
/// Positions (rows and criteria) are 0-based.
#[derive(PartialEq, Debug, Clone)]
pub enum TopsisErrors {
    /// No alternative to rank.
    EmptyInput,
    /// Fewer than two criteria.
    NotEnoughCriteria { found: usize },
    /// The weights, the impacts or a row do not have one entry per criterion.
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    InvalidImpact { position: usize, symbol: String },
    InvalidWeight { position: usize, content: String },
    NonNumericData {
        row: usize,
        criterion: usize,
        content: String,
    },
    /// All the values of this criterion are zero: it cannot be normalized.
    DegenerateColumn { criterion: usize },
}

impl Error for TopsisErrors {}

impl Display for TopsisErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopsisErrors::EmptyInput => write!(f, "the decision matrix has no alternative"),
            TopsisErrors::NotEnoughCriteria { found } => write!(
                f,
                "at least 2 criteria are required, but only {} found",
                found
            ),
            TopsisErrors::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "number of weights, impacts and criteria must be the same: expected {} {} but found {}",
                expected, what, found
            ),
            TopsisErrors::InvalidImpact { position, symbol } => write!(
                f,
                "impacts must be + or -, found {:?} at position {}",
                symbol,
                position + 1
            ),
            TopsisErrors::InvalidWeight { position, content } => write!(
                f,
                "weights must be non-negative numbers, found {:?} at position {}",
                content,
                position + 1
            ),
            TopsisErrors::NonNumericData {
                row,
                criterion,
                content,
            } => write!(
                f,
                "all the criteria values must be numeric, found {:?} at row {} criterion {}",
                content,
                row + 1,
                criterion + 1
            ),
            TopsisErrors::DegenerateColumn { criterion } => write!(
                f,
                "criterion {} only contains zeros and cannot be normalized",
                criterion + 1
            ),
        }
    }
}

// ********* Configuration **********

/// How alternatives with equal scores are ranked.
///
/// With the scores `[0.7, 0.5, 0.5, 0.2]`:
/// - `Competition` gives `[1, 2, 2, 4]`
/// - `Dense` gives `[1, 2, 2, 3]`
/// - `Ordinal` gives `[1, 2, 3, 4]` (the first row in input order wins the tie)
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum RankTieMode {
    Competition,
    Dense,
    Ordinal,
}

impl FromStr for RankTieMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "competition" => Ok(RankTieMode::Competition),
            "dense" => Ok(RankTieMode::Dense),
            "ordinal" => Ok(RankTieMode::Ordinal),
            x => Err(format!(
                "unknown tie mode {:?}, expected one of competition, dense, ordinal",
                x
            )),
        }
    }
}

impl Display for RankTieMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RankTieMode::Competition => "competition",
            RankTieMode::Dense => "dense",
            RankTieMode::Ordinal => "ordinal",
        };
        write!(f, "{}", s)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TopsisRules {
    pub tie_mode: RankTieMode,
}

impl TopsisRules {
    pub const DEFAULT_RULES: TopsisRules = TopsisRules {
        tie_mode: RankTieMode::Competition,
    };
}

impl Default for TopsisRules {
    fn default() -> Self {
        TopsisRules::DEFAULT_RULES
    }
}
