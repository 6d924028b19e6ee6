pub use crate::config::*;

use log::debug;

/// A builder for assembling a decision matrix row by row.
///
/// ```
/// pub use topsis_engine::builder::{parse_impacts, parse_weights, Builder};
/// pub use topsis_engine::TopsisRules;
/// # use topsis_engine::TopsisErrors;
///
/// let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES).criteria(
///     &["Price".to_string(), "Storage".to_string()],
///     &parse_weights("1,2")?,
///     &parse_impacts("-,+")?,
/// )?;
///
/// builder.add_alternative("Phone A", &[250.0, 64.0])?;
/// builder.add_alternative_text("Phone B", &["199.5".to_string(), "32".to_string()])?;
///
/// let result = builder.run()?;
/// assert_eq!(result.ranks.len(), 2);
///
/// # Ok::<(), TopsisErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TopsisRules,
    pub(crate) _criteria: Vec<Criterion>,
    pub(crate) _alternatives: Vec<Alternative>,
}

impl Builder {
    pub fn new(rules: &TopsisRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            _criteria: Vec::new(),
            _alternatives: Vec::new(),
        }
    }

    /// Declares the criteria, in column order.
    ///
    /// All three slices must have the same length.
    pub fn criteria(
        self,
        names: &[String],
        weights: &[f64],
        impacts: &[Impact],
    ) -> Result<Builder, TopsisErrors> {
        if weights.len() != names.len() {
            return Err(TopsisErrors::DimensionMismatch {
                what: "weights".to_string(),
                expected: names.len(),
                found: weights.len(),
            });
        }
        if impacts.len() != names.len() {
            return Err(TopsisErrors::DimensionMismatch {
                what: "impacts".to_string(),
                expected: names.len(),
                found: impacts.len(),
            });
        }
        let criteria = names
            .iter()
            .zip(weights.iter())
            .zip(impacts.iter())
            .map(|((name, weight), impact)| Criterion {
                name: name.clone(),
                weight: *weight,
                impact: *impact,
            })
            .collect();
        Ok(Builder {
            _rules: self._rules,
            _criteria: criteria,
            _alternatives: Vec::new(),
        })
    }

    pub fn add_alternative(&mut self, label: &str, values: &[f64]) -> Result<(), TopsisErrors> {
        if values.len() != self._criteria.len() {
            return Err(TopsisErrors::DimensionMismatch {
                what: "criteria values".to_string(),
                expected: self._criteria.len(),
                found: values.len(),
            });
        }
        self._alternatives.push(Alternative {
            label: label.to_string(),
            values: values.to_vec(),
        });
        Ok(())
    }

    /// Adds an alternative from raw table cells.
    ///
    /// Every cell must parse as a finite number once trimmed.
    pub fn add_alternative_text(
        &mut self,
        label: &str,
        cells: &[String],
    ) -> Result<(), TopsisErrors> {
        let row = self._alternatives.len();
        let mut values: Vec<f64> = Vec::with_capacity(cells.len());
        for (criterion, cell) in cells.iter().enumerate() {
            let x = parse_finite(cell).ok_or_else(|| TopsisErrors::NonNumericData {
                row,
                criterion,
                content: cell.clone(),
            })?;
            values.push(x);
        }
        debug!("add_alternative_text: {:?} -> {:?}", label, values);
        self.add_alternative(label, &values)
    }

    pub fn build(self) -> Result<DecisionMatrix, TopsisErrors> {
        if self._alternatives.is_empty() {
            return Err(TopsisErrors::EmptyInput);
        }
        Ok(DecisionMatrix {
            criteria: self._criteria,
            alternatives: self._alternatives,
        })
    }

    /// Builds the matrix and runs the TOPSIS method with the rules of this builder.
    pub fn run(self) -> Result<TopsisResult, TopsisErrors> {
        let rules = self._rules.clone();
        let matrix = self.build()?;
        crate::run_topsis(&matrix, &rules)
    }
}

/// Parses a comma-separated list of non-negative weights, such as `"1,1,2,0.5"`.
pub fn parse_weights(s: &str) -> Result<Vec<f64>, TopsisErrors> {
    let mut res: Vec<f64> = Vec::new();
    for (position, token) in s.split(',').enumerate() {
        match parse_finite(token) {
            Some(w) if w >= 0.0 => res.push(w),
            _ => {
                return Err(TopsisErrors::InvalidWeight {
                    position,
                    content: token.trim().to_string(),
                });
            }
        }
    }
    Ok(res)
}

/// Parses a comma-separated list of impacts, such as `"+,-,+"`.
pub fn parse_impacts(s: &str) -> Result<Vec<Impact>, TopsisErrors> {
    s.split(',')
        .enumerate()
        .map(|(position, token)| {
            token
                .trim()
                .parse::<Impact>()
                .map_err(|_| TopsisErrors::InvalidImpact {
                    position,
                    symbol: token.trim().to_string(),
                })
        })
        .collect()
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}
