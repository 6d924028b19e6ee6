mod config;
pub mod builder;
pub mod manual;

use log::{debug, info, warn};

pub use crate::config::*;

// **** Private structures ****

// The reference points of the weighted matrix, one value per criterion.
#[derive(PartialEq, Debug, Clone)]
struct IdealPoints {
    best: Vec<f64>,
    worst: Vec<f64>,
}

// Invariant: every row has the same number of values as the weights and the impacts,
// and every value is finite.
#[derive(PartialEq, Debug, Clone)]
struct StageResult {
    normalized: Vec<Vec<f64>>,
    weighted: Vec<Vec<f64>>,
    ideal: IdealPoints,
    distance_best: Vec<f64>,
    distance_worst: Vec<f64>,
    scores: Vec<f64>,
    ranks: Vec<u32>,
}

/// Runs the TOPSIS method over a decision matrix.
///
/// Arguments:
/// * `matrix` the alternatives and the criteria (with their weights and impacts)
/// * `rules` the policy for ranking the alternatives with equal scores
///
/// The computation is pure: calling it twice with the same input returns the same result.
pub fn run_topsis(
    matrix: &DecisionMatrix,
    rules: &TopsisRules,
) -> Result<TopsisResult, TopsisErrors> {
    info!(
        "run_topsis: Processing {:?} alternatives, {:?} criteria, rules: {:?}",
        matrix.alternatives.len(),
        matrix.criteria.len(),
        rules
    );
    for (idx, c) in matrix.criteria.iter().enumerate() {
        debug!(
            "run_topsis: criterion {}: {} weight: {} impact: {}",
            idx + 1,
            c.name,
            c.weight,
            c.impact
        );
    }

    let sr = run_stages(
        &matrix.values(),
        &matrix.weights(),
        &matrix.impacts(),
        rules,
    )?;

    let res = TopsisResult {
        labels: matrix
            .alternatives
            .iter()
            .map(|a| a.label.clone())
            .collect(),
        normalized: sr.normalized,
        weighted: sr.weighted,
        ideal_best: sr.ideal.best,
        ideal_worst: sr.ideal.worst,
        distance_best: sr.distance_best,
        distance_worst: sr.distance_worst,
        scores: sr.scores,
        ranks: sr.ranks,
    };
    for ra in res.ranking() {
        info!("Rank {}: {} (score {:.6})", ra.rank, ra.label, ra.score);
    }
    Ok(res)
}

/// Computes the scores and the ranks of an unlabelled matrix.
///
/// `values` is indexed by alternative first, then by criterion.
pub fn compute(
    values: &[Vec<f64>],
    weights: &[f64],
    impacts: &[Impact],
    rules: &TopsisRules,
) -> Result<(Vec<f64>, Vec<u32>), TopsisErrors> {
    let sr = run_stages(values, weights, impacts, rules)?;
    Ok((sr.scores, sr.ranks))
}

fn run_stages(
    values: &[Vec<f64>],
    weights: &[f64],
    impacts: &[Impact],
    rules: &TopsisRules,
) -> Result<StageResult, TopsisErrors> {
    checks(values, weights, impacts)?;

    let normalized = normalize(values)?;
    debug!("run_stages: normalized: {:?}", normalized);

    let weighted = apply_weights(&normalized, weights);
    debug!("run_stages: weighted: {:?}", weighted);

    let ideal = ideal_points(&weighted, impacts);
    debug!("run_stages: ideal points: {:?}", ideal);

    let distance_best: Vec<f64> = weighted.iter().map(|r| distance(r, &ideal.best)).collect();
    let distance_worst: Vec<f64> = weighted
        .iter()
        .map(|r| distance(r, &ideal.worst))
        .collect();
    debug!(
        "run_stages: distance_best: {:?} distance_worst: {:?}",
        distance_best, distance_worst
    );

    let scores: Vec<f64> = distance_best
        .iter()
        .zip(distance_worst.iter())
        .map(|(db, dw)| closeness(*db, *dw))
        .collect();
    let ranks = assign_ranks(&scores, rules.tie_mode);
    debug!("run_stages: scores: {:?} ranks: {:?}", scores, ranks);

    Ok(StageResult {
        normalized,
        weighted,
        ideal,
        distance_best,
        distance_worst,
        scores,
        ranks,
    })
}

// The first failing check is reported. Nothing is computed before all of them pass.
// The number of criteria is the width of the matrix: weights and impacts are checked against it.
fn checks(values: &[Vec<f64>], weights: &[f64], impacts: &[Impact]) -> Result<(), TopsisErrors> {
    let num_criteria = match values.first() {
        Some(row) => row.len(),
        None => return Err(TopsisErrors::EmptyInput),
    };
    for row in values.iter() {
        if row.len() != num_criteria {
            return Err(TopsisErrors::DimensionMismatch {
                what: "criteria values".to_string(),
                expected: num_criteria,
                found: row.len(),
            });
        }
    }
    if weights.len() != num_criteria {
        return Err(TopsisErrors::DimensionMismatch {
            what: "weights".to_string(),
            expected: num_criteria,
            found: weights.len(),
        });
    }
    if impacts.len() != num_criteria {
        return Err(TopsisErrors::DimensionMismatch {
            what: "impacts".to_string(),
            expected: num_criteria,
            found: impacts.len(),
        });
    }
    if num_criteria < 2 {
        return Err(TopsisErrors::NotEnoughCriteria {
            found: num_criteria,
        });
    }
    for (idx, w) in weights.iter().enumerate() {
        if !w.is_finite() || *w < 0.0 {
            return Err(TopsisErrors::InvalidWeight {
                position: idx,
                content: w.to_string(),
            });
        }
        if *w == 0.0 {
            warn!(
                "checks: criterion {} has a zero weight and will not influence the ranking",
                idx + 1
            );
        }
    }
    for (row_idx, row) in values.iter().enumerate() {
        if let Some((crit_idx, x)) = row.iter().enumerate().find(|(_, x)| !x.is_finite()) {
            return Err(TopsisErrors::NonNumericData {
                row: row_idx,
                criterion: crit_idx,
                content: x.to_string(),
            });
        }
    }
    Ok(())
}

/// Vector normalization: every column is divided by its euclidean norm.
///
/// The norms are accumulated with `hypot`: finite columns neither overflow nor underflow.
fn normalize(values: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, TopsisErrors> {
    let num_criteria = values.first().map(|r| r.len()).unwrap_or(0);
    let mut norms: Vec<f64> = Vec::with_capacity(num_criteria);
    for j in 0..num_criteria {
        let norm = values.iter().map(|r| r[j]).fold(0.0, f64::hypot);
        if norm == 0.0 {
            return Err(TopsisErrors::DegenerateColumn { criterion: j });
        }
        norms.push(norm);
    }
    Ok(values
        .iter()
        .map(|r| r.iter().zip(norms.iter()).map(|(x, n)| x / n).collect())
        .collect())
}

fn apply_weights(normalized: &[Vec<f64>], weights: &[f64]) -> Vec<Vec<f64>> {
    normalized
        .iter()
        .map(|r| r.iter().zip(weights.iter()).map(|(x, w)| x * w).collect())
        .collect()
}

fn ideal_points(weighted: &[Vec<f64>], impacts: &[Impact]) -> IdealPoints {
    let mut best: Vec<f64> = Vec::with_capacity(impacts.len());
    let mut worst: Vec<f64> = Vec::with_capacity(impacts.len());
    for (j, impact) in impacts.iter().enumerate() {
        let col_max = weighted
            .iter()
            .map(|r| r[j])
            .fold(f64::NEG_INFINITY, f64::max);
        let col_min = weighted.iter().map(|r| r[j]).fold(f64::INFINITY, f64::min);
        match impact {
            Impact::Benefit => {
                best.push(col_max);
                worst.push(col_min);
            }
            Impact::Cost => {
                best.push(col_min);
                worst.push(col_max);
            }
        }
    }
    IdealPoints { best, worst }
}

fn distance(row: &[f64], point: &[f64]) -> f64 {
    row.iter()
        .zip(point.iter())
        .map(|(x, p)| x - p)
        .fold(0.0, f64::hypot)
}

/// The relative closeness to the ideal worst point.
///
/// A row sitting on both ideal points at once (every criterion is constant
/// across the alternatives) has no preferred direction and scores 0.5.
fn closeness(distance_best: f64, distance_worst: f64) -> f64 {
    if distance_best == 0.0 && distance_worst == 0.0 {
        0.5
    } else {
        distance_worst / (distance_best + distance_worst)
    }
}

/// Rank 1 is the highest score.
fn assign_ranks(scores: &[f64], tie_mode: RankTieMode) -> Vec<u32> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // The sort is stable: equal scores keep their input order.
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut ranks: Vec<u32> = vec![0; scores.len()];
    let mut previous: Option<f64> = None;
    let mut group_rank: u32 = 0;
    let mut dense_rank: u32 = 0;
    for (pos, &idx) in order.iter().enumerate() {
        let position = (pos + 1) as u32;
        let score = scores[idx];
        if previous != Some(score) {
            group_rank = position;
            dense_rank += 1;
        }
        ranks[idx] = match tie_mode {
            RankTieMode::Competition => group_rank,
            RankTieMode::Dense => dense_rank,
            RankTieMode::Ordinal => position,
        };
        previous = Some(score);
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use proptest::prelude::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn phones() -> Vec<Vec<f64>> {
        vec![
            vec![250.0, 16.0, 12.0, 5.0],
            vec![200.0, 16.0, 8.0, 3.0],
            vec![300.0, 32.0, 16.0, 4.0],
            vec![275.0, 32.0, 8.0, 4.0],
            vec![225.0, 16.0, 16.0, 2.0],
        ]
    }

    const PHONE_IMPACTS: [Impact; 4] = [Impact::Cost, Impact::Benefit, Impact::Benefit, Impact::Benefit];

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn phones_scenario() {
        init();
        let (scores, ranks) = compute(
            &phones(),
            &[0.25, 0.25, 0.25, 0.25],
            &PHONE_IMPACTS,
            &TopsisRules::DEFAULT_RULES,
        )
        .unwrap();
        assert_close(scores[0], 0.534276857182100);
        assert_close(scores[1], 0.308367768732469);
        assert_close(scores[2], 0.691632231267532);
        assert_close(scores[3], 0.534736584486838);
        assert_close(scores[4], 0.401046121516786);
        assert_eq!(ranks, vec![3, 5, 1, 2, 4]);
    }

    #[test]
    fn phones_with_labels() {
        init();
        let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES)
            .criteria(
                &["Price", "Storage", "Camera", "Looks"].map(String::from),
                &[0.25, 0.25, 0.25, 0.25],
                &PHONE_IMPACTS,
            )
            .unwrap();
        for (idx, row) in phones().iter().enumerate() {
            builder
                .add_alternative(&format!("M{}", idx + 1), row)
                .unwrap();
        }
        let res = builder.run().unwrap();
        let ranking: Vec<String> = res.ranking().iter().map(|ra| ra.label.clone()).collect();
        assert_eq!(ranking, vec!["M3", "M4", "M1", "M5", "M2"]);
        assert_eq!(res.ideal_best.len(), 4);
        // Cost criterion: the best point is the smallest weighted value.
        assert_close(res.ideal_best[0], res.weighted[1][0]);
        assert_close(res.ideal_worst[0], res.weighted[2][0]);
    }

    #[test]
    fn weights_are_relative() {
        let (s1, r1) = compute(
            &phones(),
            &[1.0, 1.0, 1.0, 1.0],
            &PHONE_IMPACTS,
            &TopsisRules::DEFAULT_RULES,
        )
        .unwrap();
        let (s2, r2) = compute(
            &phones(),
            &[0.25, 0.25, 0.25, 0.25],
            &PHONE_IMPACTS,
            &TopsisRules::DEFAULT_RULES,
        )
        .unwrap();
        assert_eq!(r1, r2);
        for (a, b) in s1.iter().zip(s2.iter()) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn empty_input() {
        let res = compute(&[], &[1.0, 1.0], &[Impact::Benefit; 2], &TopsisRules::default());
        assert_eq!(res, Err(TopsisErrors::EmptyInput));
    }

    #[test]
    fn single_criterion() {
        let res = compute(&[vec![1.0]], &[1.0], &[Impact::Benefit], &TopsisRules::default());
        assert_eq!(res, Err(TopsisErrors::NotEnoughCriteria { found: 1 }));
    }

    #[test]
    fn dimension_mismatch() {
        let rules = TopsisRules::default();
        let res = compute(&phones(), &[1.0, 1.0, 1.0], &PHONE_IMPACTS[..3], &rules);
        assert_eq!(
            res,
            Err(TopsisErrors::DimensionMismatch {
                what: "weights".to_string(),
                expected: 4,
                found: 3,
            })
        );
        let res = compute(&phones(), &[1.0; 4], &PHONE_IMPACTS[..3], &rules);
        assert!(matches!(
            res,
            Err(TopsisErrors::DimensionMismatch {
                expected: 4,
                found: 3,
                ..
            })
        ));
        let res = compute(&phones(), &[1.0; 5], &[Impact::Benefit; 5], &rules);
        assert!(matches!(
            res,
            Err(TopsisErrors::DimensionMismatch {
                expected: 4,
                found: 5,
                ..
            })
        ));
        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        let res = compute(&ragged, &[1.0, 1.0], &[Impact::Benefit; 2], &rules);
        assert!(matches!(res, Err(TopsisErrors::DimensionMismatch { .. })));
    }

    #[test]
    fn too_few_weights_for_the_matrix() {
        // The matrix has 4 criteria: a single weight is a mismatch, not a lack of criteria.
        let data = vec![vec![1.0, 2.0, 3.0, 4.0], vec![2.0, 1.0, 4.0, 3.0]];
        let res = compute(&data, &[1.0], &[Impact::Benefit], &TopsisRules::default());
        assert_eq!(
            res,
            Err(TopsisErrors::DimensionMismatch {
                what: "weights".to_string(),
                expected: 4,
                found: 1,
            })
        );
        let res = compute(&data, &[1.0; 4], &[Impact::Benefit], &TopsisRules::default());
        assert_eq!(
            res,
            Err(TopsisErrors::DimensionMismatch {
                what: "impacts".to_string(),
                expected: 4,
                found: 1,
            })
        );
    }

    #[test]
    fn invalid_weight() {
        let res = compute(
            &phones(),
            &[1.0, -1.0, 1.0, 1.0],
            &PHONE_IMPACTS,
            &TopsisRules::default(),
        );
        assert!(matches!(
            res,
            Err(TopsisErrors::InvalidWeight { position: 1, .. })
        ));
        let res = compute(
            &phones(),
            &[1.0, 1.0, f64::NAN, 1.0],
            &PHONE_IMPACTS,
            &TopsisRules::default(),
        );
        assert!(matches!(
            res,
            Err(TopsisErrors::InvalidWeight { position: 2, .. })
        ));
    }

    #[test]
    fn zero_weight_is_accepted() {
        init();
        let (scores, _) = compute(
            &phones(),
            &[0.0, 1.0, 1.0, 1.0],
            &PHONE_IMPACTS,
            &TopsisRules::default(),
        )
        .unwrap();
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn non_finite_data() {
        let mut data = phones();
        data[3][2] = f64::INFINITY;
        let res = compute(&data, &[1.0; 4], &PHONE_IMPACTS, &TopsisRules::default());
        assert!(matches!(
            res,
            Err(TopsisErrors::NonNumericData {
                row: 3,
                criterion: 2,
                ..
            })
        ));
    }

    #[test]
    fn degenerate_column() {
        let data = vec![vec![1.0, 0.0], vec![2.0, 0.0], vec![3.0, 0.0]];
        let res = compute(&data, &[1.0, 1.0], &[Impact::Benefit; 2], &TopsisRules::default());
        assert_eq!(res, Err(TopsisErrors::DegenerateColumn { criterion: 1 }));
    }

    #[test]
    fn tiny_values_are_not_degenerate() {
        let data = vec![vec![1e-200, 1.0], vec![2e-200, 2.0]];
        let normalized = normalize(&data).unwrap();
        assert_close(normalized[0][0], 1.0 / 5f64.sqrt());
        assert_close(normalized[1][0], 2.0 / 5f64.sqrt());
        let (scores, ranks) =
            compute(&data, &[1.0, 1.0], &[Impact::Benefit; 2], &TopsisRules::default()).unwrap();
        assert_eq!(scores, vec![0.0, 1.0]);
        assert_eq!(ranks, vec![2, 1]);
    }

    #[test]
    fn huge_values_keep_a_finite_norm() {
        let data = vec![vec![1e200, 1.0], vec![3e200, 2.0]];
        let normalized = normalize(&data).unwrap();
        assert_close(normalized[0][0], 1.0 / 10f64.sqrt());
        assert_close(normalized[1][0], 3.0 / 10f64.sqrt());
        let (scores, ranks) =
            compute(&data, &[1.0, 1.0], &[Impact::Cost, Impact::Cost], &TopsisRules::default())
                .unwrap();
        assert_eq!(scores, vec![1.0, 0.0]);
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn single_alternative_scores_half() {
        let (scores, ranks) = compute(
            &[vec![3.0, 4.0, 5.0]],
            &[1.0, 1.0, 1.0],
            &[Impact::Benefit, Impact::Cost, Impact::Benefit],
            &TopsisRules::default(),
        )
        .unwrap();
        assert_eq!(scores, vec![0.5]);
        assert_eq!(ranks, vec![1]);
    }

    #[test]
    fn identical_alternatives_share_rank() {
        let data = vec![vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0, 2.0]];
        let (scores, ranks) =
            compute(&data, &[1.0, 1.0], &[Impact::Benefit; 2], &TopsisRules::default()).unwrap();
        assert_eq!(scores, vec![0.5, 0.5, 0.5]);
        assert_eq!(ranks, vec![1, 1, 1]);
    }

    #[test]
    fn tie_modes() {
        let scores = [0.2, 0.5, 0.7, 0.5];
        assert_eq!(
            assign_ranks(&scores, RankTieMode::Competition),
            vec![4, 2, 1, 2]
        );
        assert_eq!(assign_ranks(&scores, RankTieMode::Dense), vec![3, 2, 1, 2]);
        assert_eq!(assign_ranks(&scores, RankTieMode::Ordinal), vec![4, 2, 1, 3]);
    }

    #[test]
    fn tied_rows_with_competition_ranking() {
        // Rows 1 and 3 are identical, so they get bit-identical scores.
        let data = vec![
            vec![5.0, 1.0],
            vec![3.0, 2.0],
            vec![1.0, 9.0],
            vec![3.0, 2.0],
        ];
        let (scores, ranks) = compute(
            &data,
            &[1.0, 1.0],
            &[Impact::Benefit, Impact::Cost],
            &TopsisRules::DEFAULT_RULES,
        )
        .unwrap();
        assert_eq!(scores[1], scores[3]);
        assert_eq!(ranks, vec![1, 2, 4, 2]);
    }

    #[test]
    fn flipping_impact_lowers_the_maximum() {
        // The first criterion dominates the outcome.
        let data = vec![vec![100.0, 5.0], vec![50.0, 6.0], vec![10.0, 5.5]];
        let weights = [10.0, 1.0];
        let (benefit, _) = compute(
            &data,
            &weights,
            &[Impact::Benefit, Impact::Benefit],
            &TopsisRules::default(),
        )
        .unwrap();
        let (cost, cost_ranks) = compute(
            &data,
            &weights,
            &[Impact::Cost, Impact::Benefit],
            &TopsisRules::default(),
        )
        .unwrap();
        assert!(cost[0] < benefit[0]);
        assert_eq!(cost_ranks[0], 3);
    }

    fn matrix_strategy() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<f64>, Vec<Impact>)> {
        (1usize..8, 2usize..6).prop_flat_map(|(n, m)| {
            (
                prop::collection::vec(prop::collection::vec(0.1f64..1000.0, m), n),
                prop::collection::vec(0.0f64..10.0, m),
                prop::collection::vec(
                    prop_oneof![Just(Impact::Benefit), Just(Impact::Cost)],
                    m,
                ),
            )
        })
    }

    proptest! {
        #[test]
        fn normalized_columns_have_unit_norm(values in prop::collection::vec(prop::collection::vec(0.1f64..1000.0, 3), 1..10)) {
            let normalized = normalize(&values).unwrap();
            for j in 0..3 {
                let sum: f64 = normalized.iter().map(|r| r[j] * r[j]).sum();
                prop_assert!((sum - 1.0).abs() < 1e-9);
            }
        }

        #[test]
        fn normalized_columns_have_unit_norm_at_any_scale(
            exponents in prop::collection::vec(-200i32..200, 3),
            mantissas in prop::collection::vec(prop::collection::vec(0.1f64..10.0, 3), 1..10),
        ) {
            let values: Vec<Vec<f64>> = mantissas
                .iter()
                .map(|r| r.iter().zip(exponents.iter()).map(|(x, e)| x * 10f64.powi(*e)).collect())
                .collect();
            let normalized = normalize(&values).unwrap();
            for j in 0..3 {
                let sum: f64 = normalized.iter().map(|r| r[j] * r[j]).sum();
                prop_assert!((sum - 1.0).abs() < 1e-9);
            }
            let (scores, _) = compute(&values, &[1.0; 3], &[Impact::Benefit; 3], &TopsisRules::default()).unwrap();
            for s in scores.iter() {
                prop_assert!((0.0..=1.0).contains(s));
            }
        }

        #[test]
        fn scores_are_bounded((values, weights, impacts) in matrix_strategy()) {
            let (scores, ranks) = compute(&values, &weights, &impacts, &TopsisRules::default()).unwrap();
            prop_assert_eq!(scores.len(), values.len());
            prop_assert_eq!(ranks.len(), values.len());
            for s in scores.iter() {
                prop_assert!((0.0..=1.0).contains(s));
            }
        }

        #[test]
        fn ranks_follow_scores((values, weights, impacts) in matrix_strategy()) {
            let (scores, ranks) = compute(&values, &weights, &impacts, &TopsisRules::default()).unwrap();
            for i in 0..scores.len() {
                prop_assert!(ranks[i] >= 1 && (ranks[i] as usize) <= scores.len());
                for k in 0..scores.len() {
                    if scores[i] > scores[k] {
                        prop_assert!(ranks[i] < ranks[k]);
                    }
                    if scores[i] == scores[k] {
                        prop_assert_eq!(ranks[i], ranks[k]);
                    }
                }
            }
        }

        #[test]
        fn repeated_runs_are_identical((values, weights, impacts) in matrix_strategy()) {
            let first = run_stages(&values, &weights, &impacts, &TopsisRules::default()).unwrap();
            let second = run_stages(&values, &weights, &impacts, &TopsisRules::default()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn mismatched_weights_are_rejected((values, weights, impacts) in matrix_strategy()) {
            let mut longer = weights.clone();
            longer.push(1.0);
            let res = compute(&values, &longer, &impacts, &TopsisRules::default());
            let is_mismatch = matches!(res, Err(TopsisErrors::DimensionMismatch { .. }));
            prop_assert!(is_mismatch);

            let shorter = &weights[..weights.len() - 1];
            let res = compute(&values, shorter, &impacts, &TopsisRules::default());
            let is_mismatch = matches!(res, Err(TopsisErrors::DimensionMismatch { .. }));
            prop_assert!(is_mismatch);

            let res = compute(&values, &weights, &impacts[1..], &TopsisRules::default());
            let is_mismatch = matches!(res, Err(TopsisErrors::DimensionMismatch { .. }));
            prop_assert!(is_mismatch);
        }
    }
}
