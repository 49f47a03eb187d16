//! Cronbach's alpha.
//!
//! # Algorithm
//!
//! ```text
//! α = k / (k − 1) · (1 − Σ σ²ᵢ / σ²_X)
//! ```
//!
//! where σ²ᵢ is the variance of item i and σ²_X the variance of the row-wise
//! *sum* of items. Both use the sample (N−1) estimator, so the ratio is the
//! same as with population variances.
//!
//! Alpha is not bounded by the formula: inconsistent or negatively keyed
//! items can push it below 0, and pathological data above 1. Such values are
//! returned as-is and logged at `warn` level.
//!
//! # Reference
//!
//! Cronbach, L.J. (1951). "Coefficient alpha and the internal structure of
//! tests", *Psychometrika* 16(3), pp. 297-334.

use serde::Serialize;
use tracing::{debug, warn};
use u_numflow::stats;

use super::inter_item::average_inter_item_correlation;
use crate::data::{ItemScore, ResponseMatrix};
use crate::error::{ReliabilityError, Result};

/// Raw alpha together with the usual companion statistics.
#[derive(Debug, Clone, Serialize)]
pub struct AlphaResult {
    /// Cronbach's alpha from item and total-score variances.
    pub raw: f64,
    /// Alpha from the mean inter-item correlation (items standardized).
    pub standardized: f64,
    /// Alpha recomputed with each item removed. `None` for fewer than 3 items.
    pub if_deleted: Option<Vec<ItemScore>>,
}

/// Computes Cronbach's alpha.
///
/// # Errors
///
/// - `ShapeMismatch` if fewer than 2 items.
/// - `DegenerateInput` if fewer than 2 respondents, any item is constant, or
///   the total score has zero variance.
///
/// # Examples
///
/// ```
/// use u_reliability::consistency::cronbach_alpha;
/// use u_reliability::data::ResponseMatrix;
///
/// let data = ResponseMatrix::new(
///     ["q1", "q2", "q3"],
///     vec![
///         vec![4.0, 4.0, 5.0],
///         vec![2.0, 3.0, 2.0],
///         vec![3.0, 3.0, 3.0],
///         vec![5.0, 4.0, 5.0],
///         vec![1.0, 2.0, 1.0],
///     ],
/// )
/// .unwrap();
/// let alpha = cronbach_alpha(&data).unwrap();
/// assert!(alpha > 0.9 && alpha < 1.0);
/// ```
pub fn cronbach_alpha(data: &ResponseMatrix) -> Result<f64> {
    let k = data.n_items();
    if k < 2 {
        return Err(ReliabilityError::shape_mismatch(format!(
            "alpha needs at least 2 items, got {k}"
        )));
    }
    if data.n_respondents() < 2 {
        return Err(ReliabilityError::degenerate(
            "alpha needs at least 2 respondents",
        ));
    }

    let mut item_var_sum = 0.0;
    for (name, col) in data.item_names().iter().zip(data.columns()) {
        let v = sample_variance(col)?;
        if v < 1e-300 {
            return Err(ReliabilityError::degenerate(format!(
                "item '{name}' has zero variance"
            )));
        }
        item_var_sum += v;
    }

    let total_var = sample_variance(&data.row_sums())?;
    if total_var < 1e-300 {
        return Err(ReliabilityError::degenerate("total score has zero variance"));
    }

    let kf = k as f64;
    let alpha = kf / (kf - 1.0) * (1.0 - item_var_sum / total_var);

    if !(0.0..=1.0).contains(&alpha) {
        warn!(alpha, items = k, "cronbach alpha outside [0, 1]");
    }
    debug!(items = k, respondents = data.n_respondents(), alpha, "cronbach alpha");

    Ok(alpha)
}

/// Standardized alpha: `k·r̄ / (1 + (k−1)·r̄)` with r̄ the mean inter-item
/// correlation.
///
/// # Errors
///
/// As [`average_inter_item_correlation`], plus `DegenerateInput` when the
/// denominator vanishes.
pub fn standardized_alpha(data: &ResponseMatrix) -> Result<f64> {
    let r_bar = average_inter_item_correlation(data)?.mean;
    let kf = data.n_items() as f64;
    let denom = 1.0 + (kf - 1.0) * r_bar;
    if denom.abs() < 1e-12 {
        return Err(ReliabilityError::degenerate(
            "standardized alpha denominator is zero",
        ));
    }
    Ok(kf * r_bar / denom)
}

/// Alpha recomputed with each item dropped in turn.
///
/// # Errors
///
/// `ShapeMismatch` if fewer than 3 items (dropping one must leave two), or
/// any error from [`cronbach_alpha`] on a reduced matrix.
pub fn alpha_if_deleted(data: &ResponseMatrix) -> Result<Vec<ItemScore>> {
    let k = data.n_items();
    if k < 3 {
        return Err(ReliabilityError::shape_mismatch(format!(
            "alpha-if-deleted needs at least 3 items, got {k}"
        )));
    }

    data.item_names()
        .iter()
        .enumerate()
        .map(|(i, name)| -> Result<ItemScore> {
            let reduced = data.without_index(i)?;
            Ok(ItemScore::new(name.clone(), cronbach_alpha(&reduced)?))
        })
        .collect()
}

/// Raw alpha, standardized alpha and (for k ≥ 3) alpha-if-item-deleted.
pub fn alpha_summary(data: &ResponseMatrix) -> Result<AlphaResult> {
    let raw = cronbach_alpha(data)?;
    let standardized = standardized_alpha(data)?;
    let if_deleted = if data.n_items() >= 3 {
        Some(alpha_if_deleted(data)?)
    } else {
        None
    };
    Ok(AlphaResult {
        raw,
        standardized,
        if_deleted,
    })
}

fn sample_variance(v: &[f64]) -> Result<f64> {
    stats::variance(v).ok_or_else(|| ReliabilityError::degenerate("variance undefined"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::lookup;
    use crate::test_data::{one_factor, one_factor_with_noise_item};

    #[test]
    fn known_value() {
        // Item variances 2.5 each; total [4,6,9,12,14] has variance 17.
        let data = ResponseMatrix::from_columns(
            ["a", "b", "c"],
            vec![
                vec![1.0, 2.0, 3.0, 4.0, 5.0],
                vec![2.0, 1.0, 4.0, 3.0, 5.0],
                vec![1.0, 3.0, 2.0, 5.0, 4.0],
            ],
        )
        .unwrap();
        let alpha = cronbach_alpha(&data).unwrap();
        let expected = 1.5 * (1.0 - 7.5 / 17.0);
        assert!((alpha - expected).abs() < 1e-12, "alpha = {alpha}, expected {expected}");
    }

    #[test]
    fn identical_items_give_unit_alpha() {
        let col = vec![1.0, 4.0, 2.0, 5.0, 3.0];
        let data = ResponseMatrix::from_columns(["a", "b", "c"], vec![col.clone(), col.clone(), col])
            .unwrap();
        assert!((cronbach_alpha(&data).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_alpha_is_not_clamped() {
        let data = ResponseMatrix::from_columns(
            ["a", "b"],
            vec![vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![4.0, 5.0, 2.0, 1.0, 1.5]],
        )
        .unwrap();
        let alpha = cronbach_alpha(&data).unwrap();
        let expected = 2.0 * (1.0 - (2.5 + 2.95) / 0.95);
        assert!(alpha < 0.0, "alpha = {alpha}");
        assert!((alpha - expected).abs() < 1e-10);
    }

    #[test]
    fn constant_total_is_degenerate() {
        // Mirror-image items sum to a constant.
        let data = ResponseMatrix::from_columns(
            ["a", "b"],
            vec![vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![5.0, 4.0, 3.0, 2.0, 1.0]],
        )
        .unwrap();
        let err = cronbach_alpha(&data).unwrap_err();
        assert!(err.to_string().contains("total score"), "{err}");
    }

    #[test]
    fn constant_column_is_degenerate() {
        let data = ResponseMatrix::from_columns(
            ["a", "b", "c"],
            vec![
                vec![1.0, 2.0, 3.0, 4.0],
                vec![2.0, 3.0, 3.0, 5.0],
                vec![3.0, 3.0, 3.0, 3.0],
            ],
        )
        .unwrap();
        let err = cronbach_alpha(&data).unwrap_err();
        assert!(matches!(err, ReliabilityError::DegenerateInput { .. }));
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn too_few_items_or_rows() {
        let one = ResponseMatrix::from_columns(["a"], vec![vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            cronbach_alpha(&one),
            Err(ReliabilityError::ShapeMismatch { .. })
        ));
        let one_row = ResponseMatrix::new(["a", "b"], vec![vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            cronbach_alpha(&one_row),
            Err(ReliabilityError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn standardized_close_to_raw_for_parallel_items() {
        let data = one_factor(400, 6, 1.0, 21);
        let raw = cronbach_alpha(&data).unwrap();
        let std = standardized_alpha(&data).unwrap();
        assert!((raw - std).abs() < 0.05, "raw {raw} vs standardized {std}");
    }

    #[test]
    fn dropping_noise_item_raises_alpha() {
        let data = one_factor_with_noise_item(300, 5, 0.7, 5);
        let full = cronbach_alpha(&data).unwrap();
        let dropped = alpha_if_deleted(&data).unwrap();
        assert_eq!(dropped.len(), 5);
        assert!(lookup(&dropped, "q5").unwrap() > full);
        assert!(lookup(&dropped, "q1").unwrap() < full);
    }

    #[test]
    fn summary_omits_if_deleted_for_two_items() {
        let data = one_factor(50, 2, 1.0, 1);
        let summary = alpha_summary(&data).unwrap();
        assert!(summary.if_deleted.is_none());
        let data = one_factor(50, 3, 1.0, 1);
        assert_eq!(alpha_summary(&data).unwrap().if_deleted.map(|v| v.len()), Some(3));
    }
}
