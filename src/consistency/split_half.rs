//! Split-half reliability with Spearman–Brown correction.
//!
//! # Algorithm
//!
//! 1. Partition items into two disjoint halves ([`PartitionRule`]).
//! 2. Score each respondent on each half with a scoring function (row mean
//!    by default, or any caller-supplied aggregation).
//! 3. Correlate the two half-scores: r.
//! 4. Step the correlation up to full test length:
//!
//! ```text
//! r_SB = 2r / (1 + r)
//! ```
//!
//! # References
//!
//! - Spearman, C. (1910). "Correlation calculated from faulty data",
//!   *British Journal of Psychology* 3(3), pp. 271-295.
//! - Brown, W. (1910). "Some experimental results in the correlation of
//!   mental abilities", *British Journal of Psychology* 3(3), pp. 296-322.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::correlation::pearson_r;
use crate::data::ResponseMatrix;
use crate::error::{ReliabilityError, Result};

/// How items are divided into two halves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PartitionRule {
    /// 1st, 3rd, 5th … items vs. 2nd, 4th, 6th … items.
    #[default]
    Alternate,
    /// First k/2 items vs. last k/2 items.
    FirstSecond,
    /// Caller-chosen halves by item name. May be unequal in size and need
    /// not cover every item.
    Explicit {
        /// Items scored as the first half.
        first: Vec<String>,
        /// Items scored as the second half.
        second: Vec<String>,
    },
}

impl PartitionRule {
    /// Resolves the rule against `data` into two lists of item names.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if a positional rule meets an odd item count (or fewer
    /// than 2 items), or explicit halves are empty, overlap, or name unknown
    /// items.
    pub fn halves(&self, data: &ResponseMatrix) -> Result<(Vec<String>, Vec<String>)> {
        let names = data.item_names();
        let k = names.len();

        match self {
            PartitionRule::Alternate | PartitionRule::FirstSecond => {
                if k < 2 || k % 2 != 0 {
                    return Err(ReliabilityError::shape_mismatch(format!(
                        "{k} items cannot be split into equal halves; supply an explicit partition"
                    )));
                }
            }
            PartitionRule::Explicit { .. } => {}
        }

        match self {
            PartitionRule::Alternate => {
                let first = names.iter().step_by(2).cloned().collect();
                let second = names.iter().skip(1).step_by(2).cloned().collect();
                Ok((first, second))
            }
            PartitionRule::FirstSecond => {
                let (a, b) = names.split_at(k / 2);
                Ok((a.to_vec(), b.to_vec()))
            }
            PartitionRule::Explicit { first, second } => {
                if first.is_empty() || second.is_empty() {
                    return Err(ReliabilityError::shape_mismatch(
                        "explicit partition has an empty half",
                    ));
                }
                let a: HashSet<&str> = first.iter().map(String::as_str).collect();
                if let Some(dup) = second.iter().find(|n| a.contains(n.as_str())) {
                    return Err(ReliabilityError::shape_mismatch(format!(
                        "item '{dup}' appears in both halves"
                    )));
                }
                for name in first.iter().chain(second) {
                    if data.index_of(name).is_none() {
                        return Err(ReliabilityError::shape_mismatch(format!(
                            "unknown item '{name}' in partition"
                        )));
                    }
                }
                Ok((first.clone(), second.clone()))
            }
        }
    }
}

/// Options for [`split_half`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitHalfOptions {
    /// Partitioning rule.
    pub rule: PartitionRule,
}

/// Split-half correlation and its Spearman–Brown corrected value.
#[derive(Debug, Clone, Serialize)]
pub struct SplitHalfResult {
    /// Items in the first half.
    pub first: Vec<String>,
    /// Items in the second half.
    pub second: Vec<String>,
    /// Pearson correlation between half scores.
    pub r: f64,
    /// Spearman–Brown corrected reliability, 2r / (1 + r).
    pub adjusted: f64,
}

/// Split-half reliability scoring each half by its row mean.
///
/// # Examples
///
/// ```
/// use u_reliability::consistency::{split_half, SplitHalfOptions};
/// use u_reliability::data::ResponseMatrix;
///
/// let data = ResponseMatrix::from_columns(
///     ["a", "b", "c", "d"],
///     vec![
///         vec![1.0, 2.0, 3.0, 4.0, 5.0],
///         vec![2.0, 1.0, 4.0, 3.0, 5.0],
///         vec![1.0, 3.0, 2.0, 5.0, 4.0],
///         vec![2.0, 2.0, 3.0, 4.0, 4.0],
///     ],
/// )
/// .unwrap();
/// let res = split_half(&data, &SplitHalfOptions::default()).unwrap();
/// assert_eq!(res.first, vec!["a", "c"]);
/// assert!((res.adjusted - 2.0 * res.r / (1.0 + res.r)).abs() < 1e-12);
/// ```
pub fn split_half(data: &ResponseMatrix, options: &SplitHalfOptions) -> Result<SplitHalfResult> {
    split_half_with(data, &options.rule, |half| Ok(half.row_means()))
}

/// Split-half reliability with a caller-supplied half scorer.
///
/// `scorer` receives the sub-matrix of one half and must return one score
/// per respondent.
///
/// # Errors
///
/// - `ShapeMismatch` from the partition rule, or if the scorer returns the
///   wrong number of scores.
/// - `DegenerateInput` if a half score has zero variance or r = −1.
/// - Any error returned by `scorer`.
pub fn split_half_with<F>(
    data: &ResponseMatrix,
    rule: &PartitionRule,
    scorer: F,
) -> Result<SplitHalfResult>
where
    F: Fn(&ResponseMatrix) -> Result<Vec<f64>>,
{
    let (first, second) = rule.halves(data)?;
    let n = data.n_respondents();

    let score = |names: &[String], label: &str| -> Result<Vec<f64>> {
        let scores = scorer(&data.select(names)?)?;
        if scores.len() != n {
            return Err(ReliabilityError::shape_mismatch(format!(
                "{label} half scorer returned {} scores for {n} respondents",
                scores.len()
            )));
        }
        if scores.iter().any(|v| !v.is_finite()) {
            return Err(ReliabilityError::degenerate(format!(
                "{label} half scorer returned a non-finite score"
            )));
        }
        Ok(scores)
    };

    let a = score(&first, "first")?;
    let b = score(&second, "second")?;

    let r = pearson_r(&a, &b)?;
    let adjusted = spearman_brown(r, 2.0)?;
    debug!(
        first = first.len(),
        second = second.len(),
        r,
        adjusted,
        "split-half reliability"
    );

    Ok(SplitHalfResult {
        first,
        second,
        r,
        adjusted,
    })
}

/// Spearman–Brown prophecy formula.
///
/// Predicted reliability when test length is multiplied by `length_factor`:
///
/// ```text
/// r* = n·r / (1 + (n − 1)·r)
/// ```
///
/// `length_factor = 2.0` gives the split-half correction.
///
/// # Errors
///
/// `DegenerateInput` if `r` is outside [-1, 1] or non-finite, `length_factor`
/// is not positive, or the denominator is zero (r = −1 for n = 2).
///
/// # Examples
///
/// ```
/// use u_reliability::consistency::spearman_brown;
///
/// assert!((spearman_brown(0.6, 2.0).unwrap() - 0.75).abs() < 1e-12);
/// assert!(spearman_brown(-1.0, 2.0).is_err());
/// ```
pub fn spearman_brown(r: f64, length_factor: f64) -> Result<f64> {
    if !r.is_finite() || !(-1.0..=1.0).contains(&r) {
        return Err(ReliabilityError::degenerate(format!(
            "correlation {r} outside [-1, 1]"
        )));
    }
    if !length_factor.is_finite() || length_factor <= 0.0 {
        return Err(ReliabilityError::degenerate(format!(
            "length factor {length_factor} must be positive"
        )));
    }

    let denom = 1.0 + (length_factor - 1.0) * r;
    if denom.abs() < 1e-12 {
        return Err(ReliabilityError::degenerate(
            "Spearman-Brown denominator is zero",
        ));
    }
    Ok(length_factor * r / denom)
}
