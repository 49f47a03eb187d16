//! Full reliability analysis of one scale.
//!
//! [`analyze`] runs every estimator against the same response matrix and
//! collects the results in a serializable [`ReliabilityReport`]. Each
//! estimator is independent; the first failure is returned.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::composite::{composite_reliability, FactorLoadings, FactorModelFitter, OneFactorModel};
use crate::consistency::{
    alpha_summary, average_inter_item_correlation, average_item_total_correlation, split_half,
    AlphaResult, InterItemResult, ItemTotalOptions, ItemTotalResult, SplitHalfOptions,
    SplitHalfResult,
};
use crate::data::ResponseMatrix;
use crate::error::{ReliabilityError, Result};

/// Options for a full analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliabilityConfig {
    /// Item-total correlation options.
    pub item_total: ItemTotalOptions,
    /// Split-half options.
    pub split_half: SplitHalfOptions,
}

/// Omega together with the loadings it was computed from.
#[derive(Debug, Clone, Serialize)]
pub struct OmegaResult {
    /// Standardized loadings from the fitter.
    pub loadings: FactorLoadings,
    /// Composite reliability.
    pub omega: f64,
}

/// All internal-consistency estimates for one scale.
#[derive(Debug, Clone, Serialize)]
pub struct ReliabilityReport {
    /// Number of items analysed.
    pub items: usize,
    /// Number of respondents.
    pub respondents: usize,
    /// Average inter-item correlation.
    pub inter_item: InterItemResult,
    /// Average item-total correlation.
    pub item_total: ItemTotalResult,
    /// Cronbach's alpha and companions.
    pub alpha: AlphaResult,
    /// Split-half reliability.
    pub split_half: SplitHalfResult,
    /// Composite reliability; `None` when no fitter was supplied.
    pub omega: Option<OmegaResult>,
}

/// Runs every estimator on `data`.
///
/// Omega is computed only when `fitter` is given; the fitter is asked for a
/// one-factor model over all items and must return a loading for exactly
/// those items.
///
/// # Errors
///
/// The first error from any estimator, or `ShapeMismatch` if the fitter's
/// item set differs from the data's.
///
/// # Examples
///
/// ```
/// use u_reliability::composite::PrincipalAxisFitter;
/// use u_reliability::data::ResponseMatrix;
/// use u_reliability::report::{analyze, ReliabilityConfig};
///
/// let data = ResponseMatrix::from_columns(
///     ["a", "b", "c", "d"],
///     vec![
///         vec![1.0, 4.0, 5.0, 2.0, 3.0, 5.0, 5.0, 5.0],
///         vec![3.0, 5.0, 5.0, 2.0, 4.0, 4.0, 3.0, 5.0],
///         vec![1.0, 5.0, 4.0, 2.0, 4.0, 5.0, 5.0, 5.0],
///         vec![3.0, 5.0, 5.0, 1.0, 2.0, 5.0, 5.0, 5.0],
///     ],
/// )
/// .unwrap();
///
/// let fitter = PrincipalAxisFitter::default();
/// let report = analyze(&data, &ReliabilityConfig::default(), Some(&fitter)).unwrap();
/// assert_eq!(report.items, 4);
/// assert!(report.alpha.raw > 0.9);
/// assert!(report.omega.is_some());
/// ```
pub fn analyze(
    data: &ResponseMatrix,
    config: &ReliabilityConfig,
    fitter: Option<&dyn FactorModelFitter>,
) -> Result<ReliabilityReport> {
    let inter_item = average_inter_item_correlation(data)?;
    let item_total = average_item_total_correlation(data, config.item_total)?;
    let alpha = alpha_summary(data)?;
    let split = split_half(data, &config.split_half)?;

    let omega = match fitter {
        Some(f) => {
            let loadings = f.fit(data, &OneFactorModel::all_items(data))?;
            check_alignment(data, &loadings)?;
            let omega = composite_reliability(&loadings)?;
            Some(OmegaResult { loadings, omega })
        }
        None => None,
    };

    info!(
        items = data.n_items(),
        respondents = data.n_respondents(),
        alpha = alpha.raw,
        split_half = split.adjusted,
        omega = ?omega.as_ref().map(|o| o.omega),
        "reliability analysis complete"
    );

    Ok(ReliabilityReport {
        items: data.n_items(),
        respondents: data.n_respondents(),
        inter_item,
        item_total,
        alpha,
        split_half: split,
        omega,
    })
}

fn check_alignment(data: &ResponseMatrix, loadings: &FactorLoadings) -> Result<()> {
    let expected: HashSet<&str> = data.item_names().iter().map(String::as_str).collect();
    let got: HashSet<&str> = loadings.items().collect();
    if expected != got {
        let mut missing: Vec<&str> = expected.difference(&got).copied().collect();
        let mut extra: Vec<&str> = got.difference(&expected).copied().collect();
        missing.sort_unstable();
        extra.sort_unstable();
        return Err(ReliabilityError::shape_mismatch(format!(
            "loadings do not match items (missing {missing:?}, extra {extra:?})"
        )));
    }
    Ok(())
}
