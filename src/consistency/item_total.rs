//! Average item-total correlation.
//!
//! Each item is correlated with the respondent's total score (row mean). By
//! default the total includes the item itself, which inflates the estimate
//! relative to the corrected (leave-one-out) variant selected with
//! [`ItemTotalOptions::exclude_self`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::correlation::{pearson_r, total_score};
use crate::data::{lookup, ItemScore, ResponseMatrix};
use crate::error::{ReliabilityError, Result};

/// Options for [`average_item_total_correlation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTotalOptions {
    /// Correlate each item with the mean of the *other* items
    /// (corrected item-total correlation) instead of the full mean.
    pub exclude_self: bool,
}

/// Per-item and average item-total correlation.
#[derive(Debug, Clone, Serialize)]
pub struct ItemTotalResult {
    /// Correlation of each item with its total score.
    pub per_item: Vec<ItemScore>,
    /// Mean of the per-item correlations.
    pub mean: f64,
    /// Whether each item was left out of its own total.
    pub exclude_self: bool,
}

impl ItemTotalResult {
    /// Item-total correlation for the named item.
    pub fn item(&self, name: &str) -> Option<f64> {
        lookup(&self.per_item, name)
    }
}

/// Computes item-total correlations and their mean.
///
/// # Errors
///
/// - `ShapeMismatch` if `exclude_self` is set and there is only one item.
/// - `DegenerateInput` if an item or a total score has zero variance.
///
/// # Examples
///
/// ```
/// use u_reliability::consistency::{average_item_total_correlation, ItemTotalOptions};
/// use u_reliability::data::ResponseMatrix;
///
/// let data = ResponseMatrix::from_columns(
///     ["a", "b", "c"],
///     vec![
///         vec![1.0, 2.0, 3.0, 4.0, 5.0],
///         vec![1.0, 3.0, 2.0, 5.0, 4.0],
///         vec![2.0, 1.0, 3.0, 5.0, 4.0],
///     ],
/// )
/// .unwrap();
///
/// let inclusive = average_item_total_correlation(&data, ItemTotalOptions::default()).unwrap();
/// let corrected = average_item_total_correlation(
///     &data,
///     ItemTotalOptions { exclude_self: true },
/// )
/// .unwrap();
/// assert!(inclusive.mean > corrected.mean);
/// ```
pub fn average_item_total_correlation(
    data: &ResponseMatrix,
    options: ItemTotalOptions,
) -> Result<ItemTotalResult> {
    if options.exclude_self && data.n_items() < 2 {
        return Err(ReliabilityError::shape_mismatch(
            "corrected item-total correlation needs at least 2 items",
        ));
    }

    let inclusive_total = if options.exclude_self {
        None
    } else {
        Some(total_score(data, None)?)
    };

    let mut per_item = Vec::with_capacity(data.n_items());
    for (name, col) in data.item_names().iter().zip(data.columns()) {
        let r = match &inclusive_total {
            Some(total) => pearson_r(col, total),
            None => pearson_r(col, &total_score(data, Some(name))?),
        }
        .map_err(|e| match e {
            ReliabilityError::DegenerateInput { reason } => {
                ReliabilityError::degenerate(format!("item '{name}': {reason}"))
            }
            other => other,
        })?;
        per_item.push(ItemScore::new(name.clone(), r));
    }

    let mean = per_item.iter().map(|s| s.value).sum::<f64>() / per_item.len() as f64;
    debug!(
        items = data.n_items(),
        exclude_self = options.exclude_self,
        mean,
        "average item-total correlation"
    );

    Ok(ItemTotalResult {
        per_item,
        mean,
        exclude_self: options.exclude_self,
    })
}
