//! Average inter-item correlation.
//!
//! For each item, the mean of its Pearson correlations with every *other*
//! item; the grand mean is the average of those per-item means.

use serde::Serialize;
use tracing::debug;

use crate::correlation::correlation_matrix;
use crate::data::{lookup, ItemScore, ResponseMatrix};
use crate::error::{ReliabilityError, Result};

/// Per-item and overall average inter-item correlation.
#[derive(Debug, Clone, Serialize)]
pub struct InterItemResult {
    /// Mean correlation of each item with the remaining items.
    pub per_item: Vec<ItemScore>,
    /// Grand mean across items.
    pub mean: f64,
}

impl InterItemResult {
    /// Per-item mean for the named item.
    pub fn item(&self, name: &str) -> Option<f64> {
        lookup(&self.per_item, name)
    }
}

/// Computes the average inter-item correlation.
///
/// With exactly two items, each per-item mean is the single pairwise
/// correlation.
///
/// # Errors
///
/// - `ShapeMismatch` if fewer than 2 items.
/// - `DegenerateInput` if any item has zero variance.
///
/// # Examples
///
/// ```
/// use u_reliability::consistency::average_inter_item_correlation;
/// use u_reliability::data::ResponseMatrix;
///
/// let data = ResponseMatrix::from_columns(
///     ["a", "b"],
///     vec![vec![1.0, 2.0, 3.0, 4.0], vec![2.0, 1.0, 4.0, 3.0]],
/// )
/// .unwrap();
/// let r = average_inter_item_correlation(&data).unwrap();
/// assert!((r.mean - 0.6).abs() < 1e-10);
/// assert_eq!(r.item("a"), r.item("b"));
/// ```
pub fn average_inter_item_correlation(data: &ResponseMatrix) -> Result<InterItemResult> {
    let mat = correlation_matrix(data)?;

    let mut per_item = Vec::with_capacity(mat.size());
    for (i, name) in mat.item_names().iter().enumerate() {
        let m = mat.mean_with_others(i).ok_or_else(|| {
            ReliabilityError::shape_mismatch("inter-item correlation needs at least 2 items")
        })?;
        per_item.push(ItemScore::new(name.clone(), m));
    }

    let mean = per_item.iter().map(|s| s.value).sum::<f64>() / per_item.len() as f64;
    debug!(
        items = data.n_items(),
        respondents = data.n_respondents(),
        mean,
        "average inter-item correlation"
    );

    Ok(InterItemResult { per_item, mean })
}
