//! Correlation utilities for item analysis.
//!
//! Pearson correlation between item columns, the item × item correlation
//! matrix, and the person-level total score that item-total and split-half
//! estimators correlate against.
//!
//! # Examples
//!
//! ```
//! use u_reliability::correlation::{correlation_matrix, pearson_r};
//! use u_reliability::data::ResponseMatrix;
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let y = [2.0, 4.0, 6.0, 8.0, 10.0];
//! assert!((pearson_r(&x, &y).unwrap() - 1.0).abs() < 1e-10);
//!
//! let data = ResponseMatrix::from_columns(
//!     ["x", "y", "z"],
//!     vec![x.to_vec(), y.to_vec(), vec![5.0, 4.0, 3.0, 2.0, 1.0]],
//! )
//! .unwrap();
//! let mat = correlation_matrix(&data).unwrap();
//! assert!((mat.between("x", "z").unwrap() + 1.0).abs() < 1e-10);
//! assert!(mat.get(0, 0).is_none()); // diagonal is excluded
//! ```

use u_numflow::matrix::Matrix;
use u_numflow::stats;

use crate::data::ResponseMatrix;
use crate::error::{ReliabilityError, Result};

// ---------------------------------------------------------------------------
// Pearson
// ---------------------------------------------------------------------------

/// Computes the Pearson product-moment correlation coefficient.
///
/// # Algorithm
///
/// r = cov(x,y) / (σ_x · σ_y), using sample (N−1) moments throughout.
///
/// # Errors
///
/// - `ShapeMismatch` if the slices differ in length.
/// - `DegenerateInput` if there are fewer than 2 observations or either
///   variable has zero variance.
///
/// # References
///
/// Pearson (1895). "Note on regression and inheritance in the case of
/// two parents". Proceedings of the Royal Society of London, 58, 240–242.
pub fn pearson_r(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(ReliabilityError::shape_mismatch(format!(
            "cannot correlate {} observations with {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(ReliabilityError::degenerate(
            "correlation needs at least 2 observations",
        ));
    }

    let cov = stats::covariance(x, y)
        .ok_or_else(|| ReliabilityError::degenerate("covariance undefined"))?;
    let sx = nonzero_std_dev(x, "first variable")?;
    let sy = nonzero_std_dev(y, "second variable")?;

    Ok((cov / (sx * sy)).clamp(-1.0, 1.0))
}

fn nonzero_std_dev(v: &[f64], what: &str) -> Result<f64> {
    let s = stats::std_dev(v)
        .ok_or_else(|| ReliabilityError::degenerate(format!("{what}: standard deviation undefined")))?;
    if !s.is_finite() || s < 1e-300 {
        return Err(ReliabilityError::degenerate(format!("{what} has zero variance")));
    }
    Ok(s)
}

// ---------------------------------------------------------------------------
// Correlation Matrix
// ---------------------------------------------------------------------------

/// Symmetric item × item Pearson correlation matrix.
///
/// The diagonal is stored as 1.0 internally but is never exposed: a
/// self-correlation carries no information for reliability estimation, so
/// [`CorrelationMatrix::get`] returns `None` on the diagonal and every
/// averaging helper skips it.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    matrix: Matrix,
}

impl CorrelationMatrix {
    /// Number of items.
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Item names in matrix order.
    pub fn item_names(&self) -> &[String] {
        &self.names
    }

    /// Correlation between items `i` and `j`.
    ///
    /// `None` on the diagonal or when either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let p = self.size();
        if i == j || i >= p || j >= p {
            return None;
        }
        Some(self.matrix.get(i, j))
    }

    /// Correlation between two named items.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        self.get(i, j)
    }

    /// Mean correlation of item `i` with every other item.
    ///
    /// `None` if `i` is out of range or the matrix has a single item.
    pub fn mean_with_others(&self, i: usize) -> Option<f64> {
        let p = self.size();
        if i >= p || p < 2 {
            return None;
        }
        let sum: f64 = (0..p).filter_map(|j| self.get(i, j)).sum();
        Some(sum / (p - 1) as f64)
    }

    /// Mean of all off-diagonal correlations.
    pub fn mean_off_diagonal(&self) -> Option<f64> {
        let p = self.size();
        if p < 2 {
            return None;
        }
        let mut sum = 0.0;
        for i in 0..p {
            for j in (i + 1)..p {
                sum += self.matrix.get(i, j);
            }
        }
        Some(sum / (p * (p - 1) / 2) as f64)
    }
}

/// Computes the pairwise Pearson correlation matrix of all item columns.
///
/// # Errors
///
/// - `ShapeMismatch` if the matrix has fewer than 2 items.
/// - `DegenerateInput` if any item has zero variance or there are fewer
///   than 2 respondents.
pub fn correlation_matrix(data: &ResponseMatrix) -> Result<CorrelationMatrix> {
    let p = data.n_items();
    if p < 2 {
        return Err(ReliabilityError::shape_mismatch(format!(
            "correlation matrix needs at least 2 items, got {p}"
        )));
    }
    if data.n_respondents() < 2 {
        return Err(ReliabilityError::degenerate(
            "correlation matrix needs at least 2 respondents",
        ));
    }

    let columns = data.columns();
    let mut sds = Vec::with_capacity(p);
    for (name, col) in data.item_names().iter().zip(columns) {
        sds.push(nonzero_std_dev(col, &format!("item '{name}'"))?);
    }

    let mut cells = vec![0.0; p * p];
    for i in 0..p {
        cells[i * p + i] = 1.0;
        for j in (i + 1)..p {
            let cov = stats::covariance(&columns[i], &columns[j])
                .ok_or_else(|| ReliabilityError::degenerate("covariance undefined"))?;
            let r = (cov / (sds[i] * sds[j])).clamp(-1.0, 1.0);
            cells[i * p + j] = r;
            cells[j * p + i] = r;
        }
    }

    let matrix = Matrix::new(p, p, cells)
        .map_err(|_| ReliabilityError::shape_mismatch("correlation matrix dimensions"))?;

    Ok(CorrelationMatrix {
        names: data.item_names().to_vec(),
        matrix,
    })
}

// ---------------------------------------------------------------------------
// Total score
// ---------------------------------------------------------------------------

/// Row-wise mean across all items, or all items except `exclude`.
///
/// # Errors
///
/// `ShapeMismatch` if `exclude` names an unknown item or would leave no
/// items to average.
pub fn total_score(data: &ResponseMatrix, exclude: Option<&str>) -> Result<Vec<f64>> {
    let Some(name) = exclude else {
        return Ok(data.row_means());
    };

    let idx = data
        .index_of(name)
        .ok_or_else(|| ReliabilityError::shape_mismatch(format!("unknown item '{name}'")))?;
    if data.n_items() < 2 {
        return Err(ReliabilityError::shape_mismatch(format!(
            "excluding '{name}' leaves no items"
        )));
    }

    let k = (data.n_items() - 1) as f64;
    let sums = data.row_sums();
    let own = &data.columns()[idx];
    Ok(sums.iter().zip(own).map(|(s, v)| (s - v) / k).collect())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pearson_bounded_and_symmetric(
            data in proptest::collection::vec(-1e3_f64..1e3, 5..=40).prop_flat_map(|x| {
                let n = x.len();
                (Just(x), proptest::collection::vec(-1e3_f64..1e3, n..=n))
            })
        ) {
            let (x, y) = data;
            match (pearson_r(&x, &y), pearson_r(&y, &x)) {
                (Ok(a), Ok(b)) => {
                    prop_assert!((-1.0..=1.0).contains(&a), "r out of bounds: {a}");
                    prop_assert!((a - b).abs() < 1e-10, "not symmetric: {a} vs {b}");
                }
                (Err(_), Err(_)) => {}
                _ => prop_assert!(false, "one direction failed but not the other"),
            }
        }
    }
}
