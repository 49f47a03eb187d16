//! One-factor model fitting.
//!
//! Composite reliability needs standardized loadings from a single-factor
//! model. Fitting is a capability behind [`FactorModelFitter`]: any factor
//! analysis or SEM routine can satisfy it, and closures with the matching
//! signature implement it directly.
//!
//! [`PrincipalAxisFitter`] is a small built-in implementation: iterated
//! principal-axis factoring of the item correlation matrix, extracting one
//! factor.
//!
//! # References
//!
//! - Harman, H.H. (1976). *Modern Factor Analysis*, 3rd ed., Chapter 8.
//! - Golub, G.H. & Van Loan, C.F. (2013). *Matrix Computations*, 4th ed.,
//!   §8.2 (power method).

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use u_numflow::matrix::Matrix;

use super::loadings::FactorLoadings;
use crate::correlation::correlation_matrix;
use crate::data::ResponseMatrix;
use crate::error::{ReliabilityError, Result};

/// Items that load on a single latent factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneFactorModel {
    /// Indicator item names.
    pub items: Vec<String>,
}

impl OneFactorModel {
    /// Model with the given indicators.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Model in which every item of `data` loads on the factor.
    pub fn all_items(data: &ResponseMatrix) -> Self {
        Self {
            items: data.item_names().to_vec(),
        }
    }
}

/// Produces standardized loadings for a one-factor model.
pub trait FactorModelFitter {
    /// Fits `model` to `data` and returns one loading per model item.
    fn fit(&self, data: &ResponseMatrix, model: &OneFactorModel) -> Result<FactorLoadings>;
}

impl<F> FactorModelFitter for F
where
    F: Fn(&ResponseMatrix, &OneFactorModel) -> Result<FactorLoadings>,
{
    fn fit(&self, data: &ResponseMatrix, model: &OneFactorModel) -> Result<FactorLoadings> {
        self(data, model)
    }
}

/// Iterated principal-axis factoring with one factor.
///
/// # Algorithm
///
/// 1. R = item correlation matrix; initial communalities h²ᵢ = maxⱼ |rᵢⱼ|.
/// 2. Replace the diagonal of R with h² and take its leading eigenpair
///    (λ, v) by power iteration.
/// 3. Loadings = v·√λ; new communalities h²ᵢ = loadingᵢ².
/// 4. Repeat 2–3 until the largest communality change is below `tolerance`.
///
/// Loadings are oriented so their sum is non-negative.
///
/// # Examples
///
/// ```
/// use u_reliability::composite::{FactorModelFitter, OneFactorModel, PrincipalAxisFitter};
/// use u_reliability::data::ResponseMatrix;
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
/// let loadings = PrincipalAxisFitter::default()
///     .fit(&data, &OneFactorModel::all_items(&data))
///     .unwrap();
/// assert_eq!(loadings.len(), 4);
/// assert!(loadings.values().iter().all(|l| *l > 0.5 && *l < 1.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipalAxisFitter {
    /// Maximum communality iterations; at least 1.
    pub max_iterations: usize,
    /// Convergence threshold on the largest communality change; finite and
    /// positive.
    pub tolerance: f64,
}

impl Default for PrincipalAxisFitter {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-8,
        }
    }
}

const POWER_MAX_ITER: usize = 2_000;
const POWER_TOL: f64 = 1e-13;
// Loadings this close to ±1 are rounding noise, not Heywood cases.
const UNIT_SLACK: f64 = 1e-9;

impl PrincipalAxisFitter {
    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(ReliabilityError::invalid_data(
                "principal axis fitter needs max_iterations >= 1",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(ReliabilityError::invalid_data(format!(
                "principal axis tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl FactorModelFitter for PrincipalAxisFitter {
    fn fit(&self, data: &ResponseMatrix, model: &OneFactorModel) -> Result<FactorLoadings> {
        self.validate()?;
        if model.items.len() < 3 {
            return Err(ReliabilityError::shape_mismatch(format!(
                "one-factor model needs at least 3 indicators, got {}",
                model.items.len()
            )));
        }
        let sub = data.select(&model.items)?;
        let corr = correlation_matrix(&sub)?;
        let p = corr.size();

        let mut h2: Vec<f64> = (0..p)
            .map(|i| {
                (0..p)
                    .filter_map(|j| corr.get(i, j))
                    .fold(0.0_f64, |m, r| m.max(r.abs()))
            })
            .collect();

        let mut loadings = vec![0.0; p];
        let mut converged = false;
        for iter in 0..self.max_iterations {
            let mut cells = vec![0.0; p * p];
            for i in 0..p {
                for j in 0..p {
                    cells[i * p + j] = corr.get(i, j).unwrap_or(h2[i]);
                }
            }
            let reduced = Matrix::new(p, p, cells)
                .map_err(|_| ReliabilityError::shape_mismatch("reduced correlation matrix"))?;

            let (eigenvalue, vector) = leading_eigenpair(&reduced, p)?;
            if eigenvalue <= 0.0 {
                return Err(ReliabilityError::degenerate(format!(
                    "leading eigenvalue {eigenvalue} is not positive"
                )));
            }

            let scale = eigenvalue.sqrt();
            let mut delta = 0.0_f64;
            for i in 0..p {
                loadings[i] = vector[i] * scale;
                let next = loadings[i] * loadings[i];
                delta = delta.max((next - h2[i]).abs());
                h2[i] = next;
            }
            trace!(iter, eigenvalue, delta, "principal axis iteration");

            if delta < self.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                max_iterations = self.max_iterations,
                "principal axis factoring did not converge"
            );
        }

        if loadings.iter().sum::<f64>() < 0.0 {
            loadings.iter_mut().for_each(|l| *l = -*l);
        }

        for (name, l) in corr.item_names().iter().zip(loadings.iter_mut()) {
            if l.abs() > 1.0 + UNIT_SLACK {
                warn!(item = %name, loading = *l, "Heywood case");
                return Err(ReliabilityError::invalid_loadings(format!(
                    "Heywood case: loading for '{name}' is {l}"
                )));
            }
            *l = l.clamp(-1.0, 1.0);
        }

        debug!(items = p, converged, "one-factor loadings");
        FactorLoadings::new(corr.item_names().iter().cloned().zip(loadings))
    }
}

/// Leading eigenvalue and unit eigenvector of a symmetric matrix by power
/// iteration.
fn leading_eigenpair(m: &Matrix, p: usize) -> Result<(f64, Vec<f64>)> {
    let mut v = vec![1.0 / (p as f64).sqrt(); p];
    let mut eigenvalue = 0.0;

    for _ in 0..POWER_MAX_ITER {
        let w = m
            .mul_vec(&v)
            .map_err(|_| ReliabilityError::shape_mismatch("eigenvector length"))?;
        let norm = w.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm < 1e-300 {
            return Err(ReliabilityError::degenerate(
                "reduced correlation matrix is null",
            ));
        }

        let rayleigh: f64 = v.iter().zip(&w).map(|(a, b)| a * b).sum();
        let next: Vec<f64> = w.iter().map(|x| x / norm).collect();
        let change = next
            .iter()
            .zip(&v)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);

        v = next;
        eigenvalue = rayleigh;
        if change < POWER_TOL {
            break;
        }
    }

    Ok((eigenvalue, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::composite_reliability;
    use crate::consistency::cronbach_alpha;
    use crate::test_data::one_factor;

    #[test]
    fn recovers_parallel_loadings() {
        // Loadings for f + 0.5·e with unit-variance f, e: 1/√1.25 ≈ 0.894
        let data = one_factor(600, 4, 0.5, 17);
        let loadings = PrincipalAxisFitter::default()
            .fit(&data, &OneFactorModel::all_items(&data))
            .unwrap();
        for l in loadings.values() {
            assert!((l - 0.894).abs() < 0.06, "loading {l}");
        }
    }

    #[test]
    fn omega_tracks_alpha_for_parallel_items() {
        let data = one_factor(600, 5, 1.0, 9);
        let loadings = PrincipalAxisFitter::default()
            .fit(&data, &OneFactorModel::all_items(&data))
            .unwrap();
        let omega = composite_reliability(&loadings).unwrap();
        let alpha = cronbach_alpha(&data).unwrap();
        assert!((omega - alpha).abs() < 0.03, "omega {omega} vs alpha {alpha}");
    }

    #[test]
    fn reversed_item_gets_negative_loading() {
        let base = one_factor(400, 4, 0.7, 3);
        let mut cols = base.columns().to_vec();
        cols[3].iter_mut().for_each(|v| *v = 6.0 - *v);
        let data = ResponseMatrix::from_columns(base.item_names().to_vec(), cols).unwrap();

        let loadings = PrincipalAxisFitter::default()
            .fit(&data, &OneFactorModel::all_items(&data))
            .unwrap();
        assert!(loadings.get("q4").unwrap() < 0.0);
        assert!(loadings.get("q1").unwrap() > 0.0);
        assert!(loadings.values().iter().sum::<f64>() > 0.0);
    }

    #[test]
    fn identical_items_load_at_one() {
        let col = vec![1.0, 3.0, 2.0, 5.0, 4.0, 2.0];
        let data = ResponseMatrix::from_columns(
            ["a", "b", "c"],
            vec![col.clone(), col.clone(), col],
        )
        .unwrap();
        let loadings = PrincipalAxisFitter::default()
            .fit(&data, &OneFactorModel::all_items(&data))
            .unwrap();
        for l in loadings.values() {
            assert!((l - 1.0).abs() < 1e-6, "loading {l}");
        }
    }

    #[test]
    fn subset_model_uses_named_items_only() {
        let data = one_factor(200, 6, 1.0, 2);
        let model = OneFactorModel::new(["q2", "q4", "q6"]);
        let loadings = PrincipalAxisFitter::default().fit(&data, &model).unwrap();
        assert_eq!(loadings.items().collect::<Vec<_>>(), vec!["q2", "q4", "q6"]);
    }

    #[test]
    fn model_errors() {
        let data = one_factor(50, 4, 1.0, 2);
        let small = OneFactorModel::new(["q1", "q2"]);
        assert!(matches!(
            PrincipalAxisFitter::default().fit(&data, &small),
            Err(ReliabilityError::ShapeMismatch { .. })
        ));
        let unknown = OneFactorModel::new(["q1", "q2", "zz"]);
        assert!(matches!(
            PrincipalAxisFitter::default().fit(&data, &unknown),
            Err(ReliabilityError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn closures_are_fitters() {
        let fixed = |_: &ResponseMatrix, m: &OneFactorModel| {
            FactorLoadings::new(m.items.iter().map(|i| (i.clone(), 0.7)))
        };
        let data = one_factor(20, 4, 1.0, 2);
        let loadings = fixed.fit(&data, &OneFactorModel::all_items(&data)).unwrap();
        assert!((composite_reliability(&loadings).unwrap() - 0.7937).abs() < 1e-3);
    }

    #[test]
    fn unusable_config_is_rejected() {
        let data = one_factor(100, 4, 1.0, 3);
        let model = OneFactorModel::all_items(&data);
        let bad = [
            PrincipalAxisFitter {
                max_iterations: 0,
                ..PrincipalAxisFitter::default()
            },
            PrincipalAxisFitter {
                tolerance: 0.0,
                ..PrincipalAxisFitter::default()
            },
            PrincipalAxisFitter {
                tolerance: -1e-6,
                ..PrincipalAxisFitter::default()
            },
            PrincipalAxisFitter {
                tolerance: f64::NAN,
                ..PrincipalAxisFitter::default()
            },
        ];
        for fitter in bad {
            let err = fitter.fit(&data, &model).unwrap_err();
            assert!(
                matches!(err, ReliabilityError::InvalidData { .. }),
                "{fitter:?}: {err}"
            );
        }

        let from_json: PrincipalAxisFitter =
            serde_json::from_str(r#"{"max_iterations": 0}"#).unwrap();
        assert!(from_json.fit(&data, &model).is_err());
    }

    #[test]
    fn unconverged_fit_returns_last_iterate() {
        let data = one_factor(100, 4, 1.0, 3);
        let fitter = PrincipalAxisFitter {
            max_iterations: 1,
            tolerance: f64::MIN_POSITIVE,
        };
        let loadings = fitter.fit(&data, &OneFactorModel::all_items(&data)).unwrap();
        assert_eq!(loadings.len(), 4);
        for l in loadings.values() {
            assert!(l > 0.5 && l < 1.0, "loading {l}");
        }
        assert!(composite_reliability(&loadings).unwrap() > 0.5);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let f: PrincipalAxisFitter = serde_json::from_str(r#"{"max_iterations": 10}"#).unwrap();
        assert_eq!(f.max_iterations, 10);
        assert_eq!(f.tolerance, PrincipalAxisFitter::default().tolerance);
    }
}
