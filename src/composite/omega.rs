//! Composite reliability (McDonald's omega) from one-factor loadings.
//!
//! # Algorithm
//!
//! ```text
//! θᵢ = 1 − λᵢ²
//! ω  = (Σ λᵢ)² / ((Σ λᵢ)² + Σ θᵢ)
//! ```
//!
//! # References
//!
//! - McDonald, R.P. (1999). *Test Theory: A Unified Treatment*. Erlbaum.
//! - Raykov, T. (1997). "Estimation of composite reliability for congeneric
//!   measures", *Applied Psychological Measurement* 21(2), pp. 173-184.

use tracing::debug;

use super::loadings::{check_loading, FactorLoadings};
use crate::error::{ReliabilityError, Result};

/// Composite reliability of a validated loadings map.
///
/// # Errors
///
/// `DegenerateInput` if the denominator is zero, which only happens when
/// every loading is ±1 and they cancel.
///
/// # Examples
///
/// ```
/// use u_reliability::composite::{composite_reliability, FactorLoadings};
///
/// let l = FactorLoadings::new([("a", 0.7), ("b", 0.7), ("c", 0.7), ("d", 0.7)]).unwrap();
/// let omega = composite_reliability(&l).unwrap();
/// assert!((omega - 0.7937).abs() < 1e-3);
/// ```
pub fn composite_reliability(loadings: &FactorLoadings) -> Result<f64> {
    omega_of(&loadings.values())
}

/// Composite reliability from bare loading values.
///
/// # Errors
///
/// `InvalidLoadings` if `values` is empty or any value is non-finite or
/// outside [-1, 1]; otherwise as [`composite_reliability`].
pub fn composite_reliability_from_values(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(ReliabilityError::invalid_loadings("no loadings supplied"));
    }
    for (i, &v) in values.iter().enumerate() {
        check_loading(&format!("#{i}"), v)?;
    }
    omega_of(values)
}

fn omega_of(values: &[f64]) -> Result<f64> {
    let sum: f64 = values.iter().sum();
    let common = sum * sum;
    let unique: f64 = values.iter().map(|l| 1.0 - l * l).sum();

    let denom = common + unique;
    if denom.abs() < 1e-300 {
        return Err(ReliabilityError::degenerate(
            "omega denominator is zero: loadings cancel with no residual variance",
        ));
    }

    let omega = common / denom;
    debug!(items = values.len(), omega, "composite reliability");
    Ok(omega)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn order_independent(mut values in proptest::collection::vec(0.05_f64..0.95, 2..12)) {
            let a = composite_reliability_from_values(&values).unwrap();
            values.reverse();
            let b = composite_reliability_from_values(&values).unwrap();
            prop_assert!((a - b).abs() < 1e-12);
        }

        #[test]
        fn positive_loadings_stay_in_unit_interval(
            values in proptest::collection::vec(0.0_f64..=1.0, 1..12)
        ) {
            let omega = composite_reliability_from_values(&values).unwrap();
            prop_assert!((0.0..=1.0 + 1e-12).contains(&omega), "omega = {omega}");
        }
    }
}
