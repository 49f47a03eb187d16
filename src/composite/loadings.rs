//! Standardized factor loadings.

use std::collections::HashSet;

use serde::Serialize;

use crate::data::ItemScore;
use crate::error::{ReliabilityError, Result};

/// Standardized single-factor loadings keyed by item name.
///
/// Every loading is finite and in [-1, 1]; its residual (unique) variance
/// is `1 − λ²`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorLoadings {
    entries: Vec<ItemScore>,
}

impl FactorLoadings {
    /// Builds a loadings map from `(item, loading)` pairs.
    ///
    /// # Errors
    ///
    /// `InvalidLoadings` if there are no pairs, an item repeats, or a loading
    /// is non-finite or has absolute value above 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_reliability::composite::FactorLoadings;
    ///
    /// let l = FactorLoadings::new([("q1", 0.8), ("q2", 0.6)]).unwrap();
    /// assert_eq!(l.get("q2"), Some(0.6));
    /// assert!(FactorLoadings::new([("q1", 1.2)]).is_err());
    /// ```
    pub fn new<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let entries: Vec<ItemScore> = pairs
            .into_iter()
            .map(|(item, value)| ItemScore::new(item, value))
            .collect();

        if entries.is_empty() {
            return Err(ReliabilityError::invalid_loadings("no loadings supplied"));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for e in &entries {
            if !seen.insert(e.item.as_str()) {
                return Err(ReliabilityError::invalid_loadings(format!(
                    "duplicate loading for item '{}'",
                    e.item
                )));
            }
            check_loading(&e.item, e.value)?;
        }

        Ok(Self { entries })
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; construction rejects empty loadings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loading for the named item.
    pub fn get(&self, item: &str) -> Option<f64> {
        crate::data::lookup(&self.entries, item)
    }

    /// Item names in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.item.as_str())
    }

    /// Loading values in insertion order.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    /// Residual variance `1 − λ²` per item.
    pub fn residual_variances(&self) -> Vec<ItemScore> {
        self.entries
            .iter()
            .map(|e| ItemScore::new(e.item.clone(), 1.0 - e.value * e.value))
            .collect()
    }
}

pub(crate) fn check_loading(item: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ReliabilityError::invalid_loadings(format!(
            "loading for '{item}' is not finite"
        )));
    }
    if value.abs() > 1.0 {
        return Err(ReliabilityError::invalid_loadings(format!(
            "loading for '{item}' is {value}, outside [-1, 1]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_are_one_minus_square() {
        let l = FactorLoadings::new([("a", 0.7), ("b", -0.5), ("c", 1.0)]).unwrap();
        let res = l.residual_variances();
        assert!((res[0].value - 0.51).abs() < 1e-12);
        assert!((res[1].value - 0.75).abs() < 1e-12);
        assert!(res[2].value.abs() < 1e-12);
        assert_eq!(l.items().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn rejects_bad_input() {
        let empty: [(&str, f64); 0] = [];
        assert!(matches!(
            FactorLoadings::new(empty),
            Err(ReliabilityError::InvalidLoadings { .. })
        ));
        assert!(FactorLoadings::new([("a", -1.01)]).is_err());
        assert!(FactorLoadings::new([("a", f64::NAN)]).is_err());
        let dup = FactorLoadings::new([("a", 0.5), ("a", 0.6)]).unwrap_err();
        assert!(dup.to_string().contains("duplicate"));
    }
}
