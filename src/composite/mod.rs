//! Composite (omega) reliability.
//!
//! Omega is computed from standardized one-factor loadings, which come from
//! any [`FactorModelFitter`]. The crate ships [`PrincipalAxisFitter`]; full
//! confirmatory factor analysis is left to dedicated SEM software, whose
//! output can be wrapped in [`FactorLoadings`] directly.

mod fitter;
mod loadings;
mod omega;

pub use fitter::{FactorModelFitter, OneFactorModel, PrincipalAxisFitter};
pub use loadings::FactorLoadings;
pub use omega::{composite_reliability, composite_reliability_from_values};
