//! # u-reliability
//!
//! Internal-consistency reliability for multi-item questionnaire scales.
//!
//! All estimators are pure functions over an immutable
//! [`ResponseMatrix`](data::ResponseMatrix) (respondents × named items,
//! already reverse-scored). They share no state and may run concurrently on
//! the same input.
//!
//! ## Modules
//!
//! - [`data`] — Response matrix (validated, named columns)
//! - [`correlation`] — Pearson r, item correlation matrix, total scores
//! - [`consistency`] — Inter-item and item-total correlation, Cronbach's
//!   alpha, split-half with Spearman–Brown correction
//! - [`composite`] — Omega from one-factor loadings, fitter interface,
//!   principal-axis fitter
//! - [`report`] — All estimators in one serializable report
//! - [`error`] — Error types
//!
//! ## Design Philosophy
//!
//! - **No silent fixes**: out-of-range results (alpha < 0 or > 1) are
//!   returned as computed; undefined quantities are errors
//! - **Sample moments**: every variance uses the N−1 estimator
//! - **Pluggable**: split-half scoring and factor fitting accept caller code
//!
//! ## Quick Start
//!
//! ```
//! use u_reliability::consistency::{cronbach_alpha, split_half, SplitHalfOptions};
//! use u_reliability::data::ResponseMatrix;
//!
//! let data = ResponseMatrix::from_columns(
//!     ["q1", "q2", "q3", "q4"],
//!     vec![
//!         vec![1.0, 4.0, 5.0, 2.0, 3.0, 5.0, 5.0, 5.0],
//!         vec![3.0, 5.0, 5.0, 2.0, 4.0, 4.0, 3.0, 5.0],
//!         vec![1.0, 5.0, 4.0, 2.0, 4.0, 5.0, 5.0, 5.0],
//!         vec![3.0, 5.0, 5.0, 1.0, 2.0, 5.0, 5.0, 5.0],
//!     ],
//! )
//! .unwrap();
//!
//! let alpha = cronbach_alpha(&data).unwrap();
//! let halves = split_half(&data, &SplitHalfOptions::default()).unwrap();
//! assert!(alpha > 0.9);
//! assert!(halves.adjusted > halves.r);
//! ```

pub mod composite;
pub mod consistency;
pub mod correlation;
pub mod data;
pub mod error;
pub mod report;

#[cfg(test)]
pub(crate) mod test_data;

pub use error::{ReliabilityError, Result};
