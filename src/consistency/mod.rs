//! Classical internal-consistency estimators.
//!
//! All estimators are pure functions of a [`ResponseMatrix`](crate::data::ResponseMatrix)
//! snapshot. Variances are sample (N−1) estimates throughout.
//!
//! # Estimators
//!
//! - [`average_inter_item_correlation`] — mean off-diagonal Pearson r
//! - [`average_item_total_correlation`] — item vs. total score (inclusive or
//!   corrected)
//! - [`cronbach_alpha`] — Cronbach (1951), plus standardized alpha and
//!   alpha-if-item-deleted
//! - [`split_half`] — split-half correlation with Spearman–Brown correction
//!
//! # References
//!
//! - Cronbach, L.J. (1951). "Coefficient alpha and the internal structure of
//!   tests", *Psychometrika* 16(3), pp. 297-334.
//! - Spearman, C. (1910). "Correlation calculated from faulty data",
//!   *British Journal of Psychology* 3(3), pp. 271-295.
//! - Brown, W. (1910). "Some experimental results in the correlation of
//!   mental abilities", *British Journal of Psychology* 3(3), pp. 296-322.

mod alpha;
mod inter_item;
mod item_total;
mod split_half;

pub use alpha::{alpha_if_deleted, alpha_summary, cronbach_alpha, standardized_alpha, AlphaResult};
pub use inter_item::{average_inter_item_correlation, InterItemResult};
pub use item_total::{average_item_total_correlation, ItemTotalOptions, ItemTotalResult};
pub use split_half::{
    spearman_brown, split_half, split_half_with, PartitionRule, SplitHalfOptions,
    SplitHalfResult,
};
