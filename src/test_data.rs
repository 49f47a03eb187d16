//! Deterministic synthetic questionnaires shared by unit tests.

use rand::distr::Open01;
use rand::RngExt;
use u_numflow::random::create_rng;
use u_numflow::special::inverse_normal_cdf;

use crate::data::ResponseMatrix;

/// Standard normal draw by inversion of an open-interval uniform.
pub(crate) fn standard_normal<R: RngExt>(rng: &mut R) -> f64 {
    inverse_normal_cdf(rng.sample(Open01))
}

/// `k` items driven by one common factor plus independent noise of
/// standard deviation `noise`.
pub(crate) fn one_factor(n: usize, k: usize, noise: f64, seed: u64) -> ResponseMatrix {
    let mut rng = create_rng(seed);
    let mut columns = vec![Vec::with_capacity(n); k];
    for _ in 0..n {
        let f = standard_normal(&mut rng);
        for col in columns.iter_mut() {
            col.push(3.0 + f + noise * standard_normal(&mut rng));
        }
    }
    let names: Vec<String> = (1..=k).map(|i| format!("q{i}")).collect();
    ResponseMatrix::from_columns(names, columns).expect("synthetic data is valid")
}

/// Same as [`one_factor`] but the last item is replaced with pure noise.
pub(crate) fn one_factor_with_noise_item(
    n: usize,
    k: usize,
    noise: f64,
    seed: u64,
) -> ResponseMatrix {
    let base = one_factor(n, k, noise, seed);
    let mut rng = create_rng(seed ^ 0x9e37_79b9_7f4a_7c15);
    let mut columns = base.columns().to_vec();
    if let Some(last) = columns.last_mut() {
        for v in last.iter_mut() {
            *v = 3.0 + standard_normal(&mut rng);
        }
    }
    ResponseMatrix::from_columns(base.item_names().to_vec(), columns)
        .expect("synthetic data is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_data() {
        assert_eq!(one_factor(20, 3, 1.0, 5), one_factor(20, 3, 1.0, 5));
        assert_ne!(one_factor(20, 3, 1.0, 5), one_factor(20, 3, 1.0, 6));
    }

    #[test]
    fn draws_are_finite() {
        let mut rng = create_rng(1);
        assert!((0..10_000).all(|_| standard_normal(&mut rng).is_finite()));
    }
}
