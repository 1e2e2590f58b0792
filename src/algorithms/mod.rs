use crate::{DVector, Float, PI};

/// Module containing the random-forest surrogate adapter.
pub mod forest;
/// Module containing the Gaussian-process surrogate adapter.
pub mod gaussian_process;
/// Module containing the gradient-boosted-tree surrogate adapter.
pub mod gbrt;
/// Module containing pure random search.
pub mod random_search;
/// Module containing the tree-structured Parzen estimator adapter.
pub mod tpe;
/// Module containing the regression tree underlying the tree-ensemble adapters.
pub mod tree;

pub use forest::{Forest, ForestConfig};
pub use gaussian_process::{GaussianProcess, GpConfig};
pub use gbrt::{Gbrt, GbrtConfig};
pub use random_search::RandomSearch;
pub use tpe::{Tpe, TpeConfig};
pub use tree::RegressionTree;

/// The cumulative distribution function of the standard normal distribution.
pub(crate) fn normal_cdf(z: Float) -> Float {
    0.5 * (1.0 + spec_math::Erf::erf(&(f64::from(z) / std::f64::consts::SQRT_2)) as Float)
}

/// The probability density function of the standard normal distribution.
pub(crate) fn normal_pdf(z: Float) -> Float {
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
}

/// The expected improvement of a Gaussian posterior `(mean, sigma)` below the incumbent
/// `best`, for minimization, with exploration margin `xi`.
pub(crate) fn expected_improvement(mean: Float, sigma: Float, best: Float, xi: Float) -> Float {
    let improvement = best - xi - mean;
    if sigma <= Float::EPSILON {
        return improvement.max(0.0);
    }
    let z = improvement / sigma;
    improvement.mul_add(normal_cdf(z), sigma * normal_pdf(z))
}

/// The lowest observation and where it was made, keeping the earliest among exact ties.
pub(crate) fn best_observation(
    xs: &[DVector<Float>],
    ys: &[Float],
) -> Option<(DVector<Float>, Float)> {
    let mut best: Option<(usize, Float)> = None;
    for (i, &y) in ys.iter().enumerate() {
        match best {
            Some((_, incumbent)) if incumbent <= y => {}
            _ => best = Some((i, y)),
        }
    }
    best.map(|(i, y)| (xs[i].clone(), y))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_normal_cdf() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-10);
        assert_relative_eq!(normal_cdf(1.96), 0.975_002_1, epsilon = 1e-5);
        assert_relative_eq!(normal_cdf(-1.96), 0.024_997_9, epsilon = 1e-5);
    }

    #[test]
    fn test_normal_pdf() {
        assert_relative_eq!(normal_pdf(0.0), 0.398_942_3, epsilon = 1e-5);
        assert_relative_eq!(normal_pdf(1.0), normal_pdf(-1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_expected_improvement() {
        // no variance, candidate below the incumbent
        assert_relative_eq!(
            expected_improvement(0.0, 0.0, 1.0, 0.0),
            1.0,
            epsilon = 1e-12
        );
        // no variance, candidate above the incumbent
        assert_eq!(expected_improvement(2.0, 0.0, 1.0, 0.0), 0.0);
        // a known value: mean 0, sigma 1, incumbent 1
        assert_relative_eq!(
            expected_improvement(0.0, 1.0, 1.0, 0.0),
            1.083_315_5,
            epsilon = 1e-5
        );
        // more uncertainty never hurts a candidate
        assert!(
            expected_improvement(0.5, 2.0, 1.0, 0.0) > expected_improvement(0.5, 1.0, 1.0, 0.0)
        );
    }

    #[test]
    fn test_best_observation_keeps_earliest_tie() {
        let xs = vec![
            DVector::from_vec(vec![0.0]),
            DVector::from_vec(vec![1.0]),
            DVector::from_vec(vec![2.0]),
        ];
        let (x, y) = best_observation(&xs, &[3.0, 1.0, 1.0]).unwrap();
        assert_eq!(x, xs[1]);
        assert_eq!(y, 1.0);
        assert!(best_observation(&xs, &[]).is_none());
    }
}
