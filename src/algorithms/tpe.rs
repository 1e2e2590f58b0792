use fastrand::Rng;

use crate::{
    algorithms::best_observation,
    core::{utils::SampleFloat, SearchSpace},
    error::Error,
    traits::{MinimizeOptions, MinimizeReport, Minimizer, Objective},
    DVector, Float,
};

/// Settings for the [`Tpe`] adapter.
#[derive(Copy, Clone, Debug)]
pub struct TpeConfig {
    n_startup: usize,
    gamma: Float,
    n_candidates: usize,
}

impl TpeConfig {
    /// Create a new default configuration: 10 startup draws, a 25% split, and 24 candidates
    /// per proposal.
    pub const fn new() -> Self {
        Self {
            n_startup: 10,
            gamma: 0.25,
            n_candidates: 24,
        }
    }
    /// Set the number of uniform draws made before the density model takes over (default: 10).
    pub const fn with_n_startup(mut self, n_startup: usize) -> Self {
        self.n_startup = n_startup;
        self
    }
    /// Set the fraction of observations treated as "good" (default: 0.25).
    ///
    /// # Panics
    ///
    /// Panics if `gamma` is not strictly between zero and one.
    pub fn with_gamma(mut self, gamma: Float) -> Self {
        assert!(gamma > 0.0 && gamma < 1.0);
        self.gamma = gamma;
        self
    }
    /// Set the number of candidates scored per proposal (default: 24).
    ///
    /// # Panics
    ///
    /// Panics if `n_candidates` is zero.
    pub const fn with_n_candidates(mut self, n_candidates: usize) -> Self {
        assert!(n_candidates > 0);
        self.n_candidates = n_candidates;
        self
    }
}

impl Default for TpeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The tree-structured Parzen estimator[^1].
///
/// Observations are split into a "good" fraction $`\gamma`$ and the rest, each modeled by a
/// diagonal Gaussian kernel density estimate $`l(x)`$ and $`g(x)`$. Candidates are drawn by
/// perturbing good points with the kernel and the one maximizing
/// $`\log l(x) - \log g(x)`$ is queried next, which is equivalent to maximizing expected
/// improvement under the two-density model.
///
/// [^1]: [Bergstra, J., Bardenet, R., Bengio, Y., & Kégl, B. (2011). Algorithms for Hyper-Parameter Optimization. In Advances in Neural Information Processing Systems (Vol. 24). Curran Associates, Inc.](https://papers.nips.cc/paper/2011/hash/86e8f7ab32cfd12577bc2619bc635690-Abstract.html)
#[derive(Default, Copy, Clone, Debug)]
pub struct Tpe {
    config: TpeConfig,
}

impl Tpe {
    /// The call budget multiplier the comparison experiments give this adapter.
    pub const BUDGET_MULTIPLIER: usize = 10;

    /// Create a new adapter with the given configuration.
    pub const fn new(config: TpeConfig) -> Self {
        Self { config }
    }

    fn propose(
        &self,
        xs: &[DVector<Float>],
        ys: &[Float],
        space: &SearchSpace,
        rng: &mut Rng,
    ) -> DVector<Float> {
        let n = xs.len();
        let n_good = ((self.config.gamma * n as Float).ceil() as usize).clamp(1, n - 1);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| ys[a].total_cmp(&ys[b]));
        let good: Vec<&DVector<Float>> = order[..n_good].iter().map(|&i| &xs[i]).collect();
        let rest: Vec<&DVector<Float>> = order[n_good..].iter().map(|&i| &xs[i]).collect();
        let good_bandwidths = kde_bandwidths(&good, space);
        let rest_bandwidths = kde_bandwidths(&rest, space);
        let mut best: Option<(DVector<Float>, Float)> = None;
        for _ in 0..self.config.n_candidates {
            let center = good[rng.usize(0..good.len())];
            let candidate = space.clip(&DVector::from_iterator(
                space.dimension(),
                center
                    .iter()
                    .zip(&good_bandwidths)
                    .map(|(&c, &h)| rng.normal(c, h)),
            ));
            let score = kde_log_density(&candidate, &good, &good_bandwidths)
                - kde_log_density(&candidate, &rest, &rest_bandwidths);
            match &best {
                Some((_, incumbent)) if *incumbent >= score => {}
                _ => best = Some((candidate, score)),
            }
        }
        match best {
            Some((candidate, _)) => candidate,
            None => space.sample(rng),
        }
    }
}

impl Minimizer for Tpe {
    fn minimize(
        &mut self,
        objective: &mut dyn Objective,
        space: &SearchSpace,
        options: &MinimizeOptions,
    ) -> Result<MinimizeReport, Error> {
        let mut rng = Rng::with_seed(options.seed);
        let n_startup = self.config.n_startup.max(2);
        let mut xs: Vec<DVector<Float>> = Vec::with_capacity(options.max_calls);
        let mut ys: Vec<Float> = Vec::with_capacity(options.max_calls);
        for _ in 0..options.max_calls {
            let x = if xs.len() < n_startup {
                space.sample(&mut rng)
            } else {
                self.propose(&xs, &ys, space, &mut rng)
            };
            let y = objective.evaluate(&x)?;
            xs.push(x);
            ys.push(y);
        }
        let (x, fx) = best_observation(&xs, &ys).ok_or_else(|| Error::AlgorithmFailure {
            algorithm: "tpe".to_string(),
            message: "no evaluations were budgeted".to_string(),
        })?;
        Ok(MinimizeReport {
            x,
            fx,
            n_calls: options.max_calls,
        })
    }
}

/// Per-coordinate kernel bandwidths by Scott's rule, floored at a thousandth of each bound's
/// width so a degenerate set of points cannot collapse the kernel.
fn kde_bandwidths(points: &[&DVector<Float>], space: &SearchSpace) -> Vec<Float> {
    let m = points.len() as Float;
    let dim = space.dimension();
    let scott = m.powf(-1.0 / (dim as Float + 4.0));
    (0..dim)
        .map(|d| {
            let mean = points.iter().map(|p| p[d]).sum::<Float>() / m;
            let var = points.iter().map(|p| (p[d] - mean).powi(2)).sum::<Float>() / m;
            let width = space.bounds()[d].width();
            (var.sqrt() * scott).max(1e-3 * width)
        })
        .collect()
}

// the shared (2π)^{-d/2} normalization is dropped since it cancels in the density ratio
fn kde_log_density(x: &DVector<Float>, points: &[&DVector<Float>], bandwidths: &[Float]) -> Float {
    let log_terms: Vec<Float> = points
        .iter()
        .map(|point| {
            x.iter()
                .zip(point.iter())
                .zip(bandwidths)
                .map(|((&value, &center), &h)| {
                    let z = (value - center) / h;
                    (-0.5 * z).mul_add(z, -h.ln())
                })
                .sum::<Float>()
        })
        .collect();
    logsumexp::LogSumExp::ln_sum_exp(log_terms.iter()) - (points.len() as Float).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        benchmarks::Benchmark,
        core::InstrumentedObjective,
        traits::CostFunction,
    };

    struct Sphere;
    impl CostFunction for Sphere {
        fn evaluate(&self, x: &DVector<Float>) -> Float {
            x.iter().map(|v| v * v).sum()
        }
    }

    fn sphere_benchmark() -> Benchmark {
        Benchmark::new(
            "sphere",
            Sphere,
            SearchSpace::uniform(&[(-1.0, 1.0), (-1.0, 1.0)]),
            DVector::from_vec(vec![0.0, 0.0]),
            0.0,
        )
    }

    #[test]
    fn test_tpe_minimizes_a_sphere() {
        let benchmark = sphere_benchmark();
        let mut objective = InstrumentedObjective::new(&benchmark, 0.0, 0);
        let options = MinimizeOptions {
            max_calls: 30,
            seed: 0,
        };
        let report = Tpe::default()
            .minimize(&mut objective, benchmark.space(), &options)
            .unwrap();
        assert_eq!(report.n_calls, 30);
        assert_eq!(objective.n_evaluations(), 30);
        assert!(report.fx < 1.0);
        assert!(benchmark.space().contains(&report.x));
    }

    #[test]
    fn test_tpe_is_deterministic() {
        let benchmark = sphere_benchmark();
        let options = MinimizeOptions {
            max_calls: 25,
            seed: 5,
        };
        let mut first = InstrumentedObjective::new(&benchmark, 0.05, 9);
        let a = Tpe::default()
            .minimize(&mut first, benchmark.space(), &options)
            .unwrap();
        let mut second = InstrumentedObjective::new(&benchmark, 0.05, 9);
        let b = Tpe::default()
            .minimize(&mut second, benchmark.space(), &options)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(first.trace(), second.trace());
    }

    #[test]
    fn test_kde_log_density_prefers_nearby_points() {
        let space = SearchSpace::uniform(&[(-1.0, 1.0)]);
        let a = DVector::from_vec(vec![0.0]);
        let b = DVector::from_vec(vec![0.1]);
        let points = vec![&a, &b];
        let bandwidths = kde_bandwidths(&points, &space);
        let near = kde_log_density(&DVector::from_vec(vec![0.05]), &points, &bandwidths);
        let far = kde_log_density(&DVector::from_vec(vec![0.9]), &points, &bandwidths);
        assert!(near > far);
    }

    #[test]
    fn test_config_builders() {
        let config = TpeConfig::new()
            .with_n_startup(5)
            .with_gamma(0.5)
            .with_n_candidates(10);
        assert_eq!(config.n_startup, 5);
        assert_eq!(config.gamma, 0.5);
        assert_eq!(config.n_candidates, 10);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_gamma_must_be_a_fraction() {
        let _ = TpeConfig::new().with_gamma(1.5);
    }
}
