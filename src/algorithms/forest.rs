use fastrand::Rng;

use crate::{
    algorithms::{best_observation, expected_improvement, RegressionTree},
    core::SearchSpace,
    error::Error,
    traits::{MinimizeOptions, MinimizeReport, Minimizer, Objective},
    DVector, Float,
};

/// Settings for the [`Forest`] adapter.
#[derive(Copy, Clone, Debug)]
pub struct ForestConfig {
    n_trees: usize,
    max_depth: usize,
    min_leaf: usize,
    n_startup: usize,
    n_candidates: usize,
    xi: Float,
}

impl ForestConfig {
    /// Create a new default configuration: 25 trees of depth at most 12, 5 startup draws, 100
    /// candidates per proposal, and an exploration margin of 0.01.
    pub const fn new() -> Self {
        Self {
            n_trees: 25,
            max_depth: 12,
            min_leaf: 1,
            n_startup: 5,
            n_candidates: 100,
            xi: 0.01,
        }
    }
    /// Set the number of bootstrapped trees (default: 25).
    ///
    /// # Panics
    ///
    /// Panics if `n_trees` is zero.
    pub const fn with_n_trees(mut self, n_trees: usize) -> Self {
        assert!(n_trees > 0);
        self.n_trees = n_trees;
        self
    }
    /// Set the maximum depth of each tree (default: 12).
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
    /// Set the minimum number of samples per leaf (default: 1).
    pub const fn with_min_leaf(mut self, min_leaf: usize) -> Self {
        self.min_leaf = min_leaf;
        self
    }
    /// Set the number of uniform draws made before the surrogate takes over (default: 5).
    pub const fn with_n_startup(mut self, n_startup: usize) -> Self {
        self.n_startup = n_startup;
        self
    }
    /// Set the number of candidates scored per proposal (default: 100).
    ///
    /// # Panics
    ///
    /// Panics if `n_candidates` is zero.
    pub const fn with_n_candidates(mut self, n_candidates: usize) -> Self {
        assert!(n_candidates > 0);
        self.n_candidates = n_candidates;
        self
    }
    /// Set the expected improvement exploration margin (default: 0.01).
    pub const fn with_xi(mut self, xi: Float) -> Self {
        self.xi = xi;
        self
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A random-forest surrogate[^1] with expected improvement.
///
/// Each proposal fits an ensemble of [`RegressionTree`]s on bootstrap resamples of the
/// observations. The spread of the per-tree predictions stands in for posterior uncertainty,
/// and the next query maximizes expected improvement over a uniform cloud of candidates.
///
/// [^1]: [Breiman, L. (2001). Random Forests. In Machine Learning (Vol. 45, Issue 1, pp. 5–32). Springer Science and Business Media LLC.](https://doi.org/10.1023/a:1010933404324)
#[derive(Default, Copy, Clone, Debug)]
pub struct Forest {
    config: ForestConfig,
}

impl Forest {
    /// The call budget multiplier the comparison experiments give this adapter.
    pub const BUDGET_MULTIPLIER: usize = 1;

    /// Create a new adapter with the given configuration.
    pub const fn new(config: ForestConfig) -> Self {
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
        let forest: Vec<RegressionTree> = (0..self.config.n_trees)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.usize(0..n)).collect();
                let sample_xs: Vec<DVector<Float>> =
                    sample.iter().map(|&i| xs[i].clone()).collect();
                let sample_ys: Vec<Float> = sample.iter().map(|&i| ys[i]).collect();
                RegressionTree::fit(
                    &sample_xs,
                    &sample_ys,
                    self.config.max_depth,
                    self.config.min_leaf,
                )
            })
            .collect();
        let incumbent = ys.iter().copied().fold(Float::INFINITY, Float::min);
        let mut chosen: Option<(DVector<Float>, Float)> = None;
        for _ in 0..self.config.n_candidates {
            let candidate = space.sample(rng);
            let predictions: Vec<Float> =
                forest.iter().map(|tree| tree.predict(&candidate)).collect();
            let mean = predictions.iter().sum::<Float>() / self.config.n_trees as Float;
            let var = predictions.iter().map(|p| (p - mean).powi(2)).sum::<Float>()
                / self.config.n_trees as Float;
            let ei = expected_improvement(mean, var.sqrt(), incumbent, self.config.xi);
            match &chosen {
                Some((_, best)) if *best >= ei => {}
                _ => chosen = Some((candidate, ei)),
            }
        }
        match chosen {
            Some((candidate, _)) => candidate,
            None => space.sample(rng),
        }
    }
}

impl Minimizer for Forest {
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
            algorithm: "random forest".to_string(),
            message: "no evaluations were budgeted".to_string(),
        })?;
        Ok(MinimizeReport {
            x,
            fx,
            n_calls: options.max_calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{benchmarks::Benchmark, core::InstrumentedObjective, traits::CostFunction};

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
    fn test_forest_minimizes_a_sphere() {
        let benchmark = sphere_benchmark();
        let mut objective = InstrumentedObjective::new(&benchmark, 0.0, 0);
        let options = MinimizeOptions {
            max_calls: 15,
            seed: 0,
        };
        let report = Forest::default()
            .minimize(&mut objective, benchmark.space(), &options)
            .unwrap();
        assert_eq!(report.n_calls, 15);
        assert_eq!(objective.n_evaluations(), 15);
        assert!(report.fx < 1.0);
        assert!(benchmark.space().contains(&report.x));
    }

    #[test]
    fn test_forest_is_deterministic() {
        let benchmark = sphere_benchmark();
        let options = MinimizeOptions {
            max_calls: 12,
            seed: 5,
        };
        let mut first = InstrumentedObjective::new(&benchmark, 0.05, 9);
        let a = Forest::default()
            .minimize(&mut first, benchmark.space(), &options)
            .unwrap();
        let mut second = InstrumentedObjective::new(&benchmark, 0.05, 9);
        let b = Forest::default()
            .minimize(&mut second, benchmark.space(), &options)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(first.trace(), second.trace());
    }

    #[test]
    fn test_small_tuned_forest_works_too() {
        let benchmark = sphere_benchmark();
        let mut objective = InstrumentedObjective::new(&benchmark, 0.0, 1);
        let options = MinimizeOptions {
            max_calls: 10,
            seed: 1,
        };
        let config = ForestConfig::new()
            .with_n_trees(5)
            .with_max_depth(4)
            .with_min_leaf(2)
            .with_n_startup(4)
            .with_n_candidates(20)
            .with_xi(0.05);
        let report = Forest::new(config)
            .minimize(&mut objective, benchmark.space(), &options)
            .unwrap();
        assert_eq!(report.n_calls, 10);
        assert!(benchmark.space().contains(&report.x));
    }
}
