use fastrand::Rng;

use crate::{
    algorithms::{best_observation, RegressionTree},
    core::SearchSpace,
    error::Error,
    traits::{MinimizeOptions, MinimizeReport, Minimizer, Objective},
    DVector, Float,
};

/// Settings for the [`Gbrt`] adapter.
#[derive(Copy, Clone, Debug)]
pub struct GbrtConfig {
    n_models: usize,
    n_stages: usize,
    shrinkage: Float,
    max_depth: usize,
    min_leaf: usize,
    subsample: Float,
    n_startup: usize,
    n_candidates: usize,
    kappa: Float,
}

impl GbrtConfig {
    /// Create a new default configuration: an ensemble of 5 boosted models with 30 stages of
    /// depth-3 trees each, shrinkage 0.1, 80% row subsampling, 10 startup draws, 100 candidates
    /// per proposal, and a confidence multiplier of 1.96.
    pub const fn new() -> Self {
        Self {
            n_models: 5,
            n_stages: 30,
            shrinkage: 0.1,
            max_depth: 3,
            min_leaf: 3,
            subsample: 0.8,
            n_startup: 10,
            n_candidates: 100,
            kappa: 1.96,
        }
    }
    /// Set the number of independently subsampled boosted models (default: 5).
    ///
    /// # Panics
    ///
    /// Panics if `n_models` is zero.
    pub const fn with_n_models(mut self, n_models: usize) -> Self {
        assert!(n_models > 0);
        self.n_models = n_models;
        self
    }
    /// Set the number of boosting stages per model (default: 30).
    pub const fn with_n_stages(mut self, n_stages: usize) -> Self {
        self.n_stages = n_stages;
        self
    }
    /// Set the learning rate applied to each stage (default: 0.1).
    pub fn with_shrinkage(mut self, shrinkage: Float) -> Self {
        assert!(shrinkage > 0.0);
        self.shrinkage = shrinkage;
        self
    }
    /// Set the maximum depth of each stage tree (default: 3).
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
    /// Set the minimum number of samples per leaf (default: 3).
    pub const fn with_min_leaf(mut self, min_leaf: usize) -> Self {
        self.min_leaf = min_leaf;
        self
    }
    /// Set the fraction of rows each stage trains on (default: 0.8).
    ///
    /// # Panics
    ///
    /// Panics if `subsample` is not in `(0, 1]`.
    pub fn with_subsample(mut self, subsample: Float) -> Self {
        assert!(subsample > 0.0 && subsample <= 1.0);
        self.subsample = subsample;
        self
    }
    /// Set the number of uniform draws made before the surrogate takes over (default: 10).
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
    /// Set the lower-confidence-bound multiplier (default: 1.96).
    pub const fn with_kappa(mut self, kappa: Float) -> Self {
        self.kappa = kappa;
        self
    }
}

impl Default for GbrtConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A gradient-boosted stagewise fit: a constant base prediction plus shrunken
/// [`RegressionTree`] corrections trained on the running residuals.
struct BoostedModel {
    base: Float,
    shrinkage: Float,
    stages: Vec<RegressionTree>,
}

impl BoostedModel {
    fn fit(xs: &[DVector<Float>], ys: &[Float], config: &GbrtConfig, rng: &mut Rng) -> Self {
        let n = xs.len();
        let base = ys.iter().sum::<Float>() / n as Float;
        let rows = ((config.subsample * n as Float).ceil() as usize).clamp(1, n);
        let mut predictions = vec![base; n];
        let mut stages = Vec::with_capacity(config.n_stages);
        for _ in 0..config.n_stages {
            let sample = rng.choose_multiple(0..n, rows);
            let sample_xs: Vec<DVector<Float>> = sample.iter().map(|&i| xs[i].clone()).collect();
            let residuals: Vec<Float> = sample.iter().map(|&i| ys[i] - predictions[i]).collect();
            let tree = RegressionTree::fit(&sample_xs, &residuals, config.max_depth, config.min_leaf);
            for (prediction, x) in predictions.iter_mut().zip(xs) {
                *prediction += config.shrinkage * tree.predict(x);
            }
            stages.push(tree);
        }
        Self {
            base,
            shrinkage: config.shrinkage,
            stages,
        }
    }

    fn predict(&self, x: &DVector<Float>) -> Float {
        self.stages
            .iter()
            .map(|tree| tree.predict(x))
            .sum::<Float>()
            .mul_add(self.shrinkage, self.base)
    }
}

/// A gradient-boosted-tree surrogate[^1] with a lower confidence bound.
///
/// Boosted trees predict a point value with no uncertainty of their own, so this adapter fits
/// a small ensemble of [`BoostedModel`]s on different row subsamples and reads the spread of
/// their predictions as the posterior scale. The next query minimizes
/// ```math
/// \text{LCB}(x) = \mu(x) - \kappa \sigma(x)
/// ```
/// over a uniform cloud of candidates.
///
/// [^1]: [Friedman, J. H. (2001). Greedy function approximation: A gradient boosting machine. In The Annals of Statistics (Vol. 29, Issue 5). Institute of Mathematical Statistics.](https://doi.org/10.1214/aos/1013203451)
#[derive(Default, Copy, Clone, Debug)]
pub struct Gbrt {
    config: GbrtConfig,
}

impl Gbrt {
    /// The call budget multiplier the comparison experiments give this adapter.
    pub const BUDGET_MULTIPLIER: usize = 10;

    /// Create a new adapter with the given configuration.
    pub const fn new(config: GbrtConfig) -> Self {
        Self { config }
    }

    fn propose(
        &self,
        xs: &[DVector<Float>],
        ys: &[Float],
        space: &SearchSpace,
        rng: &mut Rng,
    ) -> DVector<Float> {
        let models: Vec<BoostedModel> = (0..self.config.n_models)
            .map(|_| BoostedModel::fit(xs, ys, &self.config, rng))
            .collect();
        let mut chosen: Option<(DVector<Float>, Float)> = None;
        for _ in 0..self.config.n_candidates {
            let candidate = space.sample(rng);
            let predictions: Vec<Float> =
                models.iter().map(|model| model.predict(&candidate)).collect();
            let mean = predictions.iter().sum::<Float>() / self.config.n_models as Float;
            let var = predictions.iter().map(|p| (p - mean).powi(2)).sum::<Float>()
                / self.config.n_models as Float;
            let lcb = var.sqrt().mul_add(-self.config.kappa, mean);
            match &chosen {
                Some((_, best)) if *best <= lcb => {}
                _ => chosen = Some((candidate, lcb)),
            }
        }
        match chosen {
            Some((candidate, _)) => candidate,
            None => space.sample(rng),
        }
    }
}

impl Minimizer for Gbrt {
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
            algorithm: "gradient boosted trees".to_string(),
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
    fn test_boosting_fits_training_data_better_than_the_base() {
        let xs: Vec<DVector<Float>> = (0..20)
            .map(|i| DVector::from_vec(vec![i as Float / 10.0 - 1.0]))
            .collect();
        let ys: Vec<Float> = xs.iter().map(|x| x[0] * x[0]).collect();
        let mut rng = Rng::with_seed(0);
        let model = BoostedModel::fit(&xs, &ys, &GbrtConfig::new(), &mut rng);
        let base = ys.iter().sum::<Float>() / ys.len() as Float;
        let base_sse: Float = ys.iter().map(|y| (y - base).powi(2)).sum();
        let model_sse: Float = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (model.predict(x) - y).powi(2))
            .sum();
        assert!(model_sse < base_sse * 0.5);
    }

    #[test]
    fn test_gbrt_minimizes_a_sphere() {
        let benchmark = sphere_benchmark();
        let mut objective = InstrumentedObjective::new(&benchmark, 0.0, 0);
        let options = MinimizeOptions {
            max_calls: 20,
            seed: 0,
        };
        let report = Gbrt::default()
            .minimize(&mut objective, benchmark.space(), &options)
            .unwrap();
        assert_eq!(report.n_calls, 20);
        assert_eq!(objective.n_evaluations(), 20);
        assert!(report.fx < 1.0);
        assert!(benchmark.space().contains(&report.x));
    }

    #[test]
    fn test_gbrt_is_deterministic() {
        let benchmark = sphere_benchmark();
        let options = MinimizeOptions {
            max_calls: 15,
            seed: 5,
        };
        let mut first = InstrumentedObjective::new(&benchmark, 0.05, 9);
        let a = Gbrt::default()
            .minimize(&mut first, benchmark.space(), &options)
            .unwrap();
        let mut second = InstrumentedObjective::new(&benchmark, 0.05, 9);
        let b = Gbrt::default()
            .minimize(&mut second, benchmark.space(), &options)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(first.trace(), second.trace());
    }

    #[test]
    fn test_config_builders() {
        let config = GbrtConfig::new()
            .with_n_models(3)
            .with_n_stages(10)
            .with_shrinkage(0.2)
            .with_max_depth(2)
            .with_min_leaf(1)
            .with_subsample(0.5)
            .with_n_startup(4)
            .with_n_candidates(20)
            .with_kappa(1.0);
        let benchmark = sphere_benchmark();
        let mut objective = InstrumentedObjective::new(&benchmark, 0.0, 2);
        let options = MinimizeOptions {
            max_calls: 8,
            seed: 2,
        };
        let report = Gbrt::new(config)
            .minimize(&mut objective, benchmark.space(), &options)
            .unwrap();
        assert_eq!(report.n_calls, 8);
        assert!(benchmark.space().contains(&report.x));
    }
}
