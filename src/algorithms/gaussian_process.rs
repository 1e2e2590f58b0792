use fastrand::Rng;
use nalgebra::{Cholesky, Dyn};

use crate::{
    algorithms::{best_observation, expected_improvement},
    core::{
        utils::{maybe_warn, SampleFloat},
        SearchSpace,
    },
    error::Error,
    traits::{MinimizeOptions, MinimizeReport, Minimizer, Objective},
    DMatrix, DVector, Float,
};

/// Settings for the [`GaussianProcess`] adapter.
#[derive(Copy, Clone, Debug)]
pub struct GpConfig {
    n_startup: usize,
    length_scale: Float,
    n_candidates: usize,
    xi: Float,
}

impl GpConfig {
    /// Create a new default configuration: 5 startup draws, a kernel length scale of 0.2 in
    /// normalized coordinates, 200 candidates per proposal, and an exploration margin of 0.01.
    pub const fn new() -> Self {
        Self {
            n_startup: 5,
            length_scale: 0.2,
            n_candidates: 200,
            xi: 0.01,
        }
    }
    /// Set the number of uniform draws made before the surrogate takes over (default: 5).
    pub const fn with_n_startup(mut self, n_startup: usize) -> Self {
        self.n_startup = n_startup;
        self
    }
    /// Set the kernel length scale in normalized coordinates (default: 0.2).
    ///
    /// # Panics
    ///
    /// Panics if `length_scale` is not positive.
    pub fn with_length_scale(mut self, length_scale: Float) -> Self {
        assert!(length_scale > 0.0);
        self.length_scale = length_scale;
        self
    }
    /// Set the number of candidates scored per proposal (default: 200).
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

impl Default for GpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A Gaussian-process surrogate with expected improvement[^1].
///
/// Inputs are normalized to the unit cube and targets standardized before an RBF-kernel
/// Gaussian process is fit to every observation so far. The next query maximizes expected
/// improvement over a uniform cloud of candidates. When the kernel matrix cannot be factored
/// even with escalating jitter, the proposal falls back to a uniform draw instead of failing
/// the run.
///
/// [^1]: [Jones, D. R., Schonlau, M., & Welch, W. J. (1998). Efficient Global Optimization of Expensive Black-Box Functions. In Journal of Global Optimization (Vol. 13, Issue 4, pp. 455–492). Springer Science and Business Media LLC.](https://doi.org/10.1023/a:1008306431147)
#[derive(Default, Copy, Clone, Debug)]
pub struct GaussianProcess {
    config: GpConfig,
}

impl GaussianProcess {
    /// The call budget multiplier the comparison experiments give this adapter.
    pub const BUDGET_MULTIPLIER: usize = 1;

    /// Create a new adapter with the given configuration.
    pub const fn new(config: GpConfig) -> Self {
        Self { config }
    }

    fn propose(
        &self,
        xs: &[DVector<Float>],
        ys: &[Float],
        space: &SearchSpace,
        rng: &mut Rng,
    ) -> DVector<Float> {
        let n = ys.len() as Float;
        let mean = ys.iter().sum::<Float>() / n;
        let std = (ys.iter().map(|y| (y - mean).powi(2)).sum::<Float>() / n)
            .sqrt()
            .max(Float::EPSILON);
        let targets = DVector::from_iterator(ys.len(), ys.iter().map(|y| (y - mean) / std));
        let normalized: Vec<DVector<Float>> = xs.iter().map(|x| normalize(x, space)).collect();
        let gp = match FittedGp::fit(normalized, &targets, self.config.length_scale) {
            Some(gp) => gp,
            None => {
                maybe_warn("Gaussian process fit failed, falling back to a uniform draw");
                return space.sample(rng);
            }
        };
        let incumbent = targets.min();
        let mut chosen: Option<(DVector<Float>, Float)> = None;
        for _ in 0..self.config.n_candidates {
            let z = DVector::from_fn(space.dimension(), |_, _| rng.float());
            let (mean, sigma) = gp.predict(&z);
            let ei = expected_improvement(mean, sigma, incumbent, self.config.xi);
            match &chosen {
                Some((_, best)) if *best >= ei => {}
                _ => chosen = Some((z, ei)),
            }
        }
        match chosen {
            Some((z, _)) => denormalize(&z, space),
            None => space.sample(rng),
        }
    }
}

impl Minimizer for GaussianProcess {
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
            algorithm: "gaussian process".to_string(),
            message: "no evaluations were budgeted".to_string(),
        })?;
        Ok(MinimizeReport {
            x,
            fx,
            n_calls: options.max_calls,
        })
    }
}

struct FittedGp {
    points: Vec<DVector<Float>>,
    cholesky: Cholesky<Float, Dyn>,
    alpha: DVector<Float>,
    length_scale: Float,
}

impl FittedGp {
    /// Factors the RBF kernel over the given points, escalating the diagonal jitter until the
    /// factorization succeeds. Duplicate queries make the kernel singular otherwise.
    fn fit(
        points: Vec<DVector<Float>>,
        targets: &DVector<Float>,
        length_scale: Float,
    ) -> Option<Self> {
        let n = points.len();
        let kernel = DMatrix::from_fn(n, n, |i, j| rbf(&points[i], &points[j], length_scale));
        let mut jitter = 1e-8;
        while jitter < 1.0 {
            let regularized = &kernel + DMatrix::from_diagonal_element(n, n, jitter);
            if let Some(cholesky) = Cholesky::new(regularized) {
                let alpha = cholesky.solve(targets);
                return Some(Self {
                    points,
                    cholesky,
                    alpha,
                    length_scale,
                });
            }
            jitter *= 10.0;
        }
        None
    }

    fn predict(&self, z: &DVector<Float>) -> (Float, Float) {
        let k_star = DVector::from_iterator(
            self.points.len(),
            self.points.iter().map(|p| rbf(p, z, self.length_scale)),
        );
        let mean = k_star.dot(&self.alpha);
        let v = self.cholesky.solve(&k_star);
        let variance = (1.0 - k_star.dot(&v)).max(1e-12);
        (mean, variance.sqrt())
    }
}

fn rbf(a: &DVector<Float>, b: &DVector<Float>, length_scale: Float) -> Float {
    (-0.5 * (a - b).norm_squared() / (length_scale * length_scale)).exp()
}

fn normalize(x: &DVector<Float>, space: &SearchSpace) -> DVector<Float> {
    DVector::from_iterator(
        x.len(),
        x.iter()
            .zip(space.bounds().iter())
            .map(|(v, bound)| (v - bound.lower) / bound.width()),
    )
}

fn denormalize(z: &DVector<Float>, space: &SearchSpace) -> DVector<Float> {
    DVector::from_iterator(
        z.len(),
        z.iter()
            .zip(space.bounds().iter())
            .map(|(v, bound)| bound.width().mul_add(*v, bound.lower)),
    )
}
