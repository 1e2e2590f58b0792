use crate::{benchmarks::Benchmark, core::SearchSpace, traits::CostFunction, DVector, Float, PI};

/// The Branin function, a two-dimensional minimization test problem with three global minima.
///
/// ```math
/// f(x_1, x_2) = a(x_2 - bx_1^2 + cx_1 - r)^2 + s(1 - t)\cos(x_1) + s
/// ```
/// where $`a = 1`$, $`b = 5.1/(4\pi^2)`$, $`c = 5/\pi`$, $`r = 6`$, $`s = 10`$, and
/// $`t = 1/(8\pi)`$.
///
/// The search space is $`[-5, 5]^2`$ and the documented optimum is
/// $`f(\pi, 2.275) \approx 0.397887`$.
#[derive(Copy, Clone, Default, Debug)]
pub struct Branin;

impl Branin {
    /// The value of the function at the documented optimum.
    pub const OPTIMAL_FX: Float = 0.397_887;

    /// The search space used in benchmark runs.
    pub fn space() -> SearchSpace {
        SearchSpace::uniform(&[(-5.0, 5.0), (-5.0, 5.0)])
    }
    /// The location of the documented optimum.
    ///
    /// Two further global minima exist at $`(-\pi, 12.275)`$ and $`(9.42478, 2.475)`$, but both
    /// lie outside the benchmark search space.
    pub fn optimal_x() -> DVector<Float> {
        DVector::from_vec(vec![PI, 2.275])
    }
    /// The full benchmark definition under the registry name `branin`.
    pub fn benchmark() -> Benchmark {
        Benchmark::new(
            "branin",
            Self,
            Self::space(),
            Self::optimal_x(),
            Self::OPTIMAL_FX,
        )
    }
}

impl CostFunction for Branin {
    #[allow(clippy::suboptimal_flops)]
    fn evaluate(&self, x: &DVector<Float>) -> Float {
        let a = 1.0;
        let b = 5.1 / (4.0 * PI * PI);
        let c = 5.0 / PI;
        let r = 6.0;
        let s = 10.0;
        let t = 1.0 / (8.0 * PI);
        a * (x[1] - b * x[0] * x[0] + c * x[0] - r).powi(2) + s * (1.0 - t) * x[0].cos() + s
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_branin_at_optimum() {
        let fx = Branin.evaluate(&Branin::optimal_x());
        assert_relative_eq!(fx, Branin::OPTIMAL_FX, epsilon = 1e-5);
    }

    #[test]
    fn test_branin_at_origin() {
        let fx = Branin.evaluate(&DVector::from_vec(vec![0.0, 0.0]));
        assert_relative_eq!(fx, 55.602_112_642_270_265, epsilon = 1e-5);
    }

    #[test]
    fn test_branin_benchmark_definition() {
        let benchmark = Branin::benchmark();
        assert_eq!(benchmark.name(), "branin");
        assert_eq!(benchmark.dimension(), 2);
        assert!(benchmark.space().contains(benchmark.optimal_x()));
    }
}
