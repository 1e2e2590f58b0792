use crate::{benchmarks::Benchmark, core::SearchSpace, traits::CostFunction, DVector, Float};

/// The six-dimensional Hartmann function, a multimodal minimization test problem.
///
/// ```math
/// f(\vec{x}) = -\sum_{i=1}^{4} \alpha_i \exp\left(-\sum_{j=1}^{6} A_{ij}(x_j - P_{ij})^2\right)
/// ```
///
/// The search space is $`[-1, 1]^6`$, which contains the usual unit-hypercube domain, and the
/// documented optimum is $`f(\vec{x}^*) \approx -3.32237`$.
#[derive(Copy, Clone, Default, Debug)]
pub struct Hartmann6;

const ALPHA: [Float; 4] = [1.0, 1.2, 3.0, 3.2];
const A: [[Float; 6]; 4] = [
    [10.0, 3.0, 17.0, 3.5, 1.7, 8.0],
    [0.05, 10.0, 17.0, 0.1, 8.0, 14.0],
    [3.0, 3.5, 1.7, 10.0, 17.0, 8.0],
    [17.0, 8.0, 0.05, 10.0, 0.1, 14.0],
];
const P: [[Float; 6]; 4] = [
    [0.1312, 0.1696, 0.5569, 0.0124, 0.8283, 0.5886],
    [0.2329, 0.4135, 0.8307, 0.3736, 0.1004, 0.9991],
    [0.2348, 0.1451, 0.3522, 0.2883, 0.3047, 0.6650],
    [0.4047, 0.8828, 0.8732, 0.5743, 0.1091, 0.0381],
];

impl Hartmann6 {
    /// The value of the function at the documented optimum.
    pub const OPTIMAL_FX: Float = -3.32237;

    /// The search space used in benchmark runs.
    pub fn space() -> SearchSpace {
        SearchSpace::uniform(&[(-1.0, 1.0); 6])
    }
    /// The location of the documented optimum.
    pub fn optimal_x() -> DVector<Float> {
        DVector::from_vec(vec![0.20169, 0.15001, 0.476874, 0.275332, 0.311652, 0.6573])
    }
    /// The full benchmark definition under the registry name `hart6`.
    pub fn benchmark() -> Benchmark {
        Benchmark::new(
            "hart6",
            Self,
            Self::space(),
            Self::optimal_x(),
            Self::OPTIMAL_FX,
        )
    }
}

impl CostFunction for Hartmann6 {
    fn evaluate(&self, x: &DVector<Float>) -> Float {
        -(0..4)
            .map(|i| {
                let exponent: Float = (0..6).map(|j| A[i][j] * (x[j] - P[i][j]).powi(2)).sum();
                ALPHA[i] * (-exponent).exp()
            })
            .sum::<Float>()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_hartmann_at_optimum() {
        let fx = Hartmann6.evaluate(&Hartmann6::optimal_x());
        assert_relative_eq!(fx, Hartmann6::OPTIMAL_FX, epsilon = 1e-4);
    }

    #[test]
    fn test_hartmann_center_is_worse_than_optimum() {
        let fx = Hartmann6.evaluate(&DVector::from_element(6, 0.0));
        assert!(fx > Hartmann6::OPTIMAL_FX);
    }

    #[test]
    fn test_hartmann_benchmark_definition() {
        let benchmark = Hartmann6::benchmark();
        assert_eq!(benchmark.name(), "hart6");
        assert_eq!(benchmark.dimension(), 6);
        assert!(benchmark.space().contains(benchmark.optimal_x()));
    }
}
