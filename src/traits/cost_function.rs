use crate::{DVector, Float};

/// A trait which describes a function $`f(\mathbb{R}^n) \to \mathbb{R}`$.
///
/// Benchmark functions are pure and deterministic: all noise, recording, and bookkeeping live
/// in the [`InstrumentedObjective`](`crate::core::InstrumentedObjective`) wrapped around them,
/// so evaluation here is infallible.
pub trait CostFunction {
    /// The evaluation of the function at a point `x`.
    fn evaluate(&self, x: &DVector<Float>) -> Float;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Parabola;
    impl CostFunction for Parabola {
        fn evaluate(&self, x: &DVector<Float>) -> Float {
            x.iter().map(|xi| xi.powi(2)).sum()
        }
    }

    #[test]
    fn test_evaluate() {
        let f = Parabola;
        assert_eq!(f.evaluate(&DVector::from_vec(vec![3.0, 4.0])), 25.0);
        assert_eq!(f.evaluate(&DVector::from_vec(vec![0.0, 0.0])), 0.0);
    }
}
