use std::{fmt, sync::Arc};

use crate::{core::SearchSpace, traits::CostFunction, DVector, Float};

/// Module containing the two-dimensional Branin function.
pub mod branin;
/// Module containing the six-dimensional Hartmann function.
pub mod hart6;
/// Module containing the [`BenchmarkRegistry`].
pub mod registry;

pub use branin::Branin;
pub use hart6::Hartmann6;
pub use registry::BenchmarkRegistry;

/// A named benchmark function together with its search space and documented optimum.
///
/// Definitions are immutable once constructed; the objective clones one per run and everything
/// else reads it in place.
#[derive(Clone)]
pub struct Benchmark {
    name: String,
    function: Arc<dyn CostFunction>,
    space: SearchSpace,
    optimal_x: DVector<Float>,
    optimal_fx: Float,
}

impl fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("name", &self.name)
            .field("space", &self.space)
            .field("optimal_x", &self.optimal_x)
            .field("optimal_fx", &self.optimal_fx)
            .finish_non_exhaustive()
    }
}

impl Benchmark {
    /// Creates a benchmark definition.
    ///
    /// # Panics
    ///
    /// Panics if the documented optimum does not lie inside the search space.
    pub fn new<F: CostFunction + 'static>(
        name: &str,
        function: F,
        space: SearchSpace,
        optimal_x: DVector<Float>,
        optimal_fx: Float,
    ) -> Self {
        assert!(
            space.contains(&optimal_x),
            "documented optimum of '{name}' is outside its search space"
        );
        Self {
            name: name.to_string(),
            function: Arc::new(function),
            space,
            optimal_x,
            optimal_fx,
        }
    }
    /// The registry name of the benchmark.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// The benchmark's search space.
    pub const fn space(&self) -> &SearchSpace {
        &self.space
    }
    /// The number of coordinates the benchmark consumes.
    pub fn dimension(&self) -> usize {
        self.space.dimension()
    }
    /// The location of the documented optimum.
    pub const fn optimal_x(&self) -> &DVector<Float> {
        &self.optimal_x
    }
    /// The value of the documented optimum.
    pub const fn optimal_fx(&self) -> Float {
        self.optimal_fx
    }
    /// Evaluates the underlying function, with no noise and no recording.
    pub fn evaluate(&self, x: &DVector<Float>) -> Float {
        self.function.evaluate(x)
    }
}
