use crate::{
    benchmarks::{Benchmark, Branin, Hartmann6},
    error::Error,
};

/// An immutable catalog of [`Benchmark`] definitions, resolved by name.
///
/// Registries are built once, up front, and never mutated afterwards; runs only read from them.
#[derive(Default, Clone, Debug)]
pub struct BenchmarkRegistry {
    benchmarks: Vec<Benchmark>,
}

impl BenchmarkRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            benchmarks: Vec::new(),
        }
    }
    /// Creates a registry holding the standard catalog, `branin` and `hart6`.
    pub fn standard() -> Self {
        Self::new()
            .with_benchmark(Branin::benchmark())
            .with_benchmark(Hartmann6::benchmark())
    }
    /// Adds a benchmark to the registry.
    ///
    /// # Panics
    ///
    /// Panics if a benchmark with the same name is already registered.
    pub fn with_benchmark(mut self, benchmark: Benchmark) -> Self {
        assert!(
            self.lookup(benchmark.name()).is_err(),
            "benchmark '{}' is already registered",
            benchmark.name()
        );
        self.benchmarks.push(benchmark);
        self
    }
    /// Resolves a benchmark by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownBenchmark`] listing the registered names if no benchmark matches.
    pub fn lookup(&self, name: &str) -> Result<&Benchmark, Error> {
        self.benchmarks
            .iter()
            .find(|benchmark| benchmark.name() == name)
            .ok_or_else(|| Error::UnknownBenchmark {
                name: name.to_string(),
                available: self.names().iter().map(ToString::to_string).collect(),
            })
    }
    /// The names of all registered benchmarks, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.benchmarks.iter().map(Benchmark::name).collect()
    }
    /// The number of registered benchmarks.
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }
    /// Checks whether the registry holds no benchmarks.
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}
