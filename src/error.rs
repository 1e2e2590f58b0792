use thiserror::Error;

use crate::Float;

/// The error type for every fallible operation in the crate.
///
/// Adapter failures are caught by the
/// [`OptimizationRunner`](`crate::core::OptimizationRunner`) and folded into the run's outcome
/// rather than aborting the comparison, and file-name collisions in the
/// [`ResultStore`](`crate::core::ResultStore`) are resolved by suffixing rather than surfaced,
/// so the variants a caller actually sees are the benchmark-lookup, point-validation, and
/// storage ones.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested benchmark name is not in the registry.
    #[error("unknown benchmark '{name}' (available: {available:?})")]
    UnknownBenchmark {
        /// The name that failed to resolve.
        name: String,
        /// Every name the registry does know.
        available: Vec<String>,
    },
    /// A queried point has the wrong number of coordinates for the benchmark's search space.
    #[error("malformed point: expected dimension {expected}, got {actual}")]
    DimensionMismatch {
        /// The search space's dimension.
        expected: usize,
        /// The queried point's dimension.
        actual: usize,
    },
    /// A queried point has a coordinate that is not a finite number.
    #[error("malformed point: coordinate {index} is not finite")]
    NonFiniteCoordinate {
        /// Which coordinate was non-finite.
        index: usize,
    },
    /// A queried point lies outside the benchmark's search space.
    #[error("malformed point: coordinate {index} = {value} is outside ({lower}, {upper})")]
    OutOfBounds {
        /// Which coordinate violated its bound.
        index: usize,
        /// The offending value.
        value: Float,
        /// The lower edge of the violated bound.
        lower: Float,
        /// The upper edge of the violated bound.
        upper: Float,
    },
    /// An algorithm adapter returned an error or gave up.
    #[error("algorithm '{algorithm}' failed: {message}")]
    AlgorithmFailure {
        /// The adapter's name.
        algorithm: String,
        /// The failure rendered as text.
        message: String,
    },
    /// The abort signal tripped before or during an evaluation.
    #[error("abort signal received")]
    Aborted,
    /// An I/O failure while writing or reading a comparison artifact.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    /// An encoding failure while writing or reading a comparison artifact.
    #[error("pickle error: {0}")]
    Pickle(#[from] serde_pickle::Error),
}
