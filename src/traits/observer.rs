use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::{RunOutcome, RunResult};

/// A trait which holds a [`callback`](`RunObserver::callback`) function that is handed each
/// finished [`RunResult`] as the
/// [`OptimizationRunner`](`crate::core::OptimizationRunner`) works through its algorithms.
pub trait RunObserver {
    /// A function that is called after each algorithm's run completes, fails, or is aborted.
    fn callback(&mut self, result: &RunResult);
}

/// An observer which prints one line per finished run.
///
/// # Usage:
///
/// ```rust
/// use tulana::prelude::*;
///
/// let registry = BenchmarkRegistry::standard();
/// let settings = ExperimentSettings::new("branin", 0.0, 0, 5);
/// let mut runner = OptimizationRunner::new(&registry, settings).unwrap();
/// runner
///     .register("random", RandomSearch::default(), OptionsTemplate::new(1))
///     .add_observer(ProgressObserver::build());
/// let comparison = runner.run();
/// // ^ This prints a summary line for the "random" run
/// assert_eq!(comparison.runs.len(), 1);
/// ```
pub struct ProgressObserver;
impl ProgressObserver {
    /// Finalize the [`RunObserver`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self))
    }
}
impl RunObserver for ProgressObserver {
    fn callback(&mut self, result: &RunResult) {
        match &result.outcome {
            RunOutcome::Completed { report } => println!(
                "{}: f = {} after {} evaluations",
                result.algorithm, report.fx, report.n_calls
            ),
            RunOutcome::Failed { message } => {
                println!("{}: failed ({message})", result.algorithm)
            }
            RunOutcome::Aborted => println!("{}: aborted", result.algorithm),
        }
    }
}
