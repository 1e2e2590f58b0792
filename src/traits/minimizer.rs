use crate::{core::SearchSpace, error::Error, traits::Objective, DVector, Float};
use serde::{Deserialize, Serialize};

/// The evaluation budget and seed handed to an adapter for one run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MinimizeOptions {
    /// The maximum number of objective evaluations the adapter may spend.
    pub max_calls: usize,
    /// The seed for the adapter's private generator.
    pub seed: u64,
}

/// The declared budget policy for one registered adapter.
///
/// Algorithms are allotted different numbers of calls per unit of experiment budget; the factor
/// is declared here at registration time rather than hardcoded in the runner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OptionsTemplate {
    /// The factor applied to the experiment's call budget for this adapter.
    pub budget_multiplier: usize,
}

impl Default for OptionsTemplate {
    fn default() -> Self {
        Self::new(1)
    }
}

impl OptionsTemplate {
    /// Creates a template with the given budget multiplier.
    pub const fn new(budget_multiplier: usize) -> Self {
        Self { budget_multiplier }
    }
    /// Resolves the template against an experiment's call budget and seed.
    pub const fn resolve(&self, call_budget: usize, seed: u64) -> MinimizeOptions {
        MinimizeOptions {
            max_calls: call_budget * self.budget_multiplier,
            seed,
        }
    }
}

/// What an adapter claims about its own run.
///
/// This is advisory: the harness compares algorithms on the
/// [`Trace`](`crate::core::Trace`) its objective recorded, never on this report.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MinimizeReport {
    /// The best point the adapter believes it found.
    pub x: DVector<Float>,
    /// The objective value the adapter observed at [`MinimizeReport::x`].
    pub fx: Float,
    /// The number of objective evaluations the adapter made.
    pub n_calls: usize,
}

/// A trait representing one optimization algorithm under comparison.
///
/// The contract is deliberately thin: repeatedly call the objective with points inside the
/// search space, respect the budget in `options`, and eventually return. Each run gets a fresh
/// generator seeded from [`MinimizeOptions::seed`], so a run is a pure function of
/// `(space, options)` and the objective's replies.
pub trait Minimizer {
    /// Runs the algorithm against the given objective.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the adapter gives up or if the objective rejects a query; the
    /// runner records the failure and moves on to the next algorithm.
    fn minimize(
        &mut self,
        objective: &mut dyn Objective,
        space: &SearchSpace,
        options: &MinimizeOptions,
    ) -> Result<MinimizeReport, Error>;
}
