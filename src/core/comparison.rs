use serde::{Deserialize, Serialize};

use crate::{core::Trace, traits::MinimizeReport, Float};

/// The fixed coordinates of one comparison: which benchmark, how much noise, which seed, and
/// the base call budget.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExperimentSettings {
    /// The registry name of the benchmark to run on.
    pub benchmark: String,
    /// The standard deviation of the additive observation noise.
    pub noise_level: Float,
    /// The seed for every algorithm's noise stream and sampling in this comparison.
    pub seed: u64,
    /// The base number of objective calls; each algorithm multiplies this by its own
    /// multiplier.
    pub call_budget: usize,
}

impl ExperimentSettings {
    /// Creates the settings for one comparison.
    pub fn new(benchmark: &str, noise_level: Float, seed: u64, call_budget: usize) -> Self {
        Self {
            benchmark: benchmark.to_string(),
            noise_level,
            seed,
            call_budget,
        }
    }
    /// The deterministic file stem results of this comparison are saved under,
    /// `Compare-{benchmark}-{noise_level}-{seed}`.
    pub fn file_stem(&self) -> String {
        format!("Compare-{}-{}-{}", self.benchmark, self.noise_level, self.seed)
    }
}

/// How one algorithm's run ended.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum RunOutcome {
    /// The algorithm ran to completion.
    Completed {
        /// The algorithm's self-reported summary. Advisory only, the trace is authoritative.
        report: MinimizeReport,
    },
    /// The algorithm returned an error or panicked.
    Failed {
        /// The rendered error or panic payload.
        message: String,
    },
    /// An abort signal stopped the run early.
    Aborted,
}

/// Everything one algorithm produced in a comparison: its recorded trace and how the run
/// ended.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunResult {
    /// The name the algorithm was registered under.
    pub algorithm: String,
    /// The objective-side record of every call the algorithm made.
    pub trace: Trace,
    /// How the run ended.
    pub outcome: RunOutcome,
}

impl RunResult {
    /// Checks whether the run completed without failure or abort.
    pub const fn succeeded(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed { .. })
    }
}

/// The collected results of running every registered algorithm under one
/// [`ExperimentSettings`].
///
/// This is the artifact a [`ResultStore`](`crate::core::ResultStore`) persists and loads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    /// The artifact tag, always [`Comparison::TAG`], so readers can recognize the format.
    pub name: String,
    /// The settings the comparison ran under.
    pub settings: ExperimentSettings,
    /// One entry per registered algorithm, in registration order.
    pub runs: Vec<RunResult>,
}

impl Comparison {
    /// The artifact tag written into every saved comparison.
    pub const TAG: &'static str = "Compare Result";

    pub(crate) fn new(settings: ExperimentSettings) -> Self {
        Self {
            name: Self::TAG.to_string(),
            settings,
            runs: Vec::new(),
        }
    }
    /// Returns the run of the algorithm registered under `algorithm`, if present.
    pub fn run(&self, algorithm: &str) -> Option<&RunResult> {
        self.runs.iter().find(|run| run.algorithm == algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DVector;

    #[test]
    fn test_file_stem_formats() {
        let settings = ExperimentSettings::new("branin", 0.01, 3, 10);
        assert_eq!(settings.file_stem(), "Compare-branin-0.01-3");
        let settings = ExperimentSettings::new("branin", 0.0, 0, 10);
        assert_eq!(settings.file_stem(), "Compare-branin-0-0");
        let settings = ExperimentSettings::new("hart6", 0.1, 5, 10);
        assert_eq!(settings.file_stem(), "Compare-hart6-0.1-5");
    }

    #[test]
    fn test_comparison_lookup_and_outcomes() {
        let mut comparison = Comparison::new(ExperimentSettings::new("branin", 0.0, 0, 10));
        assert_eq!(comparison.name, Comparison::TAG);
        comparison.runs.push(RunResult {
            algorithm: "random".to_string(),
            trace: Trace::default(),
            outcome: RunOutcome::Completed {
                report: MinimizeReport {
                    x: DVector::from_vec(vec![0.0, 0.0]),
                    fx: 1.0,
                    n_calls: 10,
                },
            },
        });
        comparison.runs.push(RunResult {
            algorithm: "tpe".to_string(),
            trace: Trace::default(),
            outcome: RunOutcome::Failed {
                message: "it broke".to_string(),
            },
        });
        assert!(comparison.run("random").unwrap().succeeded());
        assert!(!comparison.run("tpe").unwrap().succeeded());
        assert!(comparison.run("gp").is_none());
    }
}
