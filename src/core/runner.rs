use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{
    benchmarks::{Benchmark, BenchmarkRegistry},
    core::{
        abort_signals::NopAbortSignal,
        comparison::{Comparison, ExperimentSettings, RunOutcome, RunResult},
        objective::{InstrumentedObjective, Verbosity},
        trace::Trace,
    },
    error::Error,
    traits::{AbortSignal, Minimizer, OptionsTemplate, RunObserver},
};

struct RunnerEntry {
    name: String,
    minimizer: Box<dyn Minimizer>,
    template: OptionsTemplate,
}

/// Drives every registered algorithm through an identical experiment and collects the results
/// into a [`Comparison`].
///
/// Each algorithm gets a freshly seeded [`InstrumentedObjective`], so no state leaks between
/// runs, and the trace that ends up in the [`Comparison`] is the objective's own record of what
/// the algorithm did. An algorithm that returns an error or panics is marked
/// [`RunOutcome::Failed`] while the remaining algorithms still run.
pub struct OptimizationRunner {
    benchmark: Benchmark,
    settings: ExperimentSettings,
    entries: Vec<RunnerEntry>,
    observers: Vec<Arc<RwLock<dyn RunObserver>>>,
    abort_signal: Arc<dyn AbortSignal>,
    verbosity: Verbosity,
}

impl OptimizationRunner {
    /// Creates a runner for one experiment, resolving the benchmark up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownBenchmark`] if the settings name a benchmark the registry does
    /// not hold.
    pub fn new(registry: &BenchmarkRegistry, settings: ExperimentSettings) -> Result<Self, Error> {
        let benchmark = registry.lookup(&settings.benchmark)?.clone();
        Ok(Self {
            benchmark,
            settings,
            entries: Vec::new(),
            observers: Vec::new(),
            abort_signal: Arc::new(NopAbortSignal),
            verbosity: Verbosity::default(),
        })
    }
    /// Registers an algorithm under the given name, with the template that turns the
    /// experiment's base call budget into the algorithm's own options.
    pub fn register<M: Minimizer + 'static>(
        &mut self,
        name: &str,
        minimizer: M,
        template: OptionsTemplate,
    ) -> &mut Self {
        self.entries.push(RunnerEntry {
            name: name.to_string(),
            minimizer: Box::new(minimizer),
            template,
        });
        self
    }
    /// Adds an observer whose callback is handed each [`RunResult`] as it finishes.
    pub fn add_observer(&mut self, observer: Arc<RwLock<dyn RunObserver>>) -> &mut Self {
        self.observers.push(observer);
        self
    }
    /// Attaches an abort signal checked before each run and before each evaluation within a
    /// run.
    pub fn with_abort_signal<A: AbortSignal + 'static>(&mut self, abort_signal: A) -> &mut Self {
        self.abort_signal = Arc::new(abort_signal);
        self
    }
    /// Sets the verbosity passed through to each run's objective.
    pub fn with_verbosity(&mut self, verbosity: Verbosity) -> &mut Self {
        self.verbosity = verbosity;
        self
    }
    /// The settings this runner was created with.
    pub const fn settings(&self) -> &ExperimentSettings {
        &self.settings
    }
    /// The resolved benchmark definition.
    pub const fn benchmark(&self) -> &Benchmark {
        &self.benchmark
    }

    /// Runs every registered algorithm in registration order and collects the results.
    ///
    /// Failures never cross between algorithms. A panic inside one algorithm is caught and
    /// recorded as a [`RunOutcome::Failed`], and the records its objective gathered before the
    /// failure are kept. Once the abort signal trips, the current run ends with
    /// [`RunOutcome::Aborted`] and the remaining algorithms are marked aborted without running.
    pub fn run(&mut self) -> Comparison {
        let mut comparison = Comparison::new(self.settings.clone());
        for entry in &mut self.entries {
            let result = if self.abort_signal.is_aborted() {
                RunResult {
                    algorithm: entry.name.clone(),
                    trace: Trace::default(),
                    outcome: RunOutcome::Aborted,
                }
            } else {
                let mut objective = InstrumentedObjective::new(
                    &self.benchmark,
                    self.settings.noise_level,
                    self.settings.seed,
                )
                .with_verbosity(self.verbosity);
                objective.set_abort_signal(self.abort_signal.clone());
                let options = entry
                    .template
                    .resolve(self.settings.call_budget, self.settings.seed);
                let space = self.benchmark.space();
                let outcome = match catch_unwind(AssertUnwindSafe(|| {
                    entry.minimizer.minimize(&mut objective, space, &options)
                })) {
                    Ok(Ok(report)) => RunOutcome::Completed { report },
                    Ok(Err(Error::Aborted)) => RunOutcome::Aborted,
                    Ok(Err(error)) => RunOutcome::Failed {
                        message: error.to_string(),
                    },
                    Err(payload) => RunOutcome::Failed {
                        message: panic_message(payload.as_ref()),
                    },
                };
                RunResult {
                    algorithm: entry.name.clone(),
                    trace: objective.into_trace(),
                    outcome,
                }
            };
            for observer in &self.observers {
                observer.write().callback(&result);
            }
            comparison.runs.push(result);
        }
        comparison
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
